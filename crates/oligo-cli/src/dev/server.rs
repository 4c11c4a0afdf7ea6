//! HTTP server for development mode.
//!
//! Serves the staging tree directly, so what the browser sees is exactly
//! what a production build would promote. When the last rebuild failed, all
//! page requests answer with a diagnostics page instead of stale content.

use crate::dev::state::SharedState;
use crate::error::{CliError, Result};
use crate::ui;
use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};

/// Development HTTP server.
pub struct DevServer {
    port: u16,
    staging: PathBuf,
    state: SharedState,
}

#[derive(Clone)]
struct ServerContext {
    staging: PathBuf,
    state: SharedState,
}

impl DevServer {
    pub fn new(port: u16, staging: PathBuf, state: SharedState) -> Self {
        Self {
            port,
            staging,
            state,
        }
    }

    /// Bind and serve until the process exits.
    pub async fn serve(self) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| CliError::Server(format!("Failed to bind to {}: {}", addr, e)))?;

        ui::success(&format!(
            "Development server running at http://localhost:{}",
            self.port
        ));

        axum::serve(listener, app)
            .await
            .map_err(|e| CliError::Server(format!("Server error: {}", e)))
    }

    /// Build the router.
    ///
    /// Exposed so an embedding host can merge its own routes; everything not
    /// matched by the host falls through to staging-tree serving here.
    pub fn router(&self) -> Router {
        let context = ServerContext {
            staging: self.staging.clone(),
            state: self.state.clone(),
        };

        Router::new()
            .route("/favicon.ico", get(handle_favicon))
            .fallback(handle_request)
            .layer(
                // Dev only, so all origins are allowed.
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .with_state(context)
    }
}

/// Answer favicon probes without touching the staging tree.
async fn handle_favicon() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

/// Serve a file from the staging tree, or the diagnostics page after a
/// failed build.
async fn handle_request(State(context): State<ServerContext>, uri: Uri) -> Response {
    if let Some(diagnostics) = context.state.status().diagnostics() {
        return html_response(StatusCode::INTERNAL_SERVER_ERROR, diagnostics_page(diagnostics));
    }

    let path = uri.path();
    let relative = if path == "/" {
        "index.html"
    } else {
        path.trim_start_matches('/')
    };

    let file_path = context.staging.join(relative);
    match tokio::fs::read(&file_path).await {
        Ok(content) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, content_type_for(relative))
            .header(header::CACHE_CONTROL, "no-cache")
            .body(Body::from(content))
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response()),
        Err(_) => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from(format!("File not found: {}", path)))
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response()),
    }
}

fn html_response(status: StatusCode, html: String) -> Response {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from(html))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// Render the failed-build diagnostics page.
fn diagnostics_page(diagnostics: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>oligo build failed</title></head>\n\
         <body style=\"background:#1e1e1e;color:#f48771;font-family:monospace;padding:2em\">\n\
         <h1>Build failed</h1>\n<pre>{}</pre>\n</body>\n</html>\n",
        escape_html(diagnostics)
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Determine content type from file extension.
fn content_type_for(path: &str) -> &'static str {
    let extension = std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    match extension {
        "html" => "text/html; charset=utf-8",
        "js" | "mjs" => "application/javascript",
        "css" => "text/css",
        "json" | "map" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "wasm" => "application/wasm",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dev::state::{BuildStatus, DevState};
    use axum::body::to_bytes;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn server_with_staging(temp: &TempDir, status: BuildStatus) -> DevServer {
        let state = Arc::new(DevState::new());
        state.set_status(status);
        DevServer::new(0, temp.path().to_path_buf(), state)
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn request(path: &str) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .uri(path)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_serves_files_from_staging() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("js")).unwrap();
        fs::write(temp.path().join("js/app.js"), "void 0;").unwrap();

        let server = server_with_staging(&temp, BuildStatus::Success { duration_ms: 1 });
        let response = server.router().oneshot(request("/js/app.js")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/javascript"
        );
        assert_eq!(body_string(response).await, "void 0;");
    }

    #[tokio::test]
    async fn test_root_serves_index_html() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("index.html"), "<html></html>").unwrap();

        let server = server_with_staging(&temp, BuildStatus::Success { duration_ms: 1 });
        let response = server.router().oneshot(request("/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "<html></html>");
    }

    #[tokio::test]
    async fn test_missing_file_is_404() {
        let temp = TempDir::new().unwrap();
        let server = server_with_staging(&temp, BuildStatus::Success { duration_ms: 1 });
        let response = server.router().oneshot(request("/nope.js")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_failed_build_serves_diagnostics_page() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("index.html"), "stale").unwrap();

        let server = server_with_staging(
            &temp,
            BuildStatus::Failed {
                diagnostics: "error: <bad import>".to_string(),
            },
        );
        let response = server.router().oneshot(request("/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_string(response).await;
        assert!(body.contains("Build failed"));
        // Diagnostics are HTML-escaped.
        assert!(body.contains("&lt;bad import&gt;"));
        assert!(!body.contains("stale"));
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type_for("index.html"), "text/html; charset=utf-8");
        assert_eq!(content_type_for("js/app.abc123.js"), "application/javascript");
        assert_eq!(content_type_for("css/app.css"), "text/css");
        assert_eq!(content_type_for("icons/icon-32.png"), "image/png");
        assert_eq!(content_type_for("unknown.bin"), "application/octet-stream");
    }
}
