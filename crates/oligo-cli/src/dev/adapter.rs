//! The embeddable dev-mode entry point.

use crate::dev::server::DevServer;
use crate::dev::state::{BuildStatus, DevState, SharedState};
use crate::dev::watcher::ChangeWatcher;
use crate::dev::DEFAULT_PORT;
use crate::error::Result;
use oligo_bundler::{BundlerConfig, Compiler};
use oligo_config::{Environment, Manifest};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// Runs development mode: an initial compile, a poll-based watcher that
/// recompiles on source changes, and an HTTP server over the staging tree.
///
/// Always builds for [`Environment::Development`] regardless of what the
/// manifest or embedding host would use for deployment.
pub struct DevServerAdapter {
    manifest: Manifest,
    compiler: Arc<dyn Compiler>,
    version: String,
}

impl DevServerAdapter {
    pub fn new(manifest: Manifest, compiler: Arc<dyn Compiler>, version: impl Into<String>) -> Self {
        Self {
            manifest,
            compiler,
            version: version.into(),
        }
    }

    /// The port the server will bind, from the manifest or the default.
    pub fn port(&self) -> u16 {
        self.manifest.port.unwrap_or(DEFAULT_PORT)
    }

    /// Compile once, keep recompiling on change, and serve until the process
    /// exits.
    pub async fn run(self) -> Result<()> {
        let state: SharedState = Arc::new(DevState::new());
        let port = self.port();
        let staging = self.manifest.staging_dir();

        self.rebuild(&state).await;

        let (watcher, mut changes) = ChangeWatcher::new(self.manifest.inputs.root.clone())?;
        let adapter = Arc::new(self);
        let rebuild_state = state.clone();
        let rebuild_adapter = adapter.clone();
        tokio::spawn(async move {
            // Moved in so polling outlives this loop.
            let _watcher = watcher;
            while let Some(path) = changes.recv().await {
                debug!(path = %path.display(), "source change");
                // Collapse the burst of events a single save produces.
                while changes.try_recv().is_ok() {}
                rebuild_adapter.rebuild(&rebuild_state).await;
            }
        });

        DevServer::new(port, staging, state).serve().await
    }

    /// Run one development compile and publish its outcome.
    async fn rebuild(&self, state: &SharedState) {
        state.set_status(BuildStatus::InProgress);
        info!("compiling");

        let config = BundlerConfig::synthesize(
            &self.manifest,
            Environment::Development,
            &self.version,
            timestamp(),
            &self.manifest.staging_dir(),
        );

        match self.compiler.compile(&config).await {
            Ok(stats) if stats.has_errors() => {
                info!("compile failed");
                state.set_status(BuildStatus::Failed {
                    diagnostics: stats.format(),
                });
            }
            Ok(stats) => {
                info!(duration_ms = stats.duration_ms, "compile finished");
                state.set_status(BuildStatus::Success {
                    duration_ms: stats.duration_ms,
                });
            }
            Err(e) => {
                state.set_status(BuildStatus::Failed {
                    diagnostics: e.to_string(),
                });
            }
        }
    }
}

fn timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use oligo_bundler::{CompileError, CompileStats};
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct CountingCompiler {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingCompiler {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl Compiler for CountingCompiler {
        async fn compile(&self, config: &BundlerConfig) -> Result<CompileStats, CompileError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(config.mode, "development");
            if self.fail {
                Ok(CompileStats {
                    errors: vec!["unexpected token".to_string()],
                    warnings: Vec::new(),
                    duration_ms: 1,
                })
            } else {
                Ok(CompileStats {
                    duration_ms: 1,
                    ..CompileStats::default()
                })
            }
        }
    }

    fn manifest(temp: &TempDir, port: Option<u16>) -> Manifest {
        let port_field = port.map(|p| format!(", \"port\": {}", p)).unwrap_or_default();
        let text = format!(
            r#"{{
                "inputs": {{"root": "src", "entry": "src/main.js", "html": "src/index.html"}},
                "outputs": {{"web": "dist"}}{}
            }}"#,
            port_field
        );
        let path = temp.path().join("oligo.json");
        fs::write(&path, text).unwrap();
        Manifest::load(&path, temp.path()).unwrap()
    }

    #[test]
    fn test_port_defaults_to_8080() {
        let temp = TempDir::new().unwrap();
        let adapter = DevServerAdapter::new(
            manifest(&temp, None),
            Arc::new(CountingCompiler::new(false)),
            "0.0.0",
        );
        assert_eq!(adapter.port(), 8080);
    }

    #[test]
    fn test_port_from_manifest() {
        let temp = TempDir::new().unwrap();
        let adapter = DevServerAdapter::new(
            manifest(&temp, Some(9033)),
            Arc::new(CountingCompiler::new(false)),
            "0.0.0",
        );
        assert_eq!(adapter.port(), 9033);
    }

    #[tokio::test]
    async fn test_rebuild_publishes_success() {
        let temp = TempDir::new().unwrap();
        let compiler = Arc::new(CountingCompiler::new(false));
        let adapter = DevServerAdapter::new(manifest(&temp, None), compiler.clone(), "0.0.0");

        let state: SharedState = Arc::new(DevState::new());
        adapter.rebuild(&state).await;

        assert!(state.status().is_success());
        assert_eq!(compiler.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rebuild_publishes_diagnostics_on_failure() {
        let temp = TempDir::new().unwrap();
        let adapter = DevServerAdapter::new(
            manifest(&temp, None),
            Arc::new(CountingCompiler::new(true)),
            "0.0.0",
        );

        let state: SharedState = Arc::new(DevState::new());
        adapter.rebuild(&state).await;

        let diagnostics = state.status().diagnostics().unwrap().to_string();
        assert!(diagnostics.contains("unexpected token"));
    }
}
