//! The bundler capability seam.
//!
//! The actual module resolution/bundling/minification engine is an external
//! collaborator. [`Compiler`] is the narrow contract the promoter and dev
//! server depend on; [`ExecCompiler`] is the default implementation, which
//! serializes the synthesized configuration to JSON and spawns the configured
//! bundler executable.

use crate::config::BundlerConfig;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

/// One-shot compilation capability.
#[async_trait]
pub trait Compiler: Send + Sync {
    /// Run one compilation, blocking until it settles.
    ///
    /// A structural failure (the bundler could not run at all) is an `Err`;
    /// compile diagnostics come back inside [`CompileStats`].
    async fn compile(&self, config: &BundlerConfig) -> Result<CompileStats, CompileError>;
}

/// Outcome of one bundler invocation.
#[derive(Debug, Clone, Default)]
pub struct CompileStats {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub duration_ms: u64,
}

impl CompileStats {
    /// Whether the invocation produced error-severity diagnostics.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Render diagnostics for operator-facing output.
    pub fn format(&self) -> String {
        let mut lines = Vec::with_capacity(self.errors.len() + self.warnings.len());
        for error in &self.errors {
            lines.push(format!("error: {}", error.trim_end()));
        }
        for warning in &self.warnings {
            lines.push(format!("warning: {}", warning.trim_end()));
        }
        lines.join("\n")
    }
}

/// Structural bundler failures.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The bundler executable could not be spawned
    #[error("Failed to launch bundler '{command}': {source}\n\nHint: Check that the bundler is installed and on PATH, or pass --bundler <cmd>")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The synthesized configuration could not be staged for the bundler
    #[error("Failed to stage bundler configuration at {}: {source}", .path.display())]
    StageConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The synthesized configuration could not be serialized
    #[error("Failed to serialize bundler configuration: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Default [`Compiler`]: spawns an external bundler process.
///
/// The synthesized configuration is written as JSON next to the staging
/// directory (not inside it, so it is never promoted) and passed to the
/// command as `--config <path>`. A non-zero exit becomes compile
/// diagnostics, not a structural error.
pub struct ExecCompiler {
    command: String,
}

impl ExecCompiler {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn config_path(config: &BundlerConfig) -> PathBuf {
        let dir = &config.output.dir;
        match (dir.parent(), dir.file_name()) {
            (Some(parent), Some(name)) => {
                parent.join(format!("{}.config.json", name.to_string_lossy()))
            }
            _ => dir.join("bundler.config.json"),
        }
    }
}

#[async_trait]
impl Compiler for ExecCompiler {
    async fn compile(&self, config: &BundlerConfig) -> Result<CompileStats, CompileError> {
        let start = Instant::now();

        let config_path = Self::config_path(config);
        let serialized = serde_json::to_vec_pretty(config)?;
        tokio::fs::write(&config_path, serialized)
            .await
            .map_err(|source| CompileError::StageConfig {
                path: config_path.clone(),
                source,
            })?;

        debug!(command = %self.command, config = %config_path.display(), "invoking bundler");

        let output = tokio::process::Command::new(&self.command)
            .arg("--config")
            .arg(&config_path)
            .output()
            .await
            .map_err(|source| CompileError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let mut stats = CompileStats {
            duration_ms: start.elapsed().as_millis() as u64,
            ..CompileStats::default()
        };

        if output.status.success() {
            if !stderr.trim().is_empty() {
                stats.warnings.push(stderr);
            }
        } else {
            let diagnostic = if stderr.trim().is_empty() {
                format!("bundler exited with status {}", output.status)
            } else {
                stderr
            };
            stats.errors.push(diagnostic);
        }

        Ok(stats)
    }
}
