//! Error handling for the CLI layer.
//!
//! [`CliError`] wraps the typed errors of the library crates plus the failure
//! modes that only exist at this layer (server binding, file watching). The
//! binary converts it to a miette [`Report`] at the very end; nothing below
//! `main` terminates the process.

use miette::Report;
use oligo_bundler::BuildError;
use oligo_config::ManifestError;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Manifest loading or validation failed
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// The build-and-promote cycle failed
    #[error(transparent)]
    Build(#[from] BuildError),

    /// I/O errors from the driver itself (e.g. resolving the working directory)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Development server errors
    #[error("Server error: {0}")]
    Server(String),

    /// File watching errors
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Convert a [`CliError`] to a miette [`Report`] for terminal rendering.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        // Compile diagnostics are already operator-facing text.
        CliError::Build(BuildError::Compile { diagnostics }) => {
            miette::miette!("Build failed with compile errors:\n\n{}", diagnostics)
        }
        other => miette::miette!("{}", other),
    }
}
