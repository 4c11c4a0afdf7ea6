//! Error taxonomy for the build core.
//!
//! Every failure surfaces to the top-level driver as a [`BuildError`];
//! nothing here exits the process and nothing is retried. Each variant maps
//! to an operator action: fix the manifest, fix the asset, or fix the
//! environment.

use crate::assets::ResizeError;
use crate::compiler::CompileError;
use oligo_config::ManifestError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level build failure.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Manifest constraint violated at build time (e.g. hybrid build with no
    /// cordova output)
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// The bundler reported compile diagnostics with error severity
    #[error("Bundler reported compile errors:\n{diagnostics}")]
    Compile { diagnostics: String },

    /// The bundler could not be invoked at all
    #[error(transparent)]
    Compiler(#[from] CompileError),

    /// Asset generation failed partway through
    #[error(transparent)]
    Assets(#[from] AssetPipelineError),

    /// A filesystem step of the promotion sequence failed
    #[error(transparent)]
    Promotion(#[from] PromotionIoError),
}

/// Fatal asset pipeline failure carrying the partial success count.
#[derive(Debug, Error)]
pub enum AssetPipelineError {
    /// A resize invocation failed
    #[error("Conversion failed after {converted} assets: '{asset}' ({token}): {source}")]
    Resize {
        /// Logical asset name from the manifest
        asset: String,
        /// Size token of the failing variant
        token: String,
        /// Conversions completed before the failure
        converted: u32,
        #[source]
        source: ResizeError,
    },

    /// A filesystem operation within the pipeline failed
    #[error("Conversion failed after {converted} assets: {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        converted: u32,
        #[source]
        source: std::io::Error,
    },
}

impl AssetPipelineError {
    /// Conversions that completed before the pipeline aborted.
    pub fn converted(&self) -> u32 {
        match self {
            AssetPipelineError::Resize { converted, .. }
            | AssetPipelineError::Io { converted, .. } => *converted,
        }
    }
}

/// A failed filesystem operation in the promotion sequence.
#[derive(Debug, Error)]
#[error("Promotion failed while trying to {action} {}: {source}", .path.display())]
pub struct PromotionIoError {
    /// Human-readable description of the attempted operation
    pub action: &'static str,
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}
