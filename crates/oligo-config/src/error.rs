//! Manifest loading and validation errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating the project manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Manifest file doesn't exist at the expected location
    #[error("Manifest not found: {}\n\nHint: Create an oligo.json in the project root or pass --config <path>", .0.display())]
    NotFound(PathBuf),

    /// Manifest has invalid JSON syntax or field types
    #[error("Invalid manifest: {0}\n\nHint: Check oligo.json syntax and field types")]
    InvalidJson(#[from] serde_json::Error),

    /// Asset output template is missing the size placeholder
    #[error("Asset '{asset}' output template {template:?} has no {{{{size}}}} placeholder\n\nHint: Each asset output path must contain {{{{size}}}} so variants don't overwrite each other")]
    MissingSizeToken {
        /// Logical asset name
        asset: String,
        /// The offending template text
        template: String,
    },

    /// Hybrid-shell build requested but no cordova destination is declared
    #[error("Manifest declares no cordova output but the build targets the hybrid shell\n\nHint: Add outputs.cordova to oligo.json or drop --cordova")]
    MissingHybridOutput,

    /// I/O error while reading the manifest
    #[error("Failed to read manifest: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = ManifestError::NotFound(PathBuf::from("oligo.json"));
        let msg = err.to_string();
        assert!(msg.contains("Manifest not found"));
        assert!(msg.contains("oligo.json"));
        assert!(msg.contains("Hint:"));
    }

    #[test]
    fn test_missing_size_token_message() {
        let err = ManifestError::MissingSizeToken {
            asset: "icon".to_string(),
            template: "icons/icon.png".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("icon"));
        assert!(msg.contains("{{size}}"));
    }
}
