//! Image asset generation pipeline.
//!
//! Fans each manifest [`AssetSpec`](oligo_config::AssetSpec) out into its
//! resize targets and executes them strictly sequentially, in declaration
//! order. Generated assets are a build precondition: the first failure aborts
//! the whole pipeline with the partial success count, and the caller treats
//! that as fatal.

use crate::error::AssetPipelineError;
use crate::fsops;
use async_trait::async_trait;
use oligo_config::Manifest;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// The image resize capability.
///
/// One method, so tests can substitute a deterministic fake for the decode /
/// resize / encode primitive.
#[async_trait]
pub trait ImageResizer: Send + Sync {
    async fn resize(
        &self,
        src: &Path,
        width: u32,
        height: u32,
        dest: &Path,
    ) -> Result<(), ResizeError>;
}

/// Failure of a single resize operation.
#[derive(Debug, Error)]
pub enum ResizeError {
    #[error("{0}")]
    Image(#[from] image::ImageError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("resize task failed: {0}")]
    Task(String),
}

/// Default [`ImageResizer`] backed by the `image` crate.
///
/// Decoding and encoding are CPU-bound, so each operation runs on the
/// blocking pool.
pub struct LanczosResizer;

#[async_trait]
impl ImageResizer for LanczosResizer {
    async fn resize(
        &self,
        src: &Path,
        width: u32,
        height: u32,
        dest: &Path,
    ) -> Result<(), ResizeError> {
        let src = src.to_path_buf();
        let dest = dest.to_path_buf();
        tokio::task::spawn_blocking(move || -> Result<(), ResizeError> {
            let img = image::open(&src)?;
            img.resize_exact(width, height, image::imageops::FilterType::Lanczos3)
                .save(&dest)?;
            Ok(())
        })
        .await
        .map_err(|e| ResizeError::Task(e.to_string()))?
    }
}

/// Expands asset specs into resize operations and executes them.
pub struct AssetPipeline<'a> {
    resizer: &'a dyn ImageResizer,
}

impl<'a> AssetPipeline<'a> {
    pub fn new(resizer: &'a dyn ImageResizer) -> Self {
        Self { resizer }
    }

    /// Run the whole pipeline for `manifest`, returning the number of
    /// successful conversions.
    ///
    /// Specs and their size variants are processed in declaration order.
    /// After all specs, the generated-assets tree is mirrored into the
    /// hybrid-shell assets tree when both are declared.
    pub async fn run(&self, manifest: &Manifest) -> Result<u32, AssetPipelineError> {
        let mut converted = 0u32;

        for spec in &manifest.assets {
            for target in spec.sizes.targets() {
                let dest = spec.output.substitute(&target.token);
                if let Some(parent) = dest.parent() {
                    tokio::fs::create_dir_all(parent).await.map_err(|source| {
                        AssetPipelineError::Io {
                            path: parent.to_path_buf(),
                            converted,
                            source,
                        }
                    })?;
                }

                debug!(
                    asset = %spec.name,
                    token = %target.token,
                    width = target.width,
                    height = target.height,
                    "resizing asset"
                );

                self.resizer
                    .resize(&spec.src, target.width, target.height, &dest)
                    .await
                    .map_err(|source| AssetPipelineError::Resize {
                        asset: spec.name.clone(),
                        token: target.token.clone(),
                        converted,
                        source,
                    })?;

                converted += 1;
            }
        }

        if let (Some(web), Some(cordova)) = (
            manifest.outputs.web_assets.as_deref(),
            manifest.outputs.cordova_assets.as_deref(),
        ) {
            info!(from = %web.display(), to = %cordova.display(), "mirroring asset tree");
            fsops::copy_tree(web, cordova)
                .await
                .map_err(|source| AssetPipelineError::Io {
                    path: web.to_path_buf(),
                    converted,
                    source,
                })?;
        }

        info!(converted, "converted assets");
        Ok(converted)
    }
}
