//! The build-and-promote sequence.
//!
//! [`OutputPromoter::run`] drives one full build cycle to a consistent
//! destination state even though the underlying filesystem steps are not
//! transactional. The steps are strictly ordered so that a crash mid-sequence
//! leaves, at worst, a missing or half-populated destination that a re-run
//! repairs from a clean staging directory; no step depends on a prior run
//! having succeeded.

use crate::assets::{AssetPipeline, ImageResizer};
use crate::compiler::Compiler;
use crate::config::BundlerConfig;
use crate::error::{BuildError, PromotionIoError};
use crate::fsops;
use oligo_config::{Environment, Manifest};
use std::path::Path;
use tracing::info;

/// Outcome of one successful build-and-promote cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    /// Image conversions completed by the asset pipeline.
    pub converted_assets: u32,
    /// Bundler wall time in milliseconds.
    pub compile_ms: u64,
}

/// Sequences staging lifecycle, asset generation, compilation, and the move
/// of results into the environment-selected destination tree.
pub struct OutputPromoter<'a> {
    manifest: &'a Manifest,
    environment: Environment,
    compiler: &'a dyn Compiler,
    resizer: &'a dyn ImageResizer,
}

impl<'a> OutputPromoter<'a> {
    pub fn new(
        manifest: &'a Manifest,
        environment: Environment,
        compiler: &'a dyn Compiler,
        resizer: &'a dyn ImageResizer,
    ) -> Self {
        Self {
            manifest,
            environment,
            compiler,
            resizer,
        }
    }

    /// Run one full cycle. Each step's failure aborts all subsequent steps.
    pub async fn run(&self, config: &BundlerConfig) -> Result<BuildReport, BuildError> {
        let destination = self.manifest.destination(self.environment)?;
        let staging = self.manifest.staging_dir();

        // 1. Stale generated-asset trees from a prior run; they are rebuilt
        //    from scratch by the pipeline below.
        for tree in [
            self.manifest.outputs.web_assets.as_deref(),
            self.manifest.outputs.cordova_assets.as_deref(),
        ]
        .into_iter()
        .flatten()
        {
            remove(tree, "remove stale asset tree").await?;
        }

        // 2. Stale staging directory.
        remove(&staging, "remove stale staging directory").await?;

        // 3. Assets are generated before the bundler runs so bundled output
        //    can reference them.
        let converted_assets = if self.manifest.assets.is_empty() {
            0
        } else {
            AssetPipeline::new(self.resizer).run(self.manifest).await?
        };

        // 4. One-shot compile, blocking until the bundler settles.
        info!(env = %self.environment, "bundling (this can take a few minutes)");
        let stats = self.compiler.compile(config).await?;

        // 5. Error-severity diagnostics are fatal and never retried.
        if stats.has_errors() {
            return Err(BuildError::Compile {
                diagnostics: stats.format(),
            });
        }

        // 6. Replace the destination with the staging contents. Copy then
        //    delete source; no atomic cross-device rename is assumed.
        info!(to = %destination.display(), "promoting build output");
        remove(destination, "remove stale destination").await?;
        fsops::copy_tree(&staging, destination)
            .await
            .map_err(|source| PromotionIoError {
                action: "promote staging directory to",
                path: destination.to_path_buf(),
                source,
            })?;
        remove(&staging, "remove staging directory").await?;

        // 7. Auxiliary copies.
        for rule in &self.manifest.copy {
            fsops::copy_path(&rule.from, &rule.to)
                .await
                .map_err(|source| PromotionIoError {
                    action: "copy auxiliary file to",
                    path: rule.to.clone(),
                    source,
                })?;
            info!(from = %rule.from.display(), to = %rule.to.display(), "copied");
        }

        Ok(BuildReport {
            converted_assets,
            compile_ms: stats.duration_ms,
        })
    }
}

async fn remove(path: &Path, action: &'static str) -> Result<(), PromotionIoError> {
    fsops::remove_existing(path)
        .await
        .map_err(|source| PromotionIoError {
            action,
            path: path.to_path_buf(),
            source,
        })
}
