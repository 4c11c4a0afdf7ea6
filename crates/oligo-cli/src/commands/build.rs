//! The build command: one full build-and-promote cycle.

use crate::cli::Cli;
use crate::error::Result;
use crate::ui;
use oligo_bundler::{BundlerConfig, ExecCompiler, LanczosResizer, OutputPromoter};
use oligo_config::{Environment, Manifest};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Run one build cycle: load the manifest, synthesize the bundler
/// configuration, and drive the promoter to completion.
pub async fn execute(args: &Cli) -> Result<()> {
    let base = std::env::current_dir()?;
    let manifest_path = if args.config.is_absolute() {
        args.config.clone()
    } else {
        base.join(&args.config)
    };

    let manifest = Manifest::load(&manifest_path, &base)?;
    let environment = Environment::from_flags(args.dev, args.cordova);

    ui::info(&format!("Building {} bundle", environment));

    let config = BundlerConfig::synthesize(
        &manifest,
        environment,
        env!("CARGO_PKG_VERSION"),
        build_timestamp(),
        &manifest.staging_dir(),
    );

    let compiler = ExecCompiler::new(&args.bundler);
    let resizer = LanczosResizer;
    let promoter = OutputPromoter::new(&manifest, environment, &compiler, &resizer);
    let report = promoter.run(&config).await?;

    if report.converted_assets > 0 {
        ui::info(&format!("Converted {} image assets", report.converted_assets));
    }
    ui::success(&format!(
        "Build complete in {}",
        ui::format_duration(Duration::from_millis(report.compile_ms))
    ));

    Ok(())
}

/// Milliseconds since the epoch, injected into the bundle as a constant.
fn build_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
