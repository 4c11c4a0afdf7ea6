//! End-to-end tests for the build-and-promote sequence with fake bundler and
//! resize capabilities.

use async_trait::async_trait;
use oligo_bundler::{
    BuildError, BundlerConfig, CompileError, CompileStats, Compiler, ImageResizer, OutputPromoter,
    ResizeError,
};
use oligo_config::{Environment, Manifest, ManifestError};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tempfile::TempDir;

/// Writes a plausible bundle into the staging directory, or reports a compile
/// error without touching the filesystem.
struct FakeCompiler {
    fail: bool,
    invoked: AtomicBool,
}

impl FakeCompiler {
    fn succeeding() -> Self {
        Self {
            fail: false,
            invoked: AtomicBool::new(false),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            invoked: AtomicBool::new(false),
        }
    }

    fn was_invoked(&self) -> bool {
        self.invoked.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Compiler for FakeCompiler {
    async fn compile(&self, config: &BundlerConfig) -> Result<CompileStats, CompileError> {
        self.invoked.store(true, Ordering::SeqCst);
        if self.fail {
            return Ok(CompileStats {
                errors: vec!["Module not found: ./missing".to_string()],
                warnings: Vec::new(),
                duration_ms: 5,
            });
        }
        let staging = &config.output.dir;
        fs::create_dir_all(staging.join("js")).unwrap();
        fs::write(staging.join("js/app.js"), "void 0;").unwrap();
        fs::write(staging.join("index.html"), "<html></html>").unwrap();
        Ok(CompileStats {
            duration_ms: 5,
            ..CompileStats::default()
        })
    }
}

/// Writes a `WxH` marker file instead of a real image.
struct StubResizer;

#[async_trait]
impl ImageResizer for StubResizer {
    async fn resize(
        &self,
        _src: &Path,
        width: u32,
        height: u32,
        dest: &Path,
    ) -> Result<(), ResizeError> {
        fs::write(dest, format!("{}x{}", width, height)).map_err(ResizeError::Io)?;
        Ok(())
    }
}

/// Always fails, so the pipeline aborts before the compiler can run.
struct BrokenResizer;

#[async_trait]
impl ImageResizer for BrokenResizer {
    async fn resize(
        &self,
        _src: &Path,
        _width: u32,
        _height: u32,
        _dest: &Path,
    ) -> Result<(), ResizeError> {
        Err(ResizeError::Task("corrupt source image".to_string()))
    }
}

fn load_manifest(temp: &TempDir, text: &str) -> Manifest {
    let path = temp.path().join("oligo.json");
    fs::write(&path, text).unwrap();
    Manifest::load(&path, temp.path()).unwrap()
}

fn production_config(manifest: &Manifest) -> BundlerConfig {
    BundlerConfig::synthesize(
        manifest,
        Environment::Production,
        "1.0.0",
        0,
        &manifest.staging_dir(),
    )
}

const FULL_MANIFEST: &str = r#"{
    "inputs": {"root": "src", "entry": "src/main.js", "html": "src/index.html"},
    "outputs": {"web": "dist/web", "webAssets": "assets/web"},
    "assets": {
        "icon": {
            "src": "art/icon.png",
            "sizes": [16, 32],
            "output": "assets/web/icons/icon-{{size}}.png"
        }
    },
    "copy": {
        "README.md": "dist/README.md"
    }
}"#;

#[tokio::test]
async fn test_successful_build_promotes_staging_and_copies_auxiliaries() {
    let temp = TempDir::new().unwrap();
    let manifest = load_manifest(&temp, FULL_MANIFEST);
    fs::write(temp.path().join("README.md"), "# oligo project").unwrap();

    let compiler = FakeCompiler::succeeding();
    let promoter = OutputPromoter::new(&manifest, Environment::Production, &compiler, &StubResizer);
    let report = promoter.run(&production_config(&manifest)).await.unwrap();

    assert_eq!(report.converted_assets, 2);
    assert!(compiler.was_invoked());

    // Bundle promoted into the destination, staging gone.
    let dest = temp.path().join("dist/web");
    assert_eq!(
        fs::read_to_string(dest.join("js/app.js")).unwrap(),
        "void 0;"
    );
    assert_eq!(
        fs::read_to_string(dest.join("index.html")).unwrap(),
        "<html></html>"
    );
    assert!(!temp.path().join(".oligo-staging").exists());

    // Generated assets and auxiliary copies in place.
    let assets = temp.path().join("assets/web/icons");
    assert!(assets.join("icon-16.png").exists());
    assert!(assets.join("icon-32.png").exists());
    assert_eq!(
        fs::read_to_string(temp.path().join("dist/README.md")).unwrap(),
        "# oligo project"
    );
}

#[tokio::test]
async fn test_compile_error_leaves_destination_untouched() {
    let temp = TempDir::new().unwrap();
    let manifest = load_manifest(
        &temp,
        r#"{
            "inputs": {"root": "src", "entry": "src/main.js", "html": "src/index.html"},
            "outputs": {"web": "dist/web"}
        }"#,
    );

    // A previous successful deployment.
    let dest = temp.path().join("dist/web");
    fs::create_dir_all(&dest).unwrap();
    fs::write(dest.join("index.html"), "previous deploy").unwrap();

    let compiler = FakeCompiler::failing();
    let promoter = OutputPromoter::new(&manifest, Environment::Production, &compiler, &StubResizer);
    let err = promoter
        .run(&production_config(&manifest))
        .await
        .unwrap_err();

    match err {
        BuildError::Compile { diagnostics } => {
            assert!(diagnostics.contains("Module not found"));
        }
        other => panic!("expected compile error, got {other:?}"),
    }
    assert_eq!(
        fs::read_to_string(dest.join("index.html")).unwrap(),
        "previous deploy"
    );
}

#[tokio::test]
async fn test_asset_failure_aborts_before_the_bundler_runs() {
    let temp = TempDir::new().unwrap();
    let manifest = load_manifest(&temp, FULL_MANIFEST);

    let compiler = FakeCompiler::succeeding();
    let promoter = OutputPromoter::new(
        &manifest,
        Environment::Production,
        &compiler,
        &BrokenResizer,
    );
    let err = promoter
        .run(&production_config(&manifest))
        .await
        .unwrap_err();

    assert!(matches!(err, BuildError::Assets(_)));
    assert!(!compiler.was_invoked());
}

#[tokio::test]
async fn test_hybrid_build_without_cordova_output_is_rejected_up_front() {
    let temp = TempDir::new().unwrap();
    let manifest = load_manifest(
        &temp,
        r#"{
            "inputs": {"root": "src", "entry": "src/main.js", "html": "src/index.html"},
            "outputs": {"web": "dist/web"}
        }"#,
    );

    let compiler = FakeCompiler::succeeding();
    let promoter = OutputPromoter::new(
        &manifest,
        Environment::HybridShell,
        &compiler,
        &StubResizer,
    );
    let config = BundlerConfig::synthesize(
        &manifest,
        Environment::HybridShell,
        "1.0.0",
        0,
        &manifest.staging_dir(),
    );
    let err = promoter.run(&config).await.unwrap_err();

    assert!(matches!(
        err,
        BuildError::Manifest(ManifestError::MissingHybridOutput)
    ));
    assert!(!compiler.was_invoked());
}

#[tokio::test]
async fn test_stale_staging_and_asset_trees_are_cleared_first() {
    let temp = TempDir::new().unwrap();
    let manifest = load_manifest(
        &temp,
        r#"{
            "inputs": {"root": "src", "entry": "src/main.js", "html": "src/index.html"},
            "outputs": {
                "web": "dist/web",
                "webAssets": "assets/web",
                "cordovaAssets": "assets/cordova"
            }
        }"#,
    );

    // Leftovers from an interrupted run.
    let staging = temp.path().join(".oligo-staging");
    fs::create_dir_all(&staging).unwrap();
    fs::write(staging.join("stale.js"), "old").unwrap();
    fs::create_dir_all(temp.path().join("assets/web")).unwrap();
    fs::write(temp.path().join("assets/web/stale.png"), "old").unwrap();

    let compiler = FakeCompiler::succeeding();
    let promoter = OutputPromoter::new(&manifest, Environment::Production, &compiler, &StubResizer);
    promoter.run(&production_config(&manifest)).await.unwrap();

    assert!(!staging.exists());
    assert!(!temp.path().join("assets/web/stale.png").exists());
    assert!(!temp
        .path()
        .join("dist/web/stale.js")
        .exists());
}
