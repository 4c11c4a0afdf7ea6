//! Bundler configuration synthesis.
//!
//! [`BundlerConfig::synthesize`] is a pure mapping from
//! `(Manifest, Environment, version, build timestamp, staging dir)` to the
//! configuration handed to the external bundling capability. Calling it twice
//! with identical inputs yields structurally identical configuration; the
//! build timestamp is the only caller-injected varying value.

use indexmap::IndexMap;
use oligo_config::{Environment, Manifest};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Module prepended to every entry list so legacy runtimes get polyfills
/// before application code runs.
const POLYFILL_MODULE: &str = "babel-polyfill";

/// Browser support matrix the script transform targets.
const BROWSER_TARGETS: &[&str] = &[
    "Android >= 5",
    "IOS >= 9.3",
    "Edge >= 15",
    "Safari >= 9.1",
    "Chrome >= 49",
    "Firefox >= 31",
    "Samsung >= 5",
];

/// Configuration handed to the external bundling capability.
///
/// Built fresh on every synthesis call, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundlerConfig {
    /// "development" or "production".
    pub mode: String,
    /// Entry list; the polyfill module first, then the absolute entry path.
    pub entry: Vec<String>,
    pub output: OutputConfig,
    pub resolve: ResolutionConfig,
    pub devtool: SourceMapMode,
    pub transform: TransformConfig,
    pub styles: StyleConfig,
    pub html: HtmlConfig,
    /// Service-worker entry to inject a precache manifest into; omitted for
    /// hybrid-shell builds and when the manifest declares none.
    pub service_worker: Option<PathBuf>,
    pub defines: DefineValues,
    pub optimization: OptimizationConfig,
}

/// Where bundled artifacts land and how they are addressed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    /// Staging directory the bundler writes into.
    pub dir: PathBuf,
    /// Script artifact name pattern.
    pub filename: String,
    /// Public path prefix selected by the environment.
    pub public_path: String,
}

/// Module resolution settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionConfig {
    pub extensions: Vec<String>,
    pub aliases: IndexMap<String, String>,
}

/// Source-map verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceMapMode {
    /// Fast eval-style maps for development.
    Eval,
    /// Full external source maps.
    File,
}

/// Which sources run through the first-party script transform.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformConfig {
    /// Project root plus every allow-listed package resolved under the
    /// dependency root. Packages outside this set are served untransformed.
    pub include: Vec<PathBuf>,
    pub browser_targets: Vec<String>,
}

/// Stylesheet handling.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleConfig {
    pub mode: StyleMode,
    /// Extracted stylesheet artifact name (unused in inject mode).
    pub extract_filename: String,
}

/// Whether styles are injected at runtime or extracted to an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleMode {
    /// Runtime injection (development).
    Inject,
    /// Separate stylesheet artifact (production and hybrid shell).
    Extract,
}

/// Parameters for the HTML templating capability.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlConfig {
    pub template: PathBuf,
    pub filename: String,
    /// Materialized content-security-policy string, if directives were
    /// declared.
    pub csp: Option<String>,
    pub hybrid_shell: bool,
    /// Minify options; `None` in development.
    pub minify: Option<HtmlMinifyOptions>,
}

/// The fixed HTML minification option set applied outside development.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlMinifyOptions {
    pub collapse_whitespace: bool,
    pub remove_comments: bool,
    pub remove_redundant_attributes: bool,
    pub remove_script_type_attributes: bool,
    pub remove_style_link_type_attributes: bool,
    pub use_short_doctype: bool,
}

impl HtmlMinifyOptions {
    fn full() -> Self {
        Self {
            collapse_whitespace: true,
            remove_comments: true,
            remove_redundant_attributes: true,
            remove_script_type_attributes: true,
            remove_style_link_type_attributes: true,
            use_short_doctype: true,
        }
    }
}

/// Compile-time constants injected into application code.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefineValues {
    pub node_env: String,
    pub version: String,
    pub hybrid: bool,
    /// Build timestamp in milliseconds, injected by the caller.
    pub build_time: u64,
}

/// Optimization settings delegated to the bundler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationConfig {
    pub minify: bool,
    /// Split third-party modules into a vendor chunk.
    pub split_vendor_chunk: bool,
    /// Hash-based module ids so chunk hashes stay stable across builds.
    pub stable_module_ids: bool,
}

impl BundlerConfig {
    /// Synthesize the full configuration for one build.
    ///
    /// `staging` is the transient directory the bundler writes into before
    /// promotion; `build_time` is the injected timestamp constant.
    pub fn synthesize(
        manifest: &Manifest,
        env: Environment,
        version: &str,
        build_time: u64,
        staging: &Path,
    ) -> Self {
        let dev = env.is_development();
        let node_modules = manifest.node_modules();

        let mut include = vec![manifest.inputs.root.clone()];
        include.extend(manifest.modules.iter().map(|name| node_modules.join(name)));

        let mut aliases = IndexMap::new();
        aliases.insert("vue$".to_string(), "vue/dist/vue.esm.js".to_string());
        aliases.insert(
            "@".to_string(),
            manifest.inputs.root.to_string_lossy().into_owned(),
        );

        BundlerConfig {
            mode: env.mode().to_string(),
            entry: vec![
                POLYFILL_MODULE.to_string(),
                manifest.inputs.entry.to_string_lossy().into_owned(),
            ],
            output: OutputConfig {
                dir: staging.to_path_buf(),
                filename: "js/[name].[contenthash].js".to_string(),
                public_path: env.public_path().to_string(),
            },
            resolve: ResolutionConfig {
                extensions: vec![".js".to_string(), ".vue".to_string(), ".json".to_string()],
                aliases,
            },
            devtool: if dev {
                SourceMapMode::Eval
            } else {
                SourceMapMode::File
            },
            transform: TransformConfig {
                include,
                browser_targets: BROWSER_TARGETS.iter().map(|s| s.to_string()).collect(),
            },
            styles: StyleConfig {
                mode: if dev {
                    StyleMode::Inject
                } else {
                    StyleMode::Extract
                },
                extract_filename: "css/app.css".to_string(),
            },
            html: HtmlConfig {
                template: manifest.inputs.html.clone(),
                filename: "index.html".to_string(),
                csp: manifest.csp.as_ref().map(csp_to_policy),
                hybrid_shell: env.is_hybrid_shell(),
                minify: if dev {
                    None
                } else {
                    Some(HtmlMinifyOptions::full())
                },
            },
            service_worker: if env.is_hybrid_shell() {
                None
            } else {
                manifest.inputs.sw.clone()
            },
            defines: DefineValues {
                node_env: env.mode().to_string(),
                version: version.to_string(),
                hybrid: env.is_hybrid_shell(),
                build_time,
            },
            optimization: OptimizationConfig {
                minify: !dev,
                split_vendor_chunk: true,
                stable_module_ids: true,
            },
        }
    }
}

/// Materialize CSP directives into a single policy string.
///
/// Directive names arrive in camelCase and are rendered in hyphenated
/// lowercase token form (`defaultSrc` → `default-src`); each clause is the
/// token followed by its space-joined source list, clauses joined by `"; "`.
pub fn csp_to_policy(directives: &IndexMap<String, Vec<String>>) -> String {
    directives
        .iter()
        .map(|(name, sources)| format!("{} {}", hyphenate(name), sources.join(" ")))
        .collect::<Vec<_>>()
        .join("; ")
}

fn hyphenate(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
