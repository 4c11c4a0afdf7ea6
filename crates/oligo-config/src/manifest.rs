//! The project manifest (`oligo.json`).
//!
//! Loading is two-phase: a private serde representation mirrors the JSON
//! document, then [`Manifest::load`] resolves every path against the process
//! working directory and decides all polymorphic shapes. The resulting
//! [`Manifest`] is immutable for the rest of the process lifetime.

use crate::environment::Environment;
use crate::error::ManifestError;
use crate::sizes::SizeSpec;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Placeholder token replaced with the size label in asset output templates.
pub const SIZE_TOKEN: &str = "{{size}}";

/// Fully resolved build manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Working directory captured at load time; all paths below are anchored
    /// to it and never re-resolved.
    pub base: PathBuf,
    pub inputs: Inputs,
    pub outputs: Outputs,
    /// Packages opted into the first-party transform pipeline.
    pub modules: Vec<String>,
    /// Content-security-policy directives in declaration order, keyed by
    /// camelCase directive name (e.g. `defaultSrc`).
    pub csp: Option<IndexMap<String, Vec<String>>>,
    /// Image asset generation rules in declaration order.
    pub assets: Vec<AssetSpec>,
    /// Auxiliary files copied verbatim after promotion.
    pub copy: Vec<CopyRule>,
    /// Dev server port.
    pub port: Option<u16>,
}

/// Source inputs.
#[derive(Debug, Clone)]
pub struct Inputs {
    /// Project source root (first-party code).
    pub root: PathBuf,
    /// Entry module handed to the bundler.
    pub entry: PathBuf,
    /// HTML template.
    pub html: PathBuf,
    /// Optional service-worker entry.
    pub sw: Option<PathBuf>,
}

/// Destination trees.
#[derive(Debug, Clone)]
pub struct Outputs {
    /// Web deployment destination.
    pub web: PathBuf,
    /// Hybrid app shell destination.
    pub cordova: Option<PathBuf>,
    /// Generated-assets tree for the web target.
    pub web_assets: Option<PathBuf>,
    /// Generated-assets tree duplicated for hybrid-shell packaging.
    pub cordova_assets: Option<PathBuf>,
}

/// One named image-asset generation rule.
#[derive(Debug, Clone)]
pub struct AssetSpec {
    /// Logical asset name (the manifest map key).
    pub name: String,
    /// Source image.
    pub src: PathBuf,
    /// Decided size specification.
    pub sizes: SizeSpec,
    /// Output path template containing the `{{size}}` placeholder.
    pub output: OutputTemplate,
}

/// One auxiliary copy rule, source and destination resolved at load.
#[derive(Debug, Clone)]
pub struct CopyRule {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// An output path template validated to contain the `{{size}}` placeholder.
#[derive(Debug, Clone)]
pub struct OutputTemplate(String);

impl OutputTemplate {
    fn new(asset: &str, template: String) -> Result<Self, ManifestError> {
        if !template.contains(SIZE_TOKEN) {
            return Err(ManifestError::MissingSizeToken {
                asset: asset.to_string(),
                template,
            });
        }
        Ok(OutputTemplate(template))
    }

    /// Replace every `{{size}}` occurrence with the given token.
    pub fn substitute(&self, token: &str) -> PathBuf {
        PathBuf::from(self.0.replace(SIZE_TOKEN, token))
    }

    /// The raw template text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManifestFile {
    inputs: InputsFile,
    outputs: OutputsFile,
    #[serde(default)]
    modules: Vec<String>,
    csp: Option<IndexMap<String, Vec<String>>>,
    assets: Option<IndexMap<String, AssetSpecFile>>,
    copy: Option<IndexMap<String, String>>,
    port: Option<u16>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InputsFile {
    root: String,
    entry: String,
    html: String,
    sw: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OutputsFile {
    web: String,
    cordova: Option<String>,
    web_assets: Option<String>,
    cordova_assets: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetSpecFile {
    src: String,
    sizes: SizeSpec,
    output: String,
}

impl Manifest {
    /// Load and resolve the manifest at `path`, anchoring every declared path
    /// to `base`.
    pub fn load(path: &Path, base: &Path) -> Result<Self, ManifestError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ManifestError::NotFound(path.to_path_buf())
            } else {
                ManifestError::Io(e)
            }
        })?;
        let file: ManifestFile = serde_json::from_str(&text)?;
        Self::from_file(file, base)
    }

    fn from_file(file: ManifestFile, base: &Path) -> Result<Self, ManifestError> {
        let anchor = |rel: &str| -> PathBuf { base.join(rel) };

        let inputs = Inputs {
            root: anchor(&file.inputs.root),
            entry: anchor(&file.inputs.entry),
            html: anchor(&file.inputs.html),
            sw: file.inputs.sw.as_deref().map(anchor),
        };

        let outputs = Outputs {
            web: anchor(&file.outputs.web),
            cordova: file.outputs.cordova.as_deref().map(anchor),
            web_assets: file.outputs.web_assets.as_deref().map(anchor),
            cordova_assets: file.outputs.cordova_assets.as_deref().map(anchor),
        };

        let mut assets = Vec::new();
        for (name, spec) in file.assets.into_iter().flatten() {
            let template = anchor(&spec.output).to_string_lossy().into_owned();
            assets.push(AssetSpec {
                src: anchor(&spec.src),
                sizes: spec.sizes,
                output: OutputTemplate::new(&name, template)?,
                name,
            });
        }

        let copy = file
            .copy
            .into_iter()
            .flatten()
            .map(|(from, to)| CopyRule {
                from: anchor(&from),
                to: anchor(&to),
            })
            .collect();

        Ok(Manifest {
            base: base.to_path_buf(),
            inputs,
            outputs,
            modules: file.modules,
            csp: file.csp,
            assets,
            copy,
            port: file.port,
        })
    }

    /// The destination tree selected by the build environment.
    ///
    /// A hybrid-shell build requires `outputs.cordova` to be declared.
    pub fn destination(&self, env: Environment) -> Result<&Path, ManifestError> {
        if env.is_hybrid_shell() {
            self.outputs
                .cordova
                .as_deref()
                .ok_or(ManifestError::MissingHybridOutput)
        } else {
            Ok(&self.outputs.web)
        }
    }

    /// Transient build-staging directory for this project.
    pub fn staging_dir(&self) -> PathBuf {
        self.base.join(".oligo-staging")
    }

    /// Dependency root under which allow-listed packages are resolved.
    pub fn node_modules(&self) -> PathBuf {
        self.base.join("node_modules")
    }
}
