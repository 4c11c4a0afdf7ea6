//! Manifest model for the oligo build orchestrator.
//!
//! This crate provides the typed representation of the `oligo.json` project
//! manifest and the build [`Environment`]. The manifest is loaded exactly once
//! per process; every path field is resolved against the working directory at
//! load time and never re-resolved afterwards.
//!
//! The polymorphic `sizes` field of an asset spec (numbers, `"WxH"` strings,
//! or a fixed-key density map) is decided into the tagged [`SizeSpec`] variant
//! during deserialization, so downstream consumers never probe JSON shapes.

pub mod environment;
pub mod error;
pub mod manifest;
pub mod sizes;

pub use environment::Environment;
pub use error::ManifestError;
pub use manifest::{AssetSpec, CopyRule, Inputs, Manifest, Outputs, OutputTemplate, SIZE_TOKEN};
pub use sizes::{DensityMap, ResizeTarget, SizeEntry, SizeSpec};
