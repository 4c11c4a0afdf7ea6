//! Build orchestration core for oligo.
//!
//! This crate turns a loaded manifest into work:
//!
//! - [`config`] - synthesizes the [`BundlerConfig`] handed to the external
//!   bundling capability
//! - [`compiler`] - the [`Compiler`] capability seam and the process-spawning
//!   [`ExecCompiler`] default
//! - [`assets`] - the image [`AssetPipeline`] and the [`ImageResizer`]
//!   capability seam
//! - [`promote`] - the [`OutputPromoter`] build-and-promote sequence
//!
//! The external bundler and the image resize primitive are opaque
//! capabilities behind narrow traits, so tests substitute deterministic
//! fakes. Nothing in this crate terminates the process: every failure mode
//! is a typed [`BuildError`] surfaced to the caller, which owns the exit
//! decision.

pub mod assets;
pub mod compiler;
pub mod config;
pub mod error;
pub mod fsops;
pub mod promote;

pub use assets::{AssetPipeline, ImageResizer, LanczosResizer, ResizeError};
pub use compiler::{CompileError, CompileStats, Compiler, ExecCompiler};
pub use config::{BundlerConfig, SourceMapMode, StyleMode};
pub use error::{AssetPipelineError, BuildError, PromotionIoError};
pub use promote::{BuildReport, OutputPromoter};
