//! Command-line interface definition.
//!
//! oligo is a single-command tool: invoking it runs one build cycle against
//! the manifest in the working directory. Flags select the environment and
//! ambient behavior; there are no subcommands.

use clap::Parser;
use std::path::PathBuf;

/// oligo - manifest-driven front-end build orchestrator
#[derive(Parser, Debug)]
#[command(
    name = "oligo",
    disable_version_flag = true,
    about = "Manifest-driven front-end build orchestrator",
    long_about = "oligo reads an oligo.json manifest, generates image assets,\n\
                  synthesizes a bundler configuration, runs the bundler, and\n\
                  promotes the result into the environment-selected output tree."
)]
pub struct Cli {
    /// Print the version and exit
    #[arg(short = 'v', long = "version")]
    pub version: bool,

    /// Build for the development environment
    ///
    /// Takes precedence over --cordova when both are given.
    #[arg(long)]
    pub dev: bool,

    /// Build for the hybrid app shell (requires outputs.cordova in the manifest)
    #[arg(long)]
    pub cordova: bool,

    /// Path to the build manifest
    #[arg(long, value_name = "PATH", default_value = "oligo.json")]
    pub config: PathBuf,

    /// Bundler command to invoke
    #[arg(long, value_name = "CMD", default_value = "webpack")]
    pub bundler: String,

    /// Enable verbose logging (debug level)
    #[arg(long)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
