//! oligo - manifest-driven front-end build orchestrator.
//!
//! The binary entry point parses arguments, initializes logging, and runs one
//! build cycle. The process exit code is the only thing decided here; all
//! build logic lives in the library crates.

use clap::Parser;
use miette::Result;
use oligo_cli::{cli, commands, error, logger, ui};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // The version flag short-circuits everything else.
    if args.version {
        println!("oligo {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors();

    commands::build_execute(&args)
        .await
        .map_err(error::cli_error_to_miette)
}
