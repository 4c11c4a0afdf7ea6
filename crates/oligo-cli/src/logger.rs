//! Logging infrastructure for the oligo CLI.
//!
//! Structured logging through the `tracing` ecosystem. Verbosity is decided
//! once at startup from the global flags, with `RUST_LOG` as an escape hatch
//! for custom filters.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber with the specified options.
///
/// Should be called once at the start of the program, before any logging
/// occurs.
///
/// The logging level is determined in this order:
/// 1. `--verbose` flag: DEBUG for oligo crates
/// 2. `--quiet` flag: errors only
/// 3. `RUST_LOG` environment variable: custom filter
/// 4. Default: INFO for oligo crates
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new("oligo=debug,oligo_config=debug,oligo_bundler=debug,oligo_cli=debug")
    } else if quiet {
        EnvFilter::new("oligo=error,oligo_config=error,oligo_bundler=error,oligo_cli=error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("oligo=info,oligo_config=info,oligo_bundler=info,oligo_cli=info")
        })
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
