//! Library surface of the oligo CLI.
//!
//! Everything the binary does is exposed here so host applications can embed
//! the same machinery, most notably the [`dev::DevServerAdapter`] which runs
//! the watch-and-serve loop inside a larger server process.

pub mod cli;
pub mod commands;
pub mod dev;
pub mod error;
pub mod logger;
pub mod ui;
