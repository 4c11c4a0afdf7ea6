//! Development server.
//!
//! Built for embedding: a host process constructs a [`DevServerAdapter`] and
//! hands it a manifest and compiler, and the adapter runs the initial
//! compile, the poll-based source watcher, and the HTTP server that serves
//! the staging tree. There is no programmatic shutdown; the embedding
//! process decides when to exit.

pub mod adapter;
pub mod server;
pub mod state;
pub mod watcher;

pub use adapter::DevServerAdapter;
pub use server::DevServer;
pub use state::{BuildStatus, DevState, SharedState};
pub use watcher::ChangeWatcher;

/// Port used when the manifest declares none.
pub const DEFAULT_PORT: u16 = 8080;
