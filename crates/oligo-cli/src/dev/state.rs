//! Shared state between the rebuild loop and the request handlers.

use parking_lot::RwLock;
use std::sync::Arc;

/// Build status tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStatus {
    /// No build has been performed yet
    NotStarted,
    /// A build is currently running
    InProgress,
    /// Last build completed successfully
    Success { duration_ms: u64 },
    /// Last build failed
    Failed { diagnostics: String },
}

impl BuildStatus {
    /// Check if a build is currently running.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, BuildStatus::InProgress)
    }

    /// Check if the last build succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, BuildStatus::Success { .. })
    }

    /// Diagnostics text if the last build failed.
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            BuildStatus::Failed { diagnostics } => Some(diagnostics),
            _ => None,
        }
    }
}

/// State shared between the rebuild loop and request handlers.
#[derive(Debug)]
pub struct DevState {
    status: RwLock<BuildStatus>,
}

impl DevState {
    pub fn new() -> Self {
        Self {
            status: RwLock::new(BuildStatus::NotStarted),
        }
    }

    pub fn status(&self) -> BuildStatus {
        self.status.read().clone()
    }

    pub fn set_status(&self, status: BuildStatus) {
        *self.status.write() = status;
    }
}

impl Default for DevState {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe handle shared across tasks.
pub type SharedState = Arc<DevState>;
