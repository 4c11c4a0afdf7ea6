//! Poll-based source watcher for development mode.
//!
//! Polling is deliberate: the watcher must behave identically on local
//! filesystems, network mounts, and containers, so the platform-native
//! backends are not used. The interval is fixed at one second.

use crate::error::Result;
use notify::{Config, Event, EventKind, PollWatcher, RecursiveMode, Watcher};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

/// Fixed polling interval.
pub const POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Watches the project source root and reports changed paths.
///
/// Dropping the watcher stops the polling thread, so it must be kept alive
/// for as long as change events are wanted.
pub struct ChangeWatcher {
    _watcher: PollWatcher,
}

impl ChangeWatcher {
    /// Start watching `root` recursively.
    ///
    /// Returns the watcher handle and a receiver of changed paths. Events
    /// that arrive while the receiver is full are dropped; a rebuild is
    /// already pending in that case.
    pub fn new(root: PathBuf) -> Result<(Self, mpsc::Receiver<PathBuf>)> {
        let (tx, rx) = mpsc::channel(64);

        let mut watcher = PollWatcher::new(
            move |res: notify::Result<Event>| {
                if let Ok(event) = res {
                    if !matches!(
                        event.kind,
                        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                    ) {
                        return;
                    }
                    for path in event.paths {
                        let _ = tx.try_send(path);
                    }
                }
            },
            Config::default().with_poll_interval(POLL_INTERVAL),
        )?;

        watcher.watch(&root, RecursiveMode::Recursive)?;

        Ok((Self { _watcher: watcher }, rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reports_modified_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("main.js"), "void 0;").unwrap();

        let (_watcher, mut rx) = ChangeWatcher::new(temp.path().to_path_buf()).unwrap();

        // Let the first poll establish a baseline before mutating.
        tokio::time::sleep(Duration::from_millis(1500)).await;
        fs::write(temp.path().join("main.js"), "void 1;").unwrap();

        let changed = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("no change reported within the poll window")
            .expect("watcher channel closed");
        assert!(changed.ends_with("main.js"));
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let temp = TempDir::new().unwrap();
        let result = ChangeWatcher::new(temp.path().join("missing"));
        assert!(result.is_err());
    }
}
