//! File system watcher using notify-rs.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::events::ChangeEvent;
use crate::error::WatcherError;
use crate::Result;

/// Capacity of the channel between the notify thread and the event loop.
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// File watcher configuration.
#[derive(Debug, Clone, Default)]
pub struct WatcherConfig {
    /// Root directories to watch recursively.
    pub watch_dirs: Vec<PathBuf>,
}

/// File system watcher.
///
/// Watches are recursive and pick up directories created later. Relevant
/// notifications are forwarded one [`ChangeEvent`] at a time.
pub struct FileWatcher {
    watcher: RecommendedWatcher,
    event_rx: mpsc::Receiver<ChangeEvent>,
    watched_dirs: Arc<Mutex<Vec<PathBuf>>>,
}

impl FileWatcher {
    /// Create a watcher with no roots.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform watcher cannot be created.
    pub fn new() -> Result<Self> {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let watched_dirs = Arc::new(Mutex::new(Vec::new()));
        let watched_dirs_clone = Arc::clone(&watched_dirs);

        let watcher = notify::recommended_watcher(move |result: notify::Result<notify::Event>| {
            match result {
                Ok(event) => {
                    let dirs = watched_dirs_clone.lock().clone();
                    for change in ChangeEvent::from_notify(&event) {
                        if !is_under_watched(&dirs, &change.path) {
                            continue;
                        }
                        if event_tx.blocking_send(change).is_err() {
                            tracing::debug!("Event receiver dropped, discarding change");
                            return;
                        }
                    }
                }
                Err(e) => {
                    tracing::error!("Watch error: {:?}", e);
                }
            }
        })
        .map_err(|e| WatcherError::WatchFailed {
            path: "init".to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            watcher,
            event_rx,
            watched_dirs,
        })
    }

    /// Create a watcher over all configured roots.
    ///
    /// Roots that do not exist are logged and skipped, as are roots that
    /// fail to watch.
    ///
    /// # Errors
    ///
    /// Returns [`WatcherError::NoWatchPaths`] if no root could be watched.
    pub fn with_config(config: &WatcherConfig) -> Result<Self> {
        let mut watcher = Self::new()?;

        for dir in &config.watch_dirs {
            if !dir.exists() {
                tracing::warn!(path = %dir.display(), "Watch path does not exist, skipping");
                continue;
            }
            if let Err(e) = watcher.watch(dir) {
                tracing::error!(path = %dir.display(), error = %e, "Failed to add watch");
            }
        }

        if watcher.watched_dirs().is_empty() {
            return Err(WatcherError::NoWatchPaths.into());
        }

        Ok(watcher)
    }

    /// Add a directory to watch.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be watched.
    pub fn watch(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Err(WatcherError::WatchFailed {
                path: path.display().to_string(),
                reason: "directory does not exist".to_string(),
            }
            .into());
        }

        // Register before watching so early events are not filtered out.
        self.watched_dirs.lock().push(path.clone());

        if let Err(e) = self.watcher.watch(&path, RecursiveMode::Recursive) {
            self.watched_dirs.lock().retain(|p| p != &path);
            return Err(WatcherError::WatchFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
            .into());
        }

        tracing::info!(path = %path.display(), "Watching directory");
        Ok(())
    }

    /// Stop watching a directory.
    ///
    /// # Errors
    ///
    /// Returns an error if unwatching fails.
    pub fn unwatch(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        self.watcher
            .unwatch(path)
            .map_err(|e| WatcherError::WatchFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        self.watched_dirs.lock().retain(|p| p != path);

        tracing::info!(path = %path.display(), "Stopped watching directory");
        Ok(())
    }

    /// Receive the next change event.
    ///
    /// Returns `None` if the watcher has been dropped.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        self.event_rx.recv().await
    }

    /// Split into the platform watcher and the event receiver.
    ///
    /// The returned watcher must be kept alive for events to keep flowing.
    #[must_use]
    pub fn into_parts(self) -> (RecommendedWatcher, mpsc::Receiver<ChangeEvent>) {
        (self.watcher, self.event_rx)
    }

    /// Get list of watched directories.
    #[must_use]
    pub fn watched_dirs(&self) -> Vec<PathBuf> {
        self.watched_dirs.lock().clone()
    }
}

/// Check if a path is under any watched directory.
fn is_under_watched(watched: &[PathBuf], path: &Path) -> bool {
    watched.iter().any(|dir| path.starts_with(dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_is_under_watched() {
        let watched = vec![
            PathBuf::from("/home/user/project"),
            PathBuf::from("/etc/nixos"),
        ];

        assert!(is_under_watched(
            &watched,
            Path::new("/home/user/project/src/main.rs")
        ));
        assert!(is_under_watched(
            &watched,
            Path::new("/etc/nixos/configuration.nix")
        ));
        assert!(!is_under_watched(&watched, Path::new("/tmp/other.txt")));
    }

    #[test]
    fn test_watcher_nonexistent_dir() {
        let mut watcher = FileWatcher::new().unwrap();

        let result = watcher.watch("/nonexistent/directory");
        assert!(result.is_err());
        assert!(watcher.watched_dirs().is_empty());
    }

    #[test]
    fn test_watcher_watch_and_unwatch() {
        let tmp = TempDir::new().unwrap();
        let mut watcher = FileWatcher::new().unwrap();

        watcher.watch(tmp.path()).unwrap();
        assert_eq!(watcher.watched_dirs().len(), 1);

        watcher.unwatch(tmp.path()).unwrap();
        assert!(watcher.watched_dirs().is_empty());
    }

    #[test]
    fn test_with_config_skips_missing_roots() {
        let tmp = TempDir::new().unwrap();
        let config = WatcherConfig {
            watch_dirs: vec![PathBuf::from("/nonexistent/root"), tmp.path().to_path_buf()],
        };

        let watcher = FileWatcher::with_config(&config).unwrap();
        assert_eq!(watcher.watched_dirs(), vec![tmp.path().to_path_buf()]);
    }

    #[test]
    fn test_with_config_fails_without_any_root() {
        let config = WatcherConfig {
            watch_dirs: vec![PathBuf::from("/nonexistent/root")],
        };

        let err = FileWatcher::with_config(&config).err().unwrap();
        assert!(matches!(
            err,
            crate::Error::Watcher(WatcherError::NoWatchPaths)
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_watcher_reports_created_file() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        let mut watcher = FileWatcher::new().unwrap();
        watcher.watch(&root).unwrap();

        let file = root.join("created.py");
        std::fs::write(&file, "print('hi')\n").unwrap();

        let event = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                match watcher.recv().await {
                    Some(ev) if ev.path == file => break Some(ev),
                    Some(_) => continue,
                    None => break None,
                }
            }
        })
        .await
        .expect("no event within timeout")
        .expect("watcher closed");

        assert_eq!(event.path, file);
    }
}
