//! File system change events.

#![allow(clippy::missing_const_for_fn)]

use std::path::{Path, PathBuf};

use notify::event::{ModifyKind, RenameMode};
use notify::EventKind;

/// Kind of change reported for a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// File content was written.
    Modified,
    /// File was created.
    Created,
    /// File was moved into a watched directory.
    MovedIn,
}

/// A single change notification from the watch facility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Absolute path of the changed file.
    pub path: PathBuf,
    /// What happened to it.
    pub kind: ChangeKind,
}

impl ChangeEvent {
    /// Create a new change event.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Shorthand for a `Modified` event.
    #[must_use]
    pub fn modified(path: impl Into<PathBuf>) -> Self {
        Self::new(path, ChangeKind::Modified)
    }

    /// Shorthand for a `Created` event.
    #[must_use]
    pub fn created(path: impl Into<PathBuf>) -> Self {
        Self::new(path, ChangeKind::Created)
    }

    /// Shorthand for a `MovedIn` event.
    #[must_use]
    pub fn moved_in(path: impl Into<PathBuf>) -> Self {
        Self::new(path, ChangeKind::MovedIn)
    }

    /// Get the path associated with this event.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Translate a raw notify event into change events.
    ///
    /// Only content writes, creations and moves into a directory are
    /// relevant; removals, accesses and metadata changes yield nothing.
    #[must_use]
    pub fn from_notify(event: &notify::Event) -> Vec<Self> {
        let kind = match event.kind {
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any) => ChangeKind::Modified,
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => ChangeKind::MovedIn,
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
                // paths are [from, to]
                return event
                    .paths
                    .last()
                    .map(|to| vec![Self::moved_in(to.clone())])
                    .unwrap_or_default();
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::Any | RenameMode::Other)) => {
                ChangeKind::MovedIn
            }
            _ => return Vec::new(),
        };

        event
            .paths
            .iter()
            .map(|path| Self::new(path.clone(), kind))
            .collect()
    }
}
