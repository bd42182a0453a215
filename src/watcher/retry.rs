//! Consecutive-failure bookkeeping per path.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Counts consecutive failures per path.
///
/// This is an observable counter only. Retrying is structural: a file that
/// fails stays in the pending set and is attempted again on the next flush.
/// There is no cutoff, backoff or eviction.
#[derive(Debug, Default)]
pub struct RetryLedger {
    failures: HashMap<PathBuf, u32>,
}

impl RetryLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the failure count for a path.
    pub fn record_success(&mut self, path: &Path) {
        self.failures.remove(path);
    }

    /// Increment the failure count for a path and return the new count.
    pub fn record_failure(&mut self, path: &Path) -> u32 {
        let count = self.failures.entry(path.to_path_buf()).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    /// Consecutive failures recorded for a path.
    #[must_use]
    pub fn failure_count(&self, path: &Path) -> u32 {
        self.failures.get(path).copied().unwrap_or(0)
    }

    /// Number of paths with at least one outstanding failure.
    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Check if no failures are outstanding.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}
