//! Batching of changed paths between flushes.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Time since the last flush after which the next offered path forces a flush.
pub const BATCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Default number of pending paths that forces a flush.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Collects distinct changed paths until a size or age threshold is reached.
///
/// The age threshold is evaluated lazily: it is only consulted when the
/// caller asks [`should_flush`](Self::should_flush), which the pipeline does
/// after each accepted event. There is no background timer.
#[derive(Debug)]
pub struct BatchAccumulator {
    pending: BTreeSet<PathBuf>,
    last_flush: Instant,
    batch_size: usize,
    timeout: Duration,
}

impl BatchAccumulator {
    /// Create an accumulator with the given thresholds.
    #[must_use]
    pub fn new(batch_size: usize, timeout: Duration) -> Self {
        Self {
            pending: BTreeSet::new(),
            last_flush: Instant::now(),
            batch_size,
            timeout,
        }
    }

    /// Add a path. Offering a path that is already pending is a no-op.
    ///
    /// Returns `true` if the path was newly added.
    pub fn offer(&mut self, path: impl Into<PathBuf>) -> bool {
        self.pending.insert(path.into())
    }

    /// Check whether a flush is due now.
    #[must_use]
    pub fn should_flush(&self) -> bool {
        self.should_flush_at(Instant::now())
    }

    /// Check whether a flush is due at `now`.
    #[must_use]
    pub fn should_flush_at(&self, now: Instant) -> bool {
        self.pending.len() >= self.batch_size
            || now.saturating_duration_since(self.last_flush) > self.timeout
    }

    /// Drain the pending set and restart the flush clock.
    ///
    /// Flushing an empty accumulator returns an empty set and leaves the
    /// clock untouched.
    pub fn flush(&mut self) -> BTreeSet<PathBuf> {
        if self.pending.is_empty() {
            return BTreeSet::new();
        }

        self.last_flush = Instant::now();
        std::mem::take(&mut self.pending)
    }

    /// Check if a path is pending.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.pending.contains(path)
    }

    /// Number of pending paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Instant of the last non-empty flush (or creation).
    #[must_use]
    pub const fn last_flush(&self) -> Instant {
        self.last_flush
    }
}

impl Default for BatchAccumulator {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE, BATCH_TIMEOUT)
    }
}
