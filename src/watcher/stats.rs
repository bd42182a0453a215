//! Counters for the ingestion pipeline.

/// Running totals kept by the pipeline.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    pub events_received: u64,
    pub events_filtered: u64,
    pub events_dropped: u64,
    pub files_indexed: u64,
    pub files_skipped: u64,
    pub files_failed: u64,
    pub chunks_submitted: u64,
    pub batches_flushed: u64,
}

impl PipelineStats {
    /// Create zeroed stats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get snapshot of current stats.
    #[must_use]
    pub const fn snapshot(&self) -> Self {
        *self
    }

    pub(crate) fn log(&self) {
        tracing::debug!(
            received = self.events_received,
            filtered = self.events_filtered,
            dropped = self.events_dropped,
            indexed = self.files_indexed,
            skipped = self.files_skipped,
            failed = self.files_failed,
            chunks = self.chunks_submitted,
            batches = self.batches_flushed,
            "Pipeline stats"
        );
    }
}

/// Result of one flush.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    /// Files attempted.
    pub attempted: usize,
    /// Files whose chunks were all submitted.
    pub indexed: usize,
    /// Files skipped without error (empty, vanished, unreadable).
    pub skipped: usize,
    /// Files left pending for retry.
    pub failed: usize,
}

impl BatchReport {
    /// Check if nothing was attempted.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.attempted == 0
    }
}
