//! Change-ingestion pipeline.
//!
//! Owns all mutable ingestion state: the pending set (inside the
//! [`BatchAccumulator`]) and the [`RetryLedger`]. The pending set doubles as
//! the retry queue: a file whose read or submission fails is put back and
//! attempted again on the next flush, with no attempt limit.

use std::future::Future;
use std::io;
use std::path::Path;
use std::time::Duration;

use tokio::sync::mpsc;

use super::batch::{BatchAccumulator, BATCH_TIMEOUT, DEFAULT_BATCH_SIZE};
use super::chunker::{ChunkerConfig, ContentChunker};
use super::events::ChangeEvent;
use super::filter::PathFilter;
use super::metadata::DocumentMetadata;
use super::retry::RetryLedger;
use super::stats::{BatchReport, PipelineStats};
use crate::backend::{Document, DocumentStore};
use crate::config::DEFAULT_EXCLUDE_PATTERNS;
use crate::Result;

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Glob patterns for excluded paths.
    pub exclude_patterns: Vec<String>,
    /// Pending-set size that forces a flush.
    pub batch_size: usize,
    /// Age since the last flush that forces a flush on the next event.
    pub batch_timeout: Duration,
    /// Chunking limits.
    pub chunker: ChunkerConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            exclude_patterns: DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(ToString::to_string)
                .collect(),
            batch_size: DEFAULT_BATCH_SIZE,
            batch_timeout: BATCH_TIMEOUT,
            chunker: ChunkerConfig::default(),
        }
    }
}

/// Outcome of a single file attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// All chunks were submitted.
    Indexed { chunks: usize },
    /// Content was empty or whitespace only.
    Empty,
    /// File disappeared before it could be read.
    Vanished,
    /// File could not be read due to permissions.
    PermissionDenied,
}

/// Event-driven ingestion pipeline.
pub struct IngestionPipeline<S> {
    filter: PathFilter,
    batch: BatchAccumulator,
    retries: RetryLedger,
    chunker: ContentChunker,
    store: S,
    stats: PipelineStats,
}

impl<S: DocumentStore> IngestionPipeline<S> {
    /// Create a new pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if an exclude pattern is invalid.
    pub fn new(config: &PipelineConfig, store: S) -> Result<Self> {
        Ok(Self {
            filter: PathFilter::new(&config.exclude_patterns)?,
            batch: BatchAccumulator::new(config.batch_size, config.batch_timeout),
            retries: RetryLedger::new(),
            chunker: ContentChunker::new(config.chunker),
            store,
            stats: PipelineStats::new(),
        })
    }

    /// Handle one change event, flushing if a threshold is reached.
    ///
    /// Returns the batch report when the event triggered a flush.
    pub async fn handle_event(&mut self, event: ChangeEvent) -> Option<BatchReport> {
        self.stats.events_received += 1;
        let path = event.path;

        if self.filter.should_ignore(&path) {
            self.stats.events_filtered += 1;
            tracing::debug!(path = %path.display(), "Ignoring excluded file");
            return None;
        }

        // Transient deletes and renames land here.
        if !path.is_file() {
            self.stats.events_dropped += 1;
            return None;
        }

        self.batch.offer(path);

        if self.batch.should_flush() {
            Some(self.flush().await)
        } else {
            None
        }
    }

    /// Process every pending file.
    ///
    /// Failures never abort the batch; failed files are put back into the
    /// pending set.
    pub async fn flush(&mut self) -> BatchReport {
        let paths = self.batch.flush();
        let mut report = BatchReport::default();

        if paths.is_empty() {
            return report;
        }

        tracing::info!(files = paths.len(), "Processing batch");

        for path in paths {
            report.attempted += 1;

            match self.process_file(&path).await {
                Ok(outcome) => {
                    self.retries.record_success(&path);
                    if let FileOutcome::Indexed { chunks } = outcome {
                        report.indexed += 1;
                        self.stats.files_indexed += 1;
                        self.stats.chunks_submitted += chunks as u64;
                    } else {
                        report.skipped += 1;
                        self.stats.files_skipped += 1;
                    }
                }
                Err(e) => {
                    let failures = self.retries.record_failure(&path);
                    tracing::error!(
                        path = %path.display(),
                        error = %e,
                        failures,
                        "Failed to process file, keeping it pending"
                    );
                    self.batch.offer(path);
                    report.failed += 1;
                    self.stats.files_failed += 1;
                }
            }
        }

        self.stats.batches_flushed += 1;
        self.stats.log();

        report
    }

    /// Read, chunk and submit a single file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read for a reason other than
    /// absence or permissions, or if any chunk submission fails.
    pub async fn process_file(&self, path: &Path) -> Result<FileOutcome> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                let outcome = read_error_outcome(e)?;
                tracing::debug!(path = %path.display(), ?outcome, "File not readable, skipping");
                return Ok(outcome);
            }
        };

        let content = decode_ignoring_invalid(&bytes);

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Skipping empty file");
            return Ok(FileOutcome::Empty);
        }

        let metadata = DocumentMetadata::from_path(path, content.len());
        let chunks = self.chunker.chunks(&content, &metadata.filetype);
        let count = chunks.len();

        // Sequential so chunk_index order reaches the backend intact.
        for chunk in chunks {
            self.store
                .submit(&Document::from_chunk(&metadata, chunk))
                .await?;
        }

        tracing::info!(
            path = %path.display(),
            chunks = count,
            size = metadata.size_bytes,
            filetype = %metadata.filetype,
            "Indexed file"
        );

        Ok(FileOutcome::Indexed { chunks: count })
    }

    /// Consume events until the channel closes or `shutdown` resolves,
    /// then perform the final flush.
    pub async fn run<F>(&mut self, events: &mut mpsc::Receiver<ChangeEvent>, shutdown: F) -> BatchReport
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        tracing::info!("Ingestion pipeline started, monitoring for changes");

        loop {
            tokio::select! {
                maybe_event = events.recv() => {
                    let Some(event) = maybe_event else {
                        tracing::info!("Event channel closed");
                        break;
                    };
                    self.handle_event(event).await;
                }
                () = &mut shutdown => break,
            }
        }

        self.shutdown().await
    }

    /// Flush whatever is still pending before exit.
    pub async fn shutdown(&mut self) -> BatchReport {
        tracing::info!(pending = self.batch.len(), "Shutting down, flushing pending files");
        let report = self.flush().await;

        if !self.batch.is_empty() {
            tracing::warn!(
                remaining = self.batch.len(),
                "Files still pending at shutdown will not be indexed"
            );
        }

        report
    }

    /// Check if a path is pending.
    #[must_use]
    pub fn is_pending(&self, path: &Path) -> bool {
        self.batch.contains(path)
    }

    /// Number of pending paths.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.batch.len()
    }

    /// Consecutive failures recorded for a path.
    #[must_use]
    pub fn failure_count(&self, path: &Path) -> u32 {
        self.retries.failure_count(path)
    }

    /// Current counters.
    #[must_use]
    pub const fn stats(&self) -> PipelineStats {
        self.stats.snapshot()
    }

    /// The backend collaborator.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }
}

/// Map a read failure to a skip outcome, or pass it on as a retryable error.
///
/// # Errors
///
/// Returns the error unchanged unless the file is missing or unreadable due
/// to permissions.
fn read_error_outcome(e: io::Error) -> Result<FileOutcome> {
    match e.kind() {
        io::ErrorKind::NotFound => Ok(FileOutcome::Vanished),
        io::ErrorKind::PermissionDenied => Ok(FileOutcome::PermissionDenied),
        _ => Err(e.into()),
    }
}

/// Decode UTF-8, dropping invalid byte sequences rather than replacing them.
fn decode_ignoring_invalid(mut bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());

    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                out.push_str(valid);
                return out;
            }
            Err(e) => {
                let (valid, rest) = bytes.split_at(e.valid_up_to());
                out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                // A truncated sequence at the end has no error length.
                let skip = e.error_len().unwrap_or(rest.len());
                bytes = &rest[skip..];
            }
        }
    }
}
