//! File system watching and change ingestion.
//!
//! This module provides:
//! - Recursive directory watching using notify-rs
//! - Glob-based path exclusion
//! - Debounced batching of changed paths with structural retry
//! - Per-file-type content chunking
//! - The pipeline that ties them to the backend

mod batch;
mod chunker;
mod events;
mod filter;
mod metadata;
mod pipeline;
mod retry;
mod stats;
#[allow(clippy::module_inception)]
mod watcher;

pub use batch::{BatchAccumulator, BATCH_TIMEOUT, DEFAULT_BATCH_SIZE};
pub use chunker::{Chunk, ChunkStrategy, ChunkerConfig, ContentChunker};
pub use events::{ChangeEvent, ChangeKind};
pub use filter::PathFilter;
pub use metadata::{filetype, DocumentMetadata, UNKNOWN_FILETYPE};
pub use pipeline::{FileOutcome, IngestionPipeline, PipelineConfig};
pub use retry::RetryLedger;
pub use stats::{BatchReport, PipelineStats};
pub use watcher::{FileWatcher, WatcherConfig};
