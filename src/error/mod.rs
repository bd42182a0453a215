//! Error types and Result aliases for the indexer.
//!
//! This module defines the error hierarchy used throughout the crate.
//! All public functions return `Result<T, Error>` or `Result<T>`.
//!
//! Skips that are part of normal operation (excluded paths, files that vanish
//! before they are read, permission-denied reads) are not errors; they are
//! reported as [`crate::watcher::FileOutcome`] values instead.

use thiserror::Error;

/// Result type alias using the indexer's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for indexer operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Backend submission or connection error.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// File watching error.
    #[error("watcher error: {0}")]
    Watcher(#[from] WatcherError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Backend-specific errors.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Backend unreachable at startup.
    #[error("cannot reach backend at {address}: {reason}")]
    Connection { address: String, reason: String },

    /// Transport failure while sending a query.
    #[error("request failed: {0}")]
    Request(String),

    /// Backend answered with a non-success status.
    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),

    /// Backend returned nothing for a query that must produce a result.
    #[error("empty response to query '{query}'")]
    EmptyResponse { query: String },
}

/// File watcher errors.
#[derive(Error, Debug)]
pub enum WatcherError {
    /// Failed to watch path.
    #[error("failed to watch path '{path}': {reason}")]
    WatchFailed { path: String, reason: String },

    /// None of the configured roots could be watched.
    #[error("no watch paths could be established")]
    NoWatchPaths,
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl BackendError {
    /// Create a connection error.
    pub fn connection(address: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Connection {
            address: address.into(),
            reason: reason.into(),
        }
    }
}
