//! Configuration management for the indexer.
//!
//! Values come from command-line arguments with environment-variable
//! fallbacks (`HELIX_DB_HOST`, `HELIX_DB_PORT`, `WATCH_PATHS`, ...) and are
//! fixed for the lifetime of the process.

mod settings;

pub use settings::{Config, DEFAULT_EXCLUDE_PATTERNS, DEFAULT_WATCH_PATHS};
