//! Configuration settings and validation.

use std::path::PathBuf;
use std::time::Duration;

use crate::watcher::{ChunkerConfig, PipelineConfig, BATCH_TIMEOUT};
use crate::{Error, Result};

/// Default exclusion patterns for editor swap files, temp files and VCS internals.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &["*.swp", "*.tmp", "*~", ".git/*", "node_modules/*"];

/// Default roots to watch.
pub const DEFAULT_WATCH_PATHS: &[&str] = &["/home", "/etc/nixos"];

/// Main configuration for the indexer service.
#[derive(Debug, Clone)]
pub struct Config {
    /// `HelixDB` host.
    pub helix_host: String,

    /// `HelixDB` port.
    pub helix_port: u16,

    /// Root directories to watch recursively.
    pub watch_paths: Vec<PathBuf>,

    /// Glob patterns for paths that are never indexed.
    pub exclude_patterns: Vec<String>,

    /// Number of pending files that forces a flush.
    pub batch_size: usize,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Timeout for a single backend request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            helix_host: "localhost".to_string(),
            helix_port: 6969,
            watch_paths: DEFAULT_WATCH_PATHS.iter().map(PathBuf::from).collect(),
            exclude_patterns: DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(ToString::to_string)
                .collect(),
            batch_size: 10,
            log_level: "info".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Create a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.helix_port == 0 {
            return Err(Error::config("port cannot be 0"));
        }

        if self.helix_host.is_empty() {
            return Err(Error::config("host cannot be empty"));
        }

        if self.batch_size == 0 {
            return Err(Error::config("batch_size cannot be 0"));
        }

        if self.request_timeout_secs == 0 {
            return Err(Error::config("request timeout cannot be 0"));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(Error::config(format!(
                "invalid log level '{}', must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            )));
        }

        if self.watch_paths.is_empty() {
            return Err(Error::config("at least one watch path is required"));
        }

        Ok(())
    }

    /// Base URL of the `HelixDB` HTTP endpoint.
    #[must_use]
    pub fn helix_url(&self) -> String {
        format!("http://{}:{}", self.helix_host, self.helix_port)
    }

    /// Backend request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Settings for the ingestion pipeline.
    #[must_use]
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            exclude_patterns: self.exclude_patterns.clone(),
            batch_size: self.batch_size,
            batch_timeout: BATCH_TIMEOUT,
            chunker: ChunkerConfig::default(),
        }
    }
}
