//! HelixDB file indexer.
//!
//! Entry point for the indexing service.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::path::PathBuf;

use clap::Parser;
use helix_indexer::observability::init_tracing;
use helix_indexer::{App, Config, Result};

/// Watch directories and index changed files into HelixDB
#[derive(Parser, Debug)]
#[command(name = "helix-indexer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// HelixDB host
    #[arg(long, env = "HELIX_DB_HOST", default_value = "localhost")]
    host: String,

    /// HelixDB port
    #[arg(short, long, env = "HELIX_DB_PORT", default_value = "6969")]
    port: u16,

    /// Directories to watch (defaults to /home and /etc/nixos)
    #[arg(short, long, env = "WATCH_PATHS", value_delimiter = ':')]
    watch: Vec<String>,

    /// Glob patterns of files to ignore
    #[arg(short, long, env = "EXCLUDE_PATTERNS", value_delimiter = ':')]
    exclude: Vec<String>,

    /// Number of changed files that triggers a batch
    #[arg(short, long, env = "BATCH_SIZE", default_value = "10")]
    batch_size: usize,

    /// Backend request timeout in seconds
    #[arg(long, env = "HELIX_DB_TIMEOUT", default_value = "30")]
    timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

impl Cli {
    fn into_config(self) -> Config {
        let defaults = Config::default();

        let watch_paths = non_empty(trimmed(self.watch).map(PathBuf::from).collect())
            .unwrap_or(defaults.watch_paths);
        let exclude_patterns =
            non_empty(trimmed(self.exclude).collect()).unwrap_or(defaults.exclude_patterns);

        Config {
            helix_host: self.host,
            helix_port: self.port,
            watch_paths,
            exclude_patterns,
            batch_size: self.batch_size,
            log_level: self.log_level,
            request_timeout_secs: self.timeout,
        }
    }
}

/// Trim list entries and drop the blank ones.
fn trimmed(values: Vec<String>) -> impl Iterator<Item = String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn non_empty<T>(values: Vec<T>) -> Option<Vec<T>> {
    (!values.is_empty()).then_some(values)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.log_json);

    tracing::info!("helix-indexer v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = cli.into_config();
    tracing::debug!(?config, "Configuration loaded");

    App::new(config).run().await
}
