//! Service bootstrap.
//!
//! Wires configuration, backend, watcher and pipeline together and runs the
//! event loop until a shutdown signal arrives.

use tokio::signal;

use crate::backend::{DocumentStore, HelixClient};
use crate::watcher::{FileWatcher, IngestionPipeline, WatcherConfig};
use crate::{Config, Result};

/// The indexer service.
pub struct App {
    config: Config,
}

impl App {
    /// Create a new application.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run until shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the backend is
    /// unreachable, or no watch could be established.
    pub async fn run(self) -> Result<()> {
        let config = self.config;
        config.validate()?;

        tracing::info!(
            paths = ?config.watch_paths,
            patterns = ?config.exclude_patterns,
            batch_size = config.batch_size,
            "Starting HelixDB file indexer"
        );

        let client = HelixClient::new(config.helix_url(), config.request_timeout())?;
        client.health_check().await?;
        tracing::info!(url = %client.base_url(), "Connected to HelixDB");

        let mut pipeline = IngestionPipeline::new(&config.pipeline_config(), client)?;

        let watcher = FileWatcher::with_config(&WatcherConfig {
            watch_dirs: config.watch_paths.clone(),
        })?;
        let (_watcher, mut events) = watcher.into_parts();

        let report = pipeline.run(&mut events, shutdown_signal()).await;

        tracing::info!(
            indexed = report.indexed,
            failed = report.failed,
            "File indexer stopped"
        );
        Ok(())
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C).
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
