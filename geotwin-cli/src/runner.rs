//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization, the async runtime
//! and journal access to reduce duplication across command handlers.

use std::future::Future;
use std::sync::Arc;
use tracing::info;

use geotwin::config::ConfigFile;
use geotwin::journal::FileJournal;
use geotwin::logging::{init_logging, split_log_path, LoggingGuard};

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
    runtime: tokio::runtime::Runtime,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    pub fn new() -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let (log_dir, log_file) = split_log_path(&config.logging.file);
        let logging_guard =
            init_logging(&log_dir, &log_file).map_err(|e| CliError::LoggingInit(e.to_string()))?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(CliError::Runtime)?;

        Ok(Self {
            logging_guard,
            config,
            runtime,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("GeoTwin v{}", geotwin::VERSION);
        info!("GeoTwin CLI: {} command", command);
    }

    /// Run a future to completion on the runner's runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Open the journal directory named in the config.
    pub async fn open_journal(&self) -> Result<Arc<FileJournal>, CliError> {
        let directory = &self.config.journal.directory;
        info!(directory = %directory.display(), "Opening journal");
        Ok(Arc::new(FileJournal::open(directory).await?))
    }
}
