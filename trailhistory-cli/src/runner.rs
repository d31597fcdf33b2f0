//! Shared setup for every command: configuration and logging.

use tracing::info;
use trailhistory::config::TrailConfig;
use trailhistory::logging::{init_logging, LoggingConfig, LoggingGuard};

use crate::error::CliError;

/// Loaded configuration plus the installed log subscriber.
pub struct CliRunner {
    config: TrailConfig,
    _logging: LoggingGuard,
}

impl CliRunner {
    /// Load `config.ini` and install logging.
    ///
    /// `verbose` raises the level to `debug` regardless of the file.
    pub fn new(verbose: bool) -> Result<Self, CliError> {
        let config = TrailConfig::load()?;

        let mut logging = LoggingConfig::from(&config.logging);
        if verbose {
            logging.level = "debug".to_string();
        }
        logging.ansi = console::colors_enabled_stderr();
        let guard = init_logging(&logging)?;

        Ok(Self {
            config,
            _logging: guard,
        })
    }

    pub fn config(&self) -> &TrailConfig {
        &self.config
    }

    pub fn log_startup(&self, command: &str) {
        info!(version = trailhistory::VERSION, command, "trailhistory starting");
    }
}
