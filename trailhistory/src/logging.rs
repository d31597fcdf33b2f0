//! Tracing subscriber setup.
//!
//! Console output goes to stderr. With a log directory configured, the same
//! events are also written to `trailhistory.log` there through a non-blocking
//! writer; keep the returned [`LoggingGuard`] alive until exit so buffered
//! lines are flushed.

use std::path::PathBuf;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config::LoggingSettings;

/// Log file name inside the log directory.
pub const LOG_FILE_NAME: &str = "trailhistory.log";

/// Filter used when `RUST_LOG` is unset, before the level is applied.
const CRATE_TARGETS: [&str; 2] = ["trailhistory", "trailhistory_cli"];

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to create log directory {}: {source}", .path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("A global subscriber is already installed")]
    AlreadyInitialized,
}

/// Logging options.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: Option<PathBuf>,
    /// Colour console output.
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::from(&LoggingSettings::default())
    }
}

impl From<&LoggingSettings> for LoggingConfig {
    fn from(settings: &LoggingSettings) -> Self {
        Self {
            level: settings.level.clone(),
            directory: settings.directory.clone(),
            ansi: true,
        }
    }
}

impl LoggingConfig {
    /// `trailhistory=<level>,trailhistory_cli=<level>`.
    pub fn default_filter(&self) -> String {
        CRATE_TARGETS
            .iter()
            .map(|target| format!("{}={}", target, self.level))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn env_filter(&self) -> Result<EnvFilter, LoggingError> {
        match std::env::var(EnvFilter::DEFAULT_ENV) {
            Ok(directives) if !directives.trim().is_empty() => {
                EnvFilter::try_new(directives).map_err(|e| LoggingError::Filter(e.to_string()))
            }
            _ => EnvFilter::try_new(self.default_filter())
                .map_err(|e| LoggingError::Filter(e.to_string())),
        }
    }
}

/// Keeps the file writer alive.
#[must_use = "dropping the guard stops the log file writer"]
pub struct LoggingGuard {
    file: Option<WorkerGuard>,
}

impl LoggingGuard {
    pub fn writes_file(&self) -> bool {
        self.file.is_some()
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the configured level when set.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard, LoggingError> {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(config.ansi)
        .with_target(false)
        .with_filter(config.env_filter()?);

    let (file_layer, file_guard) = match &config.directory {
        Some(directory) => {
            std::fs::create_dir_all(directory).map_err(|source| LoggingError::Directory {
                path: directory.clone(),
                source,
            })?;
            let appender = tracing_appender::rolling::never(directory, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(config.env_filter()?);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)?;

    Ok(LoggingGuard { file: file_guard })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.default_filter(), "trailhistory=info,trailhistory_cli=info");
    }

    #[test]
    fn test_from_settings() {
        let settings = LoggingSettings {
            level: "debug".into(),
            directory: Some(PathBuf::from("/tmp/logs")),
        };
        let config = LoggingConfig::from(&settings);
        assert_eq!(config.default_filter(), "trailhistory=debug,trailhistory_cli=debug");
        assert_eq!(config.directory, settings.directory);
    }

    #[test]
    fn test_init_writes_to_directory_then_refuses_second_install() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = LoggingConfig {
            level: "debug".into(),
            directory: Some(dir.path().join("logs")),
            ansi: false,
        };

        let guard = init_logging(&config).unwrap();
        assert!(guard.writes_file());
        tracing::info!("logging test line");
        drop(guard);

        let log_file = dir.path().join("logs").join(LOG_FILE_NAME);
        assert!(log_file.exists());
        if std::env::var(EnvFilter::DEFAULT_ENV).is_err() {
            let text = std::fs::read_to_string(&log_file).unwrap();
            assert!(text.contains("logging test line"));
        }

        assert!(matches!(
            init_logging(&LoggingConfig::default()),
            Err(LoggingError::AlreadyInitialized)
        ));
    }
}
