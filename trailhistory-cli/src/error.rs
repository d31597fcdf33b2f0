//! CLI error type.

use std::fmt;

use trailhistory::app::AppError;
use trailhistory::config::ConfigError;
use trailhistory::feed::FeedError;
use trailhistory::logging::LoggingError;
use trailhistory::trail::TrailError;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Bad arguments or settings.
    Config(String),

    /// Reading or writing the configuration file failed.
    ConfigFile(ConfigError),

    /// The application could not start.
    App(AppError),

    /// A POI snapshot could not be read.
    Feed(FeedError),

    /// A bundled trail file could not be read.
    Trail(TrailError),

    /// Logging could not be set up.
    Logging(LoggingError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "{}", msg),
            CliError::ConfigFile(e) => write!(f, "Configuration file error: {}", e),
            CliError::App(e) => write!(f, "{}", e),
            CliError::Feed(e) => write!(f, "POI feed error: {}", e),
            CliError::Trail(e) => write!(f, "Trail data error: {}", e),
            CliError::Logging(e) => write!(f, "Logging error: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(_) => None,
            CliError::ConfigFile(e) => Some(e),
            CliError::App(e) => Some(e),
            CliError::Feed(e) => Some(e),
            CliError::Trail(e) => Some(e),
            CliError::Logging(e) => Some(e),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<AppError> for CliError {
    fn from(e: AppError) -> Self {
        CliError::App(e)
    }
}

impl From<FeedError> for CliError {
    fn from(e: FeedError) -> Self {
        CliError::Feed(e)
    }
}

impl From<TrailError> for CliError {
    fn from(e: TrailError) -> Self {
        CliError::Trail(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}
