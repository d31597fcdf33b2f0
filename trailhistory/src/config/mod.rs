//! Configuration file handling.
//!
//! Settings live in an INI file at `~/.config/trailhistory/config.ini` (the
//! platform config directory). A missing file means defaults. Every value is
//! addressable as `section.key` through [`ConfigKey`], which is what the CLI's
//! `config get/set/list` commands use.

mod file;
mod keys;

use std::path::PathBuf;

use thiserror::Error;

pub use file::{
    CoordinatorSettings, FeedSettings, FeedSource, ImageSettings, LoggingSettings, TrailConfig,
};
pub use keys::ConfigKey;

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Directory name under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "trailhistory";

/// Errors loading, saving, or editing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    #[error("Could not determine the configuration directory")]
    NoConfigDir,
}

/// Directory holding the configuration file.
///
/// Falls back to `./.trailhistory` when the platform reports no config
/// directory.
pub fn config_directory() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join(CONFIG_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(".").join(format!(".{}", CONFIG_DIR_NAME)))
}

/// Full path of the configuration file.
pub fn config_file_path() -> PathBuf {
    config_directory().join(CONFIG_FILE_NAME)
}
