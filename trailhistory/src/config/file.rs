//! The configuration file and its sections.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use tracing::debug;

use super::keys::ConfigKey;
use super::{config_file_path, ConfigError};
use crate::coordinator::DEFAULT_SCROLL_POLL_INTERVAL;
use crate::imagery::{DEFAULT_PLACEHOLDER_HEIGHT, DEFAULT_PLACEHOLDER_WIDTH, DEFAULT_TIMEOUT_SECS};

/// Where POI records come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedSource {
    /// A bundled JSON snapshot on disk.
    #[default]
    File,
    /// A live WebSocket feed.
    WebSocket,
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSource::File => f.write_str("file"),
            FeedSource::WebSocket => f.write_str("websocket"),
        }
    }
}

/// `[feed]`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedSettings {
    pub source: FeedSource,
    /// WebSocket endpoint, for `source = websocket`.
    pub url: Option<String>,
    /// Snapshot file, for `source = file`.
    pub path: Option<PathBuf>,
}

/// `[images]`
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSettings {
    pub timeout_secs: u64,
    pub placeholder_width: u32,
    pub placeholder_height: u32,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            placeholder_width: DEFAULT_PLACEHOLDER_WIDTH,
            placeholder_height: DEFAULT_PLACEHOLDER_HEIGHT,
        }
    }
}

/// `[coordinator]`
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorSettings {
    pub scroll_poll_interval: Duration,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            scroll_poll_interval: DEFAULT_SCROLL_POLL_INTERVAL,
        }
    }
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Level for this crate's targets.
    pub level: String,
    /// Also write logs to a file in this directory.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

/// Contents of `config.ini`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrailConfig {
    pub feed: FeedSettings,
    pub images: ImageSettings,
    pub coordinator: CoordinatorSettings,
    pub logging: LoggingSettings,
}

impl TrailConfig {
    /// Load from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`. A missing file yields defaults; unknown sections
    /// and keys are ignored.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file - using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| match e {
            ini::Error::Io(source) => ConfigError::Io {
                path: path.to_path_buf(),
                source,
            },
            ini::Error::Parse(e) => ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        })?;

        let mut config = Self::default();
        for key in ConfigKey::all() {
            let value = ini
                .section(Some(key.section()))
                .and_then(|s| s.get(key.key_name()));
            if let Some(value) = value {
                key.set(&mut config, value)?;
            }
        }

        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Save to the default location, creating the directory if needed.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to `path`. Unset optional keys are omitted.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            let value = key.get(self);
            if !value.is_empty() {
                ini.with_section(Some(key.section()))
                    .set(key.key_name(), value);
            }
        }

        ini.write_to_file(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = TrailConfig::load_from(&dir.path().join("absent.ini")).unwrap();
        assert_eq!(config, TrailConfig::default());
        assert_eq!(config.coordinator.scroll_poll_interval, Duration::from_millis(250));
        assert_eq!(config.images.placeholder_width, DEFAULT_PLACEHOLDER_WIDTH);
    }

    #[test]
    fn test_load_reads_sections_and_ignores_unknown_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(
            &path,
            "[feed]\nsource = websocket\nurl = ws://127.0.0.1:9000/\ncolour = blue\n\n\
             [images]\ntimeout_secs = 5\n\n[extra]\nx = 1\n",
        )
        .unwrap();

        let config = TrailConfig::load_from(&path).unwrap();
        assert_eq!(config.feed.source, FeedSource::WebSocket);
        assert_eq!(config.feed.url.as_deref(), Some("ws://127.0.0.1:9000/"));
        assert_eq!(config.images.timeout_secs, 5);
        assert_eq!(config.images.placeholder_height, DEFAULT_PLACEHOLDER_HEIGHT);
    }

    #[test]
    fn test_bad_value_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[coordinator]\nscroll_poll_interval_ms = soon\n").unwrap();

        let err = TrailConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "coordinator.scroll_poll_interval_ms"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.ini");

        let mut config = TrailConfig::default();
        config.feed.path = Some(PathBuf::from("/data/pois.json"));
        config.logging.level = "debug".to_string();
        config.save_to(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("[feed]"));
        assert!(!text.contains("url"));

        assert_eq!(TrailConfig::load_from(&path).unwrap(), config);
    }
}
