//! Addressable configuration keys.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::file::{FeedSource, TrailConfig};
use super::ConfigError;

/// Largest placeholder edge accepted, in pixels.
const MAX_PLACEHOLDER_EDGE: u32 = 4096;

/// Log levels accepted for `logging.level`.
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Every `section.key` the configuration file understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    FeedSource,
    FeedUrl,
    FeedPath,
    ImagesTimeoutSecs,
    ImagesPlaceholderWidth,
    ImagesPlaceholderHeight,
    CoordinatorScrollPollIntervalMs,
    LoggingLevel,
    LoggingDirectory,
}

impl ConfigKey {
    /// All keys in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::FeedSource,
            ConfigKey::FeedUrl,
            ConfigKey::FeedPath,
            ConfigKey::ImagesTimeoutSecs,
            ConfigKey::ImagesPlaceholderWidth,
            ConfigKey::ImagesPlaceholderHeight,
            ConfigKey::CoordinatorScrollPollIntervalMs,
            ConfigKey::LoggingLevel,
            ConfigKey::LoggingDirectory,
        ]
    }

    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::FeedSource | ConfigKey::FeedUrl | ConfigKey::FeedPath => "feed",
            ConfigKey::ImagesTimeoutSecs
            | ConfigKey::ImagesPlaceholderWidth
            | ConfigKey::ImagesPlaceholderHeight => "images",
            ConfigKey::CoordinatorScrollPollIntervalMs => "coordinator",
            ConfigKey::LoggingLevel | ConfigKey::LoggingDirectory => "logging",
        }
    }

    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::FeedSource => "source",
            ConfigKey::FeedUrl => "url",
            ConfigKey::FeedPath => "path",
            ConfigKey::ImagesTimeoutSecs => "timeout_secs",
            ConfigKey::ImagesPlaceholderWidth => "placeholder_width",
            ConfigKey::ImagesPlaceholderHeight => "placeholder_height",
            ConfigKey::CoordinatorScrollPollIntervalMs => "scroll_poll_interval_ms",
            ConfigKey::LoggingLevel => "level",
            ConfigKey::LoggingDirectory => "directory",
        }
    }

    /// `section.key`.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value as written to the file. Empty when unset.
    pub fn get(&self, config: &TrailConfig) -> String {
        match self {
            ConfigKey::FeedSource => config.feed.source.to_string(),
            ConfigKey::FeedUrl => config.feed.url.clone().unwrap_or_default(),
            ConfigKey::FeedPath => path_string(config.feed.path.as_ref()),
            ConfigKey::ImagesTimeoutSecs => config.images.timeout_secs.to_string(),
            ConfigKey::ImagesPlaceholderWidth => config.images.placeholder_width.to_string(),
            ConfigKey::ImagesPlaceholderHeight => config.images.placeholder_height.to_string(),
            ConfigKey::CoordinatorScrollPollIntervalMs => {
                config.coordinator.scroll_poll_interval.as_millis().to_string()
            }
            ConfigKey::LoggingLevel => config.logging.level.clone(),
            ConfigKey::LoggingDirectory => path_string(config.logging.directory.as_ref()),
        }
    }

    /// Validate and store `value`. An empty value clears optional keys.
    pub fn set(&self, config: &mut TrailConfig, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match self {
            ConfigKey::FeedSource => {
                config.feed.source = value.parse().map_err(|reason| self.invalid(value, reason))?;
            }
            ConfigKey::FeedUrl => {
                config.feed.url = if value.is_empty() {
                    None
                } else {
                    reqwest::Url::parse(value).map_err(|e| self.invalid(value, e.to_string()))?;
                    Some(value.to_string())
                };
            }
            ConfigKey::FeedPath => config.feed.path = optional_path(value),
            ConfigKey::ImagesTimeoutSecs => {
                config.images.timeout_secs = self.parse_positive(value, u64::MAX)?;
            }
            ConfigKey::ImagesPlaceholderWidth => {
                config.images.placeholder_width = self.parse_positive(value, MAX_PLACEHOLDER_EDGE)?;
            }
            ConfigKey::ImagesPlaceholderHeight => {
                config.images.placeholder_height = self.parse_positive(value, MAX_PLACEHOLDER_EDGE)?;
            }
            ConfigKey::CoordinatorScrollPollIntervalMs => {
                let ms: u64 = self.parse_positive(value, 60_000)?;
                config.coordinator.scroll_poll_interval = Duration::from_millis(ms);
            }
            ConfigKey::LoggingLevel => {
                let level = value.to_lowercase();
                if !LOG_LEVELS.contains(&level.as_str()) {
                    return Err(self.invalid(value, format!("expected one of {}", LOG_LEVELS.join(", "))));
                }
                config.logging.level = level;
            }
            ConfigKey::LoggingDirectory => config.logging.directory = optional_path(value),
        }
        Ok(())
    }

    fn parse_positive<T>(&self, value: &str, max: T) -> Result<T, ConfigError>
    where
        T: FromStr + PartialOrd + Default + std::fmt::Display,
    {
        let parsed: T = value
            .parse()
            .map_err(|_| self.invalid(value, "not a whole number".to_string()))?;
        if parsed <= T::default() || parsed > max {
            return Err(self.invalid(value, format!("must be between 1 and {}", max)));
        }
        Ok(parsed)
    }

    fn invalid(&self, value: &str, reason: String) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason,
        }
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

impl FromStr for FeedSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(FeedSource::File),
            "websocket" | "ws" => Ok(FeedSource::WebSocket),
            _ => Err("expected 'file' or 'websocket'".to_string()),
        }
    }
}

fn optional_path(value: &str) -> Option<PathBuf> {
    (!value.is_empty()).then(|| PathBuf::from(value))
}

fn path_string(path: Option<&PathBuf>) -> String {
    path.map(|p| p.display().to_string()).unwrap_or_default()
}
