//! Application configuration for `TrailApp`.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::{FeedSettings, FeedSource, ImageSettings, TrailConfig};

/// Everything `TrailApp::start()` needs.
///
/// Usually derived from the configuration file, with CLI overrides applied
/// through the `with_*` builders.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Where POI records come from.
    pub feed: FeedSettings,

    /// Image download and placeholder settings.
    pub images: ImageSettings,

    /// Cadence of card scroll polling.
    pub scroll_poll_interval: Duration,
}

impl AppConfig {
    /// Read from a snapshot file.
    pub fn with_feed_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.feed.source = FeedSource::File;
        self.feed.path = Some(path.into());
        self
    }

    /// Read from a live WebSocket feed.
    pub fn with_feed_url(mut self, url: impl Into<String>) -> Self {
        self.feed.source = FeedSource::WebSocket;
        self.feed.url = Some(url.into());
        self
    }

    pub fn with_image_timeout(mut self, timeout_secs: u64) -> Self {
        self.images.timeout_secs = timeout_secs;
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from(&TrailConfig::default())
    }
}

impl From<&TrailConfig> for AppConfig {
    fn from(config: &TrailConfig) -> Self {
        Self {
            feed: config.feed.clone(),
            images: config.images.clone(),
            scroll_poll_interval: config.coordinator.scroll_poll_interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_trail_config() {
        let mut file = TrailConfig::default();
        file.coordinator.scroll_poll_interval = Duration::from_millis(400);
        file.images.timeout_secs = 9;

        let config = AppConfig::from(&file);
        assert_eq!(config.scroll_poll_interval, Duration::from_millis(400));
        assert_eq!(config.images.timeout_secs, 9);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::default()
            .with_feed_url("ws://localhost:9000")
            .with_image_timeout(3);
        assert_eq!(config.feed.source, FeedSource::WebSocket);
        assert_eq!(config.feed.url.as_deref(), Some("ws://localhost:9000"));
        assert_eq!(config.images.timeout_secs, 3);

        let config = config.with_feed_file("/tmp/pois.json");
        assert_eq!(config.feed.source, FeedSource::File);
        assert_eq!(config.feed.path, Some(PathBuf::from("/tmp/pois.json")));
    }
}
