//! Application bootstrap implementation.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::{Handle, Runtime};
use tracing::info;

use super::config::AppConfig;
use super::error::AppError;
use crate::config::{FeedSettings, FeedSource};
use crate::directory::{Dispatcher, PoiDirectory, SerialDispatcher};
use crate::distance::DistanceTracker;
use crate::feed::{Feed, FileFeed, WebSocketFeed};
use crate::imagery::{AsyncHttpClient, AsyncReqwestClient, ImageResolver};

/// How long an owned runtime waits for tasks at shutdown.
const RUNTIME_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// Build the feed named by the `[feed]` settings.
///
/// # Errors
///
/// Returns [`AppError::Config`] when the selected source lacks its path or
/// URL.
pub fn feed_from_settings(settings: &FeedSettings) -> Result<Arc<dyn Feed>, AppError> {
    match settings.source {
        FeedSource::File => {
            let path = settings.path.as_ref().ok_or_else(|| {
                AppError::Config("feed.source is 'file' but feed.path is not set".to_string())
            })?;
            Ok(Arc::new(FileFeed::new(path.clone())))
        }
        FeedSource::WebSocket => {
            let url = settings.url.as_ref().ok_or_else(|| {
                AppError::Config("feed.source is 'websocket' but feed.url is not set".to_string())
            })?;
            Ok(Arc::new(WebSocketFeed::new(url.clone())))
        }
    }
}

/// The Trail of History core with its services wired together.
///
/// Owns the POI directory and the distance tracker; the tracker is
/// registered as a directory lifecycle hook so it follows membership
/// automatically.
pub struct TrailApp {
    directory: PoiDirectory,

    tracker: Arc<DistanceTracker>,

    config: AppConfig,

    handle: Handle,

    /// Present when the app was created via `start_with_runtime()`.
    runtime: Option<Runtime>,
}

impl TrailApp {
    /// Start the application on the current Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if no runtime is running, the HTTP client cannot be
    /// built, or the feed settings are incomplete.
    pub fn start(config: AppConfig) -> Result<Self, AppError> {
        let handle = Handle::try_current().map_err(|_| AppError::NoRuntime)?;
        let feed = feed_from_settings(&config.feed)?;
        let client = AsyncReqwestClient::with_timeout(config.images.timeout_secs)?;
        Ok(Self::assemble(config, feed, Arc::new(client), handle, None))
    }

    /// Start the application on a runtime it owns.
    ///
    /// Useful from synchronous code such as CLI command handlers. The
    /// runtime lives as long as the app.
    pub fn start_with_runtime(config: AppConfig) -> Result<Self, AppError> {
        let runtime = Runtime::new().map_err(|e| AppError::RuntimeCreation(e.to_string()))?;
        let feed = feed_from_settings(&config.feed)?;
        let client = AsyncReqwestClient::with_timeout(config.images.timeout_secs)?;
        let handle = runtime.handle().clone();
        Ok(Self::assemble(config, feed, Arc::new(client), handle, Some(runtime)))
    }

    /// Start with an explicit feed and HTTP client on the current runtime.
    ///
    /// `config.feed` is ignored.
    pub fn start_with(
        config: AppConfig,
        feed: Arc<dyn Feed>,
        client: Arc<dyn AsyncHttpClient>,
    ) -> Result<Self, AppError> {
        let handle = Handle::try_current().map_err(|_| AppError::NoRuntime)?;
        Ok(Self::assemble(config, feed, client, handle, None))
    }

    fn assemble(
        config: AppConfig,
        feed: Arc<dyn Feed>,
        client: Arc<dyn AsyncHttpClient>,
        handle: Handle,
        runtime: Option<Runtime>,
    ) -> Self {
        info!(feed = %feed.name(), "Starting TrailApp");

        let resolver = ImageResolver::new(client)
            .with_placeholder_size(config.images.placeholder_width, config.images.placeholder_height);

        let directory = PoiDirectory::new(feed, resolver, handle.clone());
        let tracker = Arc::new(DistanceTracker::new());
        directory.add_hook(tracker.clone());

        info!(
            image_timeout_secs = config.images.timeout_secs,
            scroll_poll_ms = config.scroll_poll_interval.as_millis() as u64,
            "TrailApp ready"
        );

        Self {
            directory,
            tracker,
            config,
            handle,
            runtime,
        }
    }

    pub fn directory(&self) -> &PoiDirectory {
        &self.directory
    }

    pub fn tracker(&self) -> &Arc<DistanceTracker> {
        &self.tracker
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Handle to the runtime running the feed and image tasks.
    pub fn runtime_handle(&self) -> Handle {
        self.handle.clone()
    }

    /// A new ordered dispatcher on the app's runtime.
    pub fn serial_dispatcher(&self) -> Arc<dyn Dispatcher> {
        Arc::new(SerialDispatcher::spawn(&self.handle))
    }

    /// Shut down the application.
    ///
    /// Stops the feed, closes every subscription, and, for an owned runtime,
    /// waits briefly for outstanding tasks.
    pub fn shutdown(self) {
        info!("Shutting down TrailApp");

        self.directory.shutdown();

        if let Some(runtime) = self.runtime {
            runtime.shutdown_timeout(RUNTIME_SHUTDOWN_TIMEOUT);
        }

        info!("TrailApp shutdown complete");
    }
}
