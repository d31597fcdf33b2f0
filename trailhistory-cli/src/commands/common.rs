//! Common types and utilities shared across CLI commands.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Args;
use trailhistory::app::AppConfig;
use trailhistory::config::TrailConfig;
use trailhistory::coord::Coordinate;
use trailhistory::directory::PoiDirectory;
use trailhistory::distance::{AuthorizationStatus, DistanceTracker};
use trailhistory::poi::PointOfInterest;

use crate::error::CliError;

/// Where to read POIs from. Overrides `[feed]` in config.ini.
#[derive(Debug, Clone, Default, Args)]
pub struct FeedArgs {
    /// POI snapshot file ({"pointOfInterest": {...}})
    #[arg(long, conflicts_with = "url")]
    pub file: Option<PathBuf>,

    /// Live WebSocket feed URL
    #[arg(long)]
    pub url: Option<String>,
}

/// A user position for distance calculation.
#[derive(Debug, Clone, Default, Args)]
pub struct LocationArgs {
    /// Your latitude in degrees
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Your longitude in degrees
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,
}

impl LocationArgs {
    /// The validated position, if one was given.
    pub fn coordinate(&self) -> Result<Option<Coordinate>, CliError> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Coordinate::checked(lat, lon)
                .map(Some)
                .map_err(|e| CliError::Config(e.to_string())),
            _ => Ok(None),
        }
    }
}

/// Build the app configuration. CLI takes precedence, then config.
pub fn resolve_app_config(feed: &FeedArgs, config: &TrailConfig) -> AppConfig {
    let app_config = AppConfig::from(config);
    match (&feed.file, &feed.url) {
        (Some(path), _) => app_config.with_feed_file(path.clone()),
        (None, Some(url)) => app_config.with_feed_url(url.clone()),
        (None, None) => app_config,
    }
}

/// Treat a position given on the command line as an authorized fix.
pub fn apply_location(tracker: &DistanceTracker, fix: Option<Coordinate>) {
    if let Some(fix) = fix {
        tracker.authorization_changed(AuthorizationStatus::Authorized);
        tracker.update_location(fix);
    }
}

/// Wait until the directory holds `expected` POIs or `timeout` passes.
///
/// Returns the final count.
pub fn wait_for_pois(directory: &PoiDirectory, expected: usize, timeout: Duration) -> usize {
    let deadline = Instant::now() + timeout;
    while directory.len() < expected && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(50));
    }
    directory.len()
}

/// One line of POI output.
pub fn poi_line(index: usize, poi: &Arc<PointOfInterest>, distance: &str) -> String {
    format!(
        "{:>3}. {:<36} {:>10}   {}",
        index + 1,
        poi.name(),
        distance,
        poi.coordinate()
    )
}
