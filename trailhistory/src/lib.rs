//! Trail of History - POI synchronization core
//!
//! This library keeps a live directory of historical points of interest in
//! step with a push feed, resolves each POI's image, coordinates a single
//! "current" POI between a map and a card strip, and tracks the user's
//! distance to every POI.
//!
//! # Modules
//!
//! - [`directory`]: the POI directory, listener registration and dispatch
//! - [`feed`]: push feeds of POI records (memory, file, WebSocket)
//! - [`imagery`]: image download with placeholder fallback
//! - [`coordinator`]: current-POI selection and card scroll detection
//! - [`distance`]: distance-to-user tracking and location permission flow
//! - [`trail`]: bundled trail bounds and the offline POI list
//! - [`app`]: application bootstrap
//! - [`config`], [`logging`]: ambient setup

pub mod app;
pub mod config;
pub mod coord;
pub mod coordinator;
pub mod directory;
pub mod distance;
pub mod feed;
pub mod imagery;
pub mod logging;
pub mod poi;
pub mod trail;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
