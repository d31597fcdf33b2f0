//! Application bootstrap and lifecycle management.
//!
//! [`TrailApp`] wires the pieces together in one place:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                         TrailApp                          │
//! │                                                           │
//! │  1. AsyncReqwestClient ──► ImageResolver                  │
//! │  2. Feed (file | websocket)                               │
//! │  3. PoiDirectory(feed, resolver) ──► listeners            │
//! │  4. DistanceTracker (hooked to the directory)             │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use trailhistory::app::{AppConfig, TrailApp};
//!
//! let app = TrailApp::start(AppConfig::default().with_feed_file("pois.json"))?;
//! let token = app.directory().register(|event| println!("{:?}", event.kind), app.serial_dispatcher());
//!
//! // Later
//! app.shutdown();
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::{feed_from_settings, TrailApp};
pub use config::AppConfig;
pub use error::AppError;
