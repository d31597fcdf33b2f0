//! Point of interest model.
//!
//! A [`PointOfInterest`] is a named, geolocated historical site with a
//! narrative and an image. POIs are built from raw feed payloads
//! ([`PoiRecord`]) once their image has been resolved, and are shared as
//! `Arc<PointOfInterest>` between the directory and its listeners.

mod model;
mod record;

pub use model::{format_distance, sort_by_longitude, PoiImage, PointOfInterest, UNKNOWN_DISTANCE};
pub use record::{fields, PoiRecord, RecordError};
