//! The published point of interest and its resolved image.

use std::fmt;
use std::sync::Arc;

use image::RgbaImage;
use reqwest::Url;

use super::record::PoiRecord;
use crate::coord::Coordinate;

/// Text shown when no distance is known.
pub const UNKNOWN_DISTANCE: &str = "<unknown>";

/// The image attached to a published POI.
///
/// A POI never reaches listeners without one: when the real image cannot be
/// fetched, a placeholder carrying the failure text is substituted.
#[derive(Clone)]
pub enum PoiImage {
    /// The image downloaded from the POI's `imageUrl`.
    Fetched(Arc<RgbaImage>),

    /// A synthesized stand-in explaining why the real image is missing.
    Placeholder {
        bitmap: Arc<RgbaImage>,
        message: String,
    },
}

impl PoiImage {
    /// The bitmap to display, real or placeholder.
    pub fn bitmap(&self) -> &RgbaImage {
        match self {
            PoiImage::Fetched(bitmap) => bitmap,
            PoiImage::Placeholder { bitmap, .. } => bitmap,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, PoiImage::Placeholder { .. })
    }

    /// The explanatory text of a placeholder, `None` for fetched images.
    pub fn message(&self) -> Option<&str> {
        match self {
            PoiImage::Fetched(_) => None,
            PoiImage::Placeholder { message, .. } => Some(message),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.bitmap().dimensions()
    }
}

impl fmt::Debug for PoiImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.dimensions();
        match self {
            PoiImage::Fetched(_) => f
                .debug_struct("Fetched")
                .field("width", &width)
                .field("height", &height)
                .finish(),
            PoiImage::Placeholder { message, .. } => f
                .debug_struct("Placeholder")
                .field("width", &width)
                .field("height", &height)
                .field("message", message)
                .finish(),
        }
    }
}

/// A named, geolocated historical site.
///
/// Immutable once published; an update from the feed produces a new value
/// with the same `id`.
#[derive(Debug, Clone)]
pub struct PointOfInterest {
    id: String,
    name: String,
    description: String,
    coordinate: Coordinate,
    image_url: Url,
    image: PoiImage,
}

impl PointOfInterest {
    /// Build a POI from a validated record and its resolved image.
    pub fn new(record: PoiRecord, image: PoiImage) -> Self {
        Self {
            id: record.id,
            name: record.name,
            description: record.description,
            coordinate: record.coordinate,
            image_url: record.image_url,
            image,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The narrative shown on the detail screen.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn longitude(&self) -> f64 {
        self.coordinate.longitude
    }

    pub fn image_url(&self) -> &Url {
        &self.image_url
    }

    pub fn image(&self) -> &PoiImage {
        &self.image
    }
}

/// Sort POIs west to east.
///
/// The sort is stable: POIs sharing a longitude keep their relative order.
pub fn sort_by_longitude(pois: &mut [Arc<PointOfInterest>]) {
    pois.sort_by(|a, b| a.longitude().total_cmp(&b.longitude()));
}

/// Format a distance in yards for display.
///
/// Rounds to the nearest yard; `None` (no location fix, or location access
/// not authorized) renders as `<unknown>`.
///
/// # Examples
///
/// ```
/// use trailhistory::poi::format_distance;
///
/// assert_eq!(format_distance(Some(152.6)), "153 yds");
/// assert_eq!(format_distance(None), "<unknown>");
/// ```
pub fn format_distance(yards: Option<f64>) -> String {
    match yards {
        Some(d) if d.is_finite() => format!("{} yds", d.round() as i64),
        _ => UNKNOWN_DISTANCE.to_string(),
    }
}
