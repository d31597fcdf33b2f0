//! Geographic coordinate helpers
//!
//! Provides the [`Coordinate`] type shared by points of interest, the trail
//! bounds and the distance tracker, plus great-circle distance and the
//! `"{x, y}"` point-string encoding used by the bundled trail data files.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;

/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;

/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;

/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Mean earth radius in meters (IUGG).
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Errors produced while building or parsing coordinates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    #[error("invalid latitude: {0}")]
    InvalidLatitude(f64),

    #[error("invalid longitude: {0}")]
    InvalidLongitude(f64),

    #[error("malformed point string: {0:?}")]
    MalformedPoint(String),
}

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude, positive north of the equator.
    pub latitude: f64,
    /// Longitude, positive east of the prime meridian.
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate without range checks.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create a coordinate, rejecting values outside the valid ranges.
    pub fn checked(latitude: f64, longitude: f64) -> Result<Self, CoordError> {
        if !latitude.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&latitude) {
            return Err(CoordError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(MIN_LON..=MAX_LON).contains(&longitude) {
            return Err(CoordError::InvalidLongitude(longitude));
        }
        Ok(Self::new(latitude, longitude))
    }

    /// Great-circle distance to `other` in meters (haversine formula).
    #[inline]
    pub fn distance_meters(&self, other: &Coordinate) -> f64 {
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_METERS * c
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lat {:.6}, long {:.6}", self.latitude, self.longitude)
    }
}

fn point_regex() -> &'static Regex {
    static POINT: OnceLock<Regex> = OnceLock::new();
    POINT.get_or_init(|| {
        Regex::new(r"^\s*\{\s*([-+]?[0-9]*\.?[0-9]+(?:[eE][-+]?[0-9]+)?)\s*,\s*([-+]?[0-9]*\.?[0-9]+(?:[eE][-+]?[0-9]+)?)\s*\}\s*$")
            .expect("point regex is valid")
    })
}

/// Parse a `"{x, y}"` point string into a coordinate.
///
/// The bundled data files store coordinates as point strings where `x` is the
/// latitude and `y` is the longitude.
///
/// # Examples
///
/// ```
/// use trailhistory::coord::parse_point_string;
///
/// let c = parse_point_string("{35.2271, -80.8431}").unwrap();
/// assert_eq!(c.latitude, 35.2271);
/// assert_eq!(c.longitude, -80.8431);
/// ```
pub fn parse_point_string(text: &str) -> Result<Coordinate, CoordError> {
    let caps = point_regex()
        .captures(text)
        .ok_or_else(|| CoordError::MalformedPoint(text.to_string()))?;

    let parse = |i: usize| -> Result<f64, CoordError> {
        caps[i]
            .parse::<f64>()
            .map_err(|_| CoordError::MalformedPoint(text.to_string()))
    };

    Coordinate::checked(parse(1)?, parse(2)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 1.0);
        let d = a.distance_meters(&b);
        assert!((d - 111_195.08).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_distance_is_symmetric_and_zero_for_same_point() {
        let a = Coordinate::new(35.2271, -80.8431);
        let b = Coordinate::new(35.2100, -80.8600);
        assert_eq!(a.distance_meters(&a), 0.0);
        assert!((a.distance_meters(&b) - b.distance_meters(&a)).abs() < 1e-9);
    }

    #[test]
    fn test_checked_rejects_out_of_range() {
        assert_eq!(
            Coordinate::checked(91.0, 0.0),
            Err(CoordError::InvalidLatitude(91.0))
        );
        assert_eq!(
            Coordinate::checked(0.0, -180.5),
            Err(CoordError::InvalidLongitude(-180.5))
        );
        assert!(Coordinate::checked(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_parse_point_string() {
        let c = parse_point_string(" { 35.5 ,-80.25 } ").unwrap();
        assert_eq!(c, Coordinate::new(35.5, -80.25));
    }

    #[test]
    fn test_parse_point_string_rejects_garbage() {
        assert!(matches!(
            parse_point_string("35.5, -80.25"),
            Err(CoordError::MalformedPoint(_))
        ));
        assert!(parse_point_string("{abc, 1}").is_err());
        assert!(parse_point_string("{95, 1}").is_err());
    }

    #[test]
    fn test_display() {
        let c = Coordinate::new(35.0, -80.5);
        assert_eq!(c.to_string(), "lat 35.000000, long -80.500000");
    }
}
