//! Trail bounds and the map region derived from them.

use std::path::Path;

use serde_json::{Map, Value};

use super::{read_file, TrailError};
use crate::coord::{parse_point_string, Coordinate};

/// The rectangle the trail occupies, plus its nominal centre.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailBounds {
    pub mid: Coordinate,
    pub top_left: Coordinate,
    pub top_right: Coordinate,
    pub bottom_left: Coordinate,
    /// Optional outline of the trail, in order.
    pub boundary: Vec<Coordinate>,
}

/// A map region: centre plus span in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailRegion {
    pub center: Coordinate,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl TrailBounds {
    /// Load a bounds document from disk.
    pub fn load(path: &Path) -> Result<Self, TrailError> {
        Self::from_json(&read_file(path)?)
    }

    /// Parse a bounds document.
    ///
    /// Expects `midCoord`, `topLeftCoord`, `topRightCoord` and
    /// `bottomLeftCoord` point strings, and optionally a `boundary` array of
    /// point strings.
    pub fn from_json(text: &str) -> Result<Self, TrailError> {
        let value: Value = serde_json::from_str(text)?;
        let object = value.as_object().ok_or(TrailError::NotAnObject)?;

        let boundary = match object.get("boundary") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(points)) => points
                .iter()
                .map(|p| {
                    let text = p.as_str().ok_or(TrailError::NotAString("boundary"))?;
                    parse_point_string(text).map_err(|source| TrailError::Coordinate {
                        key: "boundary",
                        source,
                    })
                })
                .collect::<Result<_, _>>()?,
            Some(_) => return Err(TrailError::NotAString("boundary")),
        };

        Ok(Self {
            mid: point(object, "midCoord")?,
            top_left: point(object, "topLeftCoord")?,
            top_right: point(object, "topRightCoord")?,
            bottom_left: point(object, "bottomLeftCoord")?,
            boundary,
        })
    }

    pub fn bottom_right(&self) -> Coordinate {
        Coordinate::new(self.bottom_left.latitude, self.top_right.longitude)
    }

    /// Region centred on the mid coordinate spanning the whole rectangle.
    pub fn region(&self) -> TrailRegion {
        TrailRegion {
            center: self.mid,
            latitude_delta: (self.top_left.latitude - self.bottom_left.latitude).abs(),
            longitude_delta: (self.top_left.longitude - self.top_right.longitude).abs(),
        }
    }
}

impl TrailRegion {
    pub fn north(&self) -> f64 {
        self.center.latitude + self.latitude_delta / 2.0
    }

    pub fn south(&self) -> f64 {
        self.center.latitude - self.latitude_delta / 2.0
    }

    pub fn west(&self) -> f64 {
        self.center.longitude - self.longitude_delta / 2.0
    }

    pub fn east(&self) -> f64 {
        self.center.longitude + self.longitude_delta / 2.0
    }

    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        (self.south()..=self.north()).contains(&coordinate.latitude)
            && (self.west()..=self.east()).contains(&coordinate.longitude)
    }

    /// The smallest region covering both this region and a same-sized region
    /// centred on `other` (for showing the trail and the user together).
    ///
    /// Assumes both lie on the same side of the antimeridian.
    pub fn union_centered_on(&self, other: Coordinate) -> TrailRegion {
        let other = TrailRegion {
            center: other,
            ..*self
        };
        let north = self.north().max(other.north());
        let south = self.south().min(other.south());
        let west = self.west().min(other.west());
        let east = self.east().max(other.east());
        TrailRegion {
            center: Coordinate::new((north + south) / 2.0, (west + east) / 2.0),
            latitude_delta: north - south,
            longitude_delta: east - west,
        }
    }
}

fn point(object: &Map<String, Value>, key: &'static str) -> Result<Coordinate, TrailError> {
    let text = object
        .get(key)
        .ok_or(TrailError::MissingKey(key))?
        .as_str()
        .ok_or(TrailError::NotAString(key))?;
    parse_point_string(text).map_err(|source| TrailError::Coordinate { key, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const DOC: &str = r#"{
        "midCoord": "{35.2200, -80.8430}",
        "topLeftCoord": "{35.2300, -80.8500}",
        "topRightCoord": "{35.2300, -80.8360}",
        "bottomLeftCoord": "{35.2100, -80.8500}",
        "boundary": ["{35.23, -80.85}", "{35.21, -80.836}"]
    }"#;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_region_from_bounds() {
        let bounds = TrailBounds::from_json(DOC).unwrap();
        let region = bounds.region();
        assert_eq!(region.center, Coordinate::new(35.22, -80.843));
        assert!(close(region.latitude_delta, 0.02));
        assert!(close(region.longitude_delta, 0.014));
        assert_eq!(bounds.bottom_right(), Coordinate::new(35.21, -80.836));
        assert_eq!(bounds.boundary.len(), 2);
    }

    #[test]
    fn test_contains_and_union() {
        let region = TrailBounds::from_json(DOC).unwrap().region();
        assert!(region.contains(&Coordinate::new(35.22, -80.84)));
        assert!(!region.contains(&Coordinate::new(35.30, -80.84)));

        let combined = region.union_centered_on(Coordinate::new(35.30, -80.843));
        assert!(combined.contains(&Coordinate::new(35.30, -80.843)));
        assert!(combined.contains(&region.center));
        assert!(close(combined.north(), 35.31));
        assert!(close(combined.south(), 35.21));
    }

    #[test]
    fn test_missing_and_malformed_keys() {
        let err = TrailBounds::from_json(r#"{"midCoord": "{1, 2}"}"#).unwrap_err();
        assert!(matches!(err, TrailError::MissingKey("topLeftCoord")));

        let err = TrailBounds::from_json(
            r#"{"midCoord": "1, 2", "topLeftCoord": "{1, 2}", "topRightCoord": "{1, 2}", "bottomLeftCoord": "{1, 2}"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, TrailError::Coordinate { key: "midCoord", .. }));

        assert!(matches!(TrailBounds::from_json("[]"), Err(TrailError::NotAnObject)));
        assert!(matches!(TrailBounds::from_json("{"), Err(TrailError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(DOC.as_bytes()).unwrap();
        let bounds = TrailBounds::load(file.path()).unwrap();
        assert_eq!(bounds.mid, Coordinate::new(35.22, -80.843));

        let missing = TrailBounds::load(Path::new("/nonexistent/bounds.json"));
        assert!(matches!(missing, Err(TrailError::Io { .. })));
    }
}
