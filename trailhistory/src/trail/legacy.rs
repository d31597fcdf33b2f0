//! The offline POI list.
//!
//! A JSON object mapping each POI's name to its data:
//!
//! ```json
//! { "Latta Place": { "latitude": "35.1234", "longitude": "-80.8123", "description": "..." } }
//! ```
//!
//! Older files carry a single `location` point string instead of the two
//! numbers. Numbers may be JSON numbers or strings.

use std::path::Path;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::warn;

use super::{read_file, TrailError};
use crate::coord::{parse_point_string, Coordinate};

/// A POI from the offline list. No id, no image.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyPoi {
    pub name: String,
    pub coordinate: Coordinate,
    pub description: String,
}

impl LegacyPoi {
    /// Map callout subtitle.
    pub fn subtitle(&self) -> String {
        self.coordinate.to_string()
    }
}

/// Load and sort the offline POI list.
pub fn load_legacy_pois(path: &Path) -> Result<Vec<Arc<LegacyPoi>>, TrailError> {
    parse_legacy_pois(&read_file(path)?)
}

/// Parse the offline POI list, sorted west to east.
///
/// Entries lacking a coordinate or description, or with unparsable numbers,
/// are logged and skipped.
pub fn parse_legacy_pois(text: &str) -> Result<Vec<Arc<LegacyPoi>>, TrailError> {
    let value: Value = serde_json::from_str(text)?;
    let object = value.as_object().ok_or(TrailError::NotAnObject)?;

    let mut pois: Vec<Arc<LegacyPoi>> = object
        .iter()
        .filter_map(|(name, data)| match entry(name, data) {
            Ok(poi) => Some(Arc::new(poi)),
            Err(reason) => {
                warn!(poi = %name, reason = %reason, "Skipping offline POI");
                None
            }
        })
        .collect();

    pois.sort_by(|a, b| a.coordinate.longitude.total_cmp(&b.coordinate.longitude));
    Ok(pois)
}

fn entry(name: &str, data: &Value) -> Result<LegacyPoi, String> {
    let data = data.as_object().ok_or("not an object")?;

    let description = data
        .get("description")
        .and_then(Value::as_str)
        .ok_or("no description")?;

    let coordinate = match data.get("location").and_then(Value::as_str) {
        Some(location) => parse_point_string(location).map_err(|e| e.to_string())?,
        None => {
            let latitude = number(data, "latitude")?;
            let longitude = number(data, "longitude")?;
            Coordinate::checked(latitude, longitude).map_err(|e| e.to_string())?
        }
    };

    Ok(LegacyPoi {
        name: name.to_string(),
        coordinate,
        description: description.to_string(),
    })
}

fn number(data: &Map<String, Value>, key: &str) -> Result<f64, String> {
    match data.get(key) {
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("{} is not a number: {:?}", key, s)),
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| format!("{} out of range", key)),
        Some(_) => Err(format!("{} has the wrong type", key)),
        None => Err(format!("no {}", key)),
    }
}
