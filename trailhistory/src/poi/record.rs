//! Validation of raw feed payloads.
//!
//! Each child of the remote `pointOfInterest` collection is a flat,
//! string-keyed record. A record is usable only when every required field is
//! present and well-typed; anything else is rejected with a [`RecordError`]
//! naming the first offending field.

use reqwest::Url;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::coord::{CoordError, Coordinate};

/// Field names of a feed record.
pub mod fields {
    pub const UID: &str = "uid";
    pub const NAME: &str = "name";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const DESCRIPTION: &str = "description";
    pub const IMAGE_URL: &str = "imageUrl";
}

/// Reasons a feed record is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("record is not an object")]
    NotAnObject,

    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' should be a {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("bad coordinate: {0}")]
    InvalidCoordinate(#[from] CoordError),

    #[error("bad image url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// A validated feed record.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub coordinate: Coordinate,
    pub image_url: Url,
}

impl PoiRecord {
    /// Validate a raw JSON payload.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, checking fields in feed order
    /// (`uid`, `name`, `latitude`, `longitude`, `description`, `imageUrl`).
    pub fn validate(value: &Value) -> Result<Self, RecordError> {
        let object = value.as_object().ok_or(RecordError::NotAnObject)?;

        let id = string_field(object, fields::UID)?;
        let name = string_field(object, fields::NAME)?;
        let latitude = number_field(object, fields::LATITUDE)?;
        let longitude = number_field(object, fields::LONGITUDE)?;
        let description = string_field(object, fields::DESCRIPTION)?;
        let url_text = string_field(object, fields::IMAGE_URL)?;

        let coordinate = Coordinate::checked(latitude, longitude)?;
        let image_url = parse_image_url(&url_text)?;

        Ok(Self {
            id,
            name,
            description,
            coordinate,
            image_url,
        })
    }

    /// Extract only the `uid` of a payload.
    ///
    /// Removal events need nothing else, so a removal for a record whose
    /// other fields have since become malformed still goes through.
    pub fn id_of(value: &Value) -> Result<String, RecordError> {
        let object = value.as_object().ok_or(RecordError::NotAnObject)?;
        string_field(object, fields::UID)
    }
}

fn string_field(object: &Map<String, Value>, field: &'static str) -> Result<String, RecordError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(RecordError::MissingField(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(RecordError::WrongType {
            field,
            expected: "string",
        }),
    }
}

fn number_field(object: &Map<String, Value>, field: &'static str) -> Result<f64, RecordError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(RecordError::MissingField(field)),
        Some(value) => value.as_f64().ok_or(RecordError::WrongType {
            field,
            expected: "number",
        }),
    }
}

fn parse_image_url(text: &str) -> Result<Url, RecordError> {
    let url = Url::parse(text).map_err(|e| RecordError::InvalidUrl {
        url: text.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(RecordError::InvalidUrl {
            url: text.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "uid": "poi-1",
            "name": "Settlers Cemetery",
            "latitude": 35.2290,
            "longitude": -80.8400,
            "description": "Oldest burial ground in Charlotte.",
            "imageUrl": "https://images.example.com/settlers.jpg"
        })
    }

    #[test]
    fn test_valid_record() {
        let record = PoiRecord::validate(&valid()).unwrap();
        assert_eq!(record.id, "poi-1");
        assert_eq!(record.name, "Settlers Cemetery");
        assert_eq!(record.coordinate, Coordinate::new(35.2290, -80.8400));
        assert_eq!(
            record.image_url.as_str(),
            "https://images.example.com/settlers.jpg"
        );
    }

    #[test]
    fn test_integer_coordinates_are_numbers() {
        let mut value = valid();
        value["latitude"] = json!(35);
        let record = PoiRecord::validate(&value).unwrap();
        assert_eq!(record.coordinate.latitude, 35.0);
    }

    #[test]
    fn test_each_missing_field_is_reported() {
        for field in [
            fields::UID,
            fields::NAME,
            fields::LATITUDE,
            fields::LONGITUDE,
            fields::DESCRIPTION,
            fields::IMAGE_URL,
        ] {
            let mut value = valid();
            value.as_object_mut().unwrap().remove(field);
            assert_eq!(
                PoiRecord::validate(&value),
                Err(RecordError::MissingField(field)),
                "field {}",
                field
            );
        }
    }

    #[test]
    fn test_null_counts_as_missing() {
        let mut value = valid();
        value["name"] = Value::Null;
        assert_eq!(
            PoiRecord::validate(&value),
            Err(RecordError::MissingField("name"))
        );
    }

    #[test]
    fn test_wrong_types() {
        let mut value = valid();
        value["latitude"] = json!("35.2");
        assert_eq!(
            PoiRecord::validate(&value),
            Err(RecordError::WrongType {
                field: "latitude",
                expected: "number"
            })
        );

        let mut value = valid();
        value["uid"] = json!(17);
        assert!(matches!(
            PoiRecord::validate(&value),
            Err(RecordError::WrongType { field: "uid", .. })
        ));
    }

    #[test]
    fn test_out_of_range_coordinate() {
        let mut value = valid();
        value["longitude"] = json!(-200.0);
        assert!(matches!(
            PoiRecord::validate(&value),
            Err(RecordError::InvalidCoordinate(CoordError::InvalidLongitude(_)))
        ));
    }

    #[test]
    fn test_bad_urls() {
        let mut value = valid();
        value["imageUrl"] = json!("not a url");
        assert!(matches!(
            PoiRecord::validate(&value),
            Err(RecordError::InvalidUrl { .. })
        ));

        let mut value = valid();
        value["imageUrl"] = json!("ftp://images.example.com/a.jpg");
        assert!(matches!(
            PoiRecord::validate(&value),
            Err(RecordError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_not_an_object() {
        assert_eq!(
            PoiRecord::validate(&json!([1, 2])),
            Err(RecordError::NotAnObject)
        );
    }

    #[test]
    fn test_id_of_ignores_other_fields() {
        assert_eq!(
            PoiRecord::id_of(&json!({"uid": "x", "latitude": "bogus"})),
            Ok("x".to_string())
        );
        assert_eq!(
            PoiRecord::id_of(&json!({"name": "x"})),
            Err(RecordError::MissingField("uid"))
        );
    }
}
