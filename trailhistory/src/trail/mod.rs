//! Bundled trail data: geographic bounds and the offline POI list.
//!
//! Both documents are JSON. Coordinates in the bounds document are point
//! strings (`"{lat, lon}"`); the offline POI list carries its numbers as
//! strings.

mod bounds;
mod legacy;

use std::path::PathBuf;

use thiserror::Error;

use crate::coord::CoordError;

pub use bounds::{TrailBounds, TrailRegion};
pub use legacy::{load_legacy_pois, parse_legacy_pois, LegacyPoi};

/// Errors reading bundled trail data.
#[derive(Debug, Error)]
pub enum TrailError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Expected a JSON object at the top level")]
    NotAnObject,

    #[error("Missing key '{0}'")]
    MissingKey(&'static str),

    #[error("Key '{0}' is not a string")]
    NotAString(&'static str),

    #[error("Bad coordinate in '{key}': {source}")]
    Coordinate {
        key: &'static str,
        #[source]
        source: CoordError,
    },
}

fn read_file(path: &std::path::Path) -> Result<String, TrailError> {
    std::fs::read_to_string(path).map_err(|source| TrailError::Io {
        path: path.to_path_buf(),
        source,
    })
}
