//! Offline command - list the bundled POI file without any feed.

use std::path::PathBuf;
use std::sync::Arc;

use trailhistory::distance::YARDS_PER_METER;
use trailhistory::poi::format_distance;
use trailhistory::trail::{load_legacy_pois, LegacyPoi};

use super::common::LocationArgs;
use crate::error::CliError;

/// Run the offline command.
pub fn run(file: PathBuf, location: LocationArgs, describe: bool) -> Result<(), CliError> {
    let pois: Vec<Arc<LegacyPoi>> = load_legacy_pois(&file)?;
    let user = location.coordinate()?;

    println!("{} offline points of interest, west to east", pois.len());
    println!();

    for (i, poi) in pois.iter().enumerate() {
        let distance = format_distance(
            user.map(|u| u.distance_meters(&poi.coordinate) * YARDS_PER_METER),
        );
        println!(
            "{:>3}. {:<36} {:>10}   {}",
            i + 1,
            poi.name,
            distance,
            poi.subtitle()
        );
        if describe && !poi.description.is_empty() {
            println!("       {}", poi.description);
        }
    }

    Ok(())
}
