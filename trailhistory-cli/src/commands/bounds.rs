//! Bounds command - show the trail region from a bounds document.

use std::path::PathBuf;

use trailhistory::trail::{TrailBounds, TrailRegion};

use super::common::LocationArgs;
use crate::error::CliError;

/// Run the bounds command.
pub fn run(file: PathBuf, location: LocationArgs) -> Result<(), CliError> {
    let bounds = TrailBounds::load(&file)?;
    let region = bounds.region();

    println!("Trail Bounds");
    println!("============");
    println!();
    println!("Top left:     {}", bounds.top_left);
    println!("Top right:    {}", bounds.top_right);
    println!("Bottom left:  {}", bounds.bottom_left);
    println!("Bottom right: {}", bounds.bottom_right());
    if !bounds.boundary.is_empty() {
        println!("Boundary:     {} points", bounds.boundary.len());
    }
    println!();
    print_region("Region", &region);

    if let Some(user) = location.coordinate()? {
        println!();
        if region.contains(&user) {
            println!("You are on the trail ({})", user);
        } else {
            println!("You are off the trail ({})", user);
            print_region("Region showing trail and you", &region.union_centered_on(user));
        }
    }

    Ok(())
}

fn print_region(title: &str, region: &TrailRegion) {
    println!("{}:", title);
    println!("  Center: {}", region.center);
    println!(
        "  Span:   {:.6} deg latitude, {:.6} deg longitude",
        region.latitude_delta, region.longitude_delta
    );
}
