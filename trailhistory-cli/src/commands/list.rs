//! List command - print a POI snapshot sorted west to east.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use console::style;
use tracing::warn;
use trailhistory::app::{AppConfig, TrailApp};
use trailhistory::directory::dispatch_queue;
use trailhistory::feed::FileFeed;
use trailhistory::poi::PoiRecord;

use super::common::{apply_location, poi_line, wait_for_pois, LocationArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Extra time beyond the image timeout to wait for every POI.
const SETTLE_MARGIN: Duration = Duration::from_secs(5);

/// Run the list command.
pub fn run(runner: &CliRunner, file: PathBuf, location: LocationArgs) -> Result<(), CliError> {
    runner.log_startup("list");

    let fix = location.coordinate()?;

    // Only valid records are ever published.
    let expected = FileFeed::new(&file)
        .load()?
        .iter()
        .filter_map(|event| PoiRecord::validate(&event.value).ok())
        .map(|record| record.id)
        .collect::<HashSet<_>>()
        .len();

    let config = AppConfig::from(runner.config()).with_feed_file(&file);
    let timeout = Duration::from_secs(config.images.timeout_secs) + SETTLE_MARGIN;
    let app = TrailApp::start_with_runtime(config)?;
    apply_location(app.tracker(), fix);

    let (dispatcher, _queue) = dispatch_queue();
    let token = app.directory().register(|_| {}, Arc::new(dispatcher));

    let found = wait_for_pois(app.directory(), expected, timeout);
    if found < expected {
        warn!(found, expected, "Timed out waiting for POI images");
    }

    let pois = app.directory().sorted();
    println!("{} points of interest, west to east", pois.len());
    println!();
    for (i, poi) in pois.iter().enumerate() {
        println!("{}", poi_line(i, poi, &app.tracker().format_distance(poi.id())));
        if let Some(message) = poi.image().message() {
            for line in message.lines().filter(|l| !l.is_empty()) {
                println!("       {}", style(line).dim());
            }
        }
    }

    drop(token);
    app.shutdown();
    Ok(())
}
