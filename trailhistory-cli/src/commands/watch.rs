//! Watch command - follow the live POI feed and the current POI.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use console::style;
use parking_lot::Mutex;
use tracing::debug;
use trailhistory::app::TrailApp;
use trailhistory::coord::Coordinate;
use trailhistory::coordinator::{
    CardSurface, CurrentPoiCoordinator, MapSurface, SelectionChange, SelectionOrigin,
};
use trailhistory::directory::{dispatch_queue, DispatchQueue, PoiEvent, PoiEventKind};
use trailhistory::distance::DistanceTracker;
use trailhistory::poi::PointOfInterest;

use super::common::{apply_location, resolve_app_config, FeedArgs, LocationArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// How often the terminal loop drains notifications.
const DRAIN_INTERVAL: Duration = Duration::from_millis(100);

/// Notifications collected by listeners running on this loop's queue.
type Inbox<T> = Arc<Mutex<Vec<T>>>;

/// Run the queued notifications and take everything they delivered.
fn drain<T>(queue: &mut DispatchQueue, inbox: &Inbox<T>) -> Vec<T> {
    queue.run_pending();
    std::mem::take(&mut *inbox.lock())
}

/// Map surface for a terminal: there is no map, so only log.
struct TerminalMap;

impl MapSurface for TerminalMap {
    fn show(&mut self, poi: &Arc<PointOfInterest>, highlighted: bool) {
        debug!(poi = %poi.id(), highlighted, "map: show annotation");
    }

    fn hide(&mut self, id: &str) {
        debug!(poi = %id, "map: hide annotation");
    }

    fn set_highlighted(&mut self, poi: &Arc<PointOfInterest>, highlighted: bool) {
        debug!(poi = %poi.id(), highlighted, "map: highlight");
    }

    fn center_on(&mut self, coordinate: Coordinate) {
        debug!(center = %coordinate, "map: recenter");
    }
}

/// Card strip for a terminal: remembers names to print the selection.
#[derive(Default)]
struct TerminalCards {
    names: Vec<String>,
}

impl CardSurface for TerminalCards {
    fn reload(&mut self, pois: &[Arc<PointOfInterest>], current: Option<usize>) {
        self.names = pois.iter().map(|p| p.name().to_string()).collect();
        debug!(cards = self.names.len(), current = ?current, "cards: reload");
    }

    fn set_current(&mut self, index: usize, current: bool) {
        debug!(index, current, "cards: set current");
    }

    fn scroll_to(&mut self, index: usize, animated: bool) {
        debug!(index, animated, "cards: scroll");
    }
}

/// Run the watch command.
pub fn run(runner: &CliRunner, feed: FeedArgs, location: LocationArgs) -> Result<(), CliError> {
    runner.log_startup("watch");

    let fix = location.coordinate()?;
    let app = TrailApp::start_with_runtime(resolve_app_config(&feed, runner.config()))?;
    apply_location(app.tracker(), fix);

    println!("Trail of History v{}", trailhistory::VERSION);
    println!("=========================");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();
    ctrlc::set_handler(move || {
        shutdown_clone.store(true, Ordering::SeqCst);
    })
    .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    let (dispatcher, mut queue) = dispatch_queue();
    let events: Inbox<PoiEvent> = Arc::default();
    let sink = Arc::clone(&events);
    let token = app
        .directory()
        .register(move |event| sink.lock().push(event), Arc::new(dispatcher));

    let mut coordinator = CurrentPoiCoordinator::new(TerminalMap, TerminalCards::default());
    let changes: Inbox<SelectionChange> = Arc::default();
    let sink = Arc::clone(&changes);
    coordinator.on_selection_change(move |change| sink.lock().push(*change));

    while !shutdown.load(Ordering::SeqCst) {
        let batch = drain(&mut queue, &events);
        if !batch.is_empty() {
            for event in &batch {
                println!("{}", event_line(event, app.tracker()));
            }
            coordinator.apply_batch(batch.iter());
        }

        let pending = std::mem::take(&mut *changes.lock());
        for change in pending {
            if change.origin == SelectionOrigin::Reindex {
                continue;
            }
            match coordinator.current() {
                Some(poi) => println!(
                    "{} {} ({})",
                    style("current:").bold(),
                    style(poi.name()).cyan(),
                    change.origin
                ),
                None => println!("{} none ({})", style("current:").bold(), change.origin),
            }
        }

        std::thread::sleep(DRAIN_INTERVAL);
    }

    println!();
    println!("Stopping...");
    drop(token);
    println!("{} POIs seen", coordinator.pois().len());
    app.shutdown();
    Ok(())
}

fn event_line(event: &PoiEvent, tracker: &DistanceTracker) -> String {
    let poi = &event.poi;
    let kind = match event.kind {
        PoiEventKind::Added => style("added").green(),
        PoiEventKind::Updated => style("updated").yellow(),
        PoiEventKind::Removed => style("removed").red(),
    };
    let mut line = format!(
        "{:>9} {} [{}] {}",
        kind,
        poi.name(),
        tracker.format_distance(poi.id()),
        style(poi.coordinate()).dim()
    );
    if event.kind != PoiEventKind::Removed && poi.image().is_placeholder() {
        line.push_str(&format!(" {}", style("(placeholder image)").dim()));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use trailhistory::directory::Dispatcher;

    #[test]
    fn test_drain_runs_queue_and_empties_inbox() {
        let (dispatcher, mut queue) = dispatch_queue();
        let inbox: Inbox<u32> = Arc::default();

        for i in 0..3 {
            let sink = Arc::clone(&inbox);
            dispatcher.dispatch(Box::new(move || sink.lock().push(i)));
        }
        assert!(inbox.lock().is_empty());

        assert_eq!(drain(&mut queue, &inbox), vec![0, 1, 2]);
        assert!(drain(&mut queue, &inbox).is_empty());
    }
}
