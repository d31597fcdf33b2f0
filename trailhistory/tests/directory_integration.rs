//! Integration tests for the POI directory and the current POI coordinator.
//!
//! These tests drive the full flow through the public API:
//! - feed child → image fetch → directory publication
//! - directory notifications → coordinator → map and card surfaces
//! - distance tracking through the lifecycle hook
//!
//! Run with: `cargo test --test directory_integration`

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use image::{ImageFormat, Rgba, RgbaImage};
use parking_lot::Mutex;
use serde_json::{json, Value};

use trailhistory::app::{AppConfig, TrailApp};
use trailhistory::coord::Coordinate;
use trailhistory::coordinator::{CardSurface, CurrentPoiCoordinator, MapSurface, Selection};
use trailhistory::directory::{dispatch_queue, DispatchQueue, PoiEvent, PoiEventKind, SubscriptionToken};
use trailhistory::distance::{AuthorizationStatus, LocationAction};
use trailhistory::feed::MemoryFeed;
use trailhistory::imagery::{AsyncHttpClient, HttpFuture, HttpResponse};
use trailhistory::poi::PointOfInterest;

// ============================================================================
// Helpers
// ============================================================================

/// HTTP client serving fixed bodies; unknown URLs answer 404.
#[derive(Default)]
struct StaticImages {
    bodies: HashMap<String, Vec<u8>>,
}

impl StaticImages {
    fn with_png(mut self, url: &str) -> Self {
        let image = RgbaImage::from_pixel(3, 3, Rgba([40, 80, 120, 255]));
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, ImageFormat::Png).unwrap();
        self.bodies.insert(url.to_string(), bytes.into_inner());
        self
    }
}

impl AsyncHttpClient for StaticImages {
    fn get<'a>(&'a self, url: &'a str) -> HttpFuture<'a> {
        Box::pin(async move {
            Ok(match self.bodies.get(url) {
                Some(body) => HttpResponse::ok(body.clone()),
                None => HttpResponse::status(404),
            })
        })
    }
}

#[derive(Default)]
struct MapLog {
    shown: Vec<String>,
    highlighted: Option<String>,
    highlight_calls: Vec<(String, bool)>,
}

#[derive(Clone, Default)]
struct Map(Arc<Mutex<MapLog>>);

impl MapSurface for Map {
    fn show(&mut self, poi: &Arc<PointOfInterest>, highlighted: bool) {
        let mut log = self.0.lock();
        log.shown.push(poi.id().to_string());
        if highlighted {
            log.highlighted = Some(poi.id().to_string());
        }
    }

    fn hide(&mut self, id: &str) {
        let mut log = self.0.lock();
        log.shown.retain(|shown| shown != id);
        if log.highlighted.as_deref() == Some(id) {
            log.highlighted = None;
        }
    }

    fn set_highlighted(&mut self, poi: &Arc<PointOfInterest>, highlighted: bool) {
        let mut log = self.0.lock();
        log.highlight_calls.push((poi.id().to_string(), highlighted));
        if highlighted {
            log.highlighted = Some(poi.id().to_string());
        } else if log.highlighted.as_deref() == Some(poi.id()) {
            log.highlighted = None;
        }
    }

    fn center_on(&mut self, _coordinate: Coordinate) {}
}

#[derive(Default)]
struct CardLog {
    ids: Vec<String>,
    current: Vec<(usize, bool)>,
    scrolled_to: Vec<usize>,
}

#[derive(Clone, Default)]
struct Cards(Arc<Mutex<CardLog>>);

impl CardSurface for Cards {
    fn reload(&mut self, pois: &[Arc<PointOfInterest>], _current: Option<usize>) {
        self.0.lock().ids = pois.iter().map(|p| p.id().to_string()).collect();
    }

    fn set_current(&mut self, index: usize, current: bool) {
        self.0.lock().current.push((index, current));
    }

    fn scroll_to(&mut self, index: usize, _animated: bool) {
        self.0.lock().scrolled_to.push(index);
    }
}

fn site(id: &str, name: &str, lon: f64) -> Value {
    json!({
        "uid": id,
        "name": name,
        "latitude": 35.21,
        "longitude": lon,
        "description": format!("About {}", name),
        "imageUrl": format!("https://img.example.com/{}.png", id),
    })
}

fn start(feed: Arc<MemoryFeed>, images: StaticImages) -> TrailApp {
    let config = AppConfig::default();
    TrailApp::start_with(config, feed, Arc::new(images)).expect("app starts on the test runtime")
}

/// Register a listener that collects events into a vector.
fn collect(app: &TrailApp) -> (SubscriptionToken, DispatchQueue, Arc<Mutex<Vec<PoiEvent>>>) {
    let (dispatcher, queue) = dispatch_queue();
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let token = app
        .directory()
        .register(move |event| sink.lock().push(event), Arc::new(dispatcher));
    (token, queue, events)
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached");
}

/// Load three sites, then replay them to a fresh coordinator.
async fn three_sites() -> (TrailApp, Arc<MemoryFeed>, SubscriptionToken, DispatchQueue, Arc<Mutex<Vec<PoiEvent>>>) {
    let feed = Arc::new(MemoryFeed::new());
    feed.set("a", site("a", "Alpha", -80.84));
    feed.set("b", site("b", "Bravo", -80.83));
    feed.set("c", site("c", "Charlie", -80.85));

    let images = StaticImages::default()
        .with_png("https://img.example.com/a.png")
        .with_png("https://img.example.com/b.png")
        .with_png("https://img.example.com/c.png");
    let app = start(feed.clone(), images);

    let (token, queue, events) = collect(&app);
    let directory = app.directory().clone();
    wait_until(|| directory.len() == 3).await;
    (app, feed, token, queue, events)
}

// ============================================================================
// Integration Tests
// ============================================================================

#[tokio::test]
async fn test_replay_orders_west_to_east_and_selects_westmost() {
    let (app, _feed, _first, _first_queue, _) = three_sites().await;

    // A late listener receives the whole directory as one replay.
    let (_token, mut queue, events) = collect(&app);
    queue.run_pending();

    let map = Map::default();
    let cards = Cards::default();
    let mut coordinator = CurrentPoiCoordinator::new(map.clone(), cards.clone());
    coordinator.apply_batch(events.lock().iter());

    assert_eq!(cards.0.lock().ids, vec!["c", "a", "b"]);
    assert_eq!(coordinator.selection(), Selection::CurrentAt(0));
    assert_eq!(coordinator.current().unwrap().id(), "c");
    assert_eq!(map.0.lock().highlighted.as_deref(), Some("c"));
    assert_eq!(map.0.lock().shown.len(), 3);

    app.shutdown();
}

#[tokio::test]
async fn test_events_applied_as_they_arrive_select_westmost() {
    let (app, _feed, _token, mut queue, events) = three_sites().await;

    let map = Map::default();
    let cards = Cards::default();
    let mut coordinator = CurrentPoiCoordinator::new(map.clone(), cards.clone());

    // Images resolve independently, so apply each notification on its own.
    let mut applied = 0;
    wait_until(|| {
        queue.run_pending();
        for event in events.lock().drain(..) {
            coordinator.apply(&event);
            applied += 1;
        }
        applied == 3
    })
    .await;

    assert_eq!(cards.0.lock().ids, vec!["c", "a", "b"]);
    assert_eq!(coordinator.selection(), Selection::CurrentAt(0));
    assert_eq!(coordinator.current().unwrap().id(), "c");
    assert_eq!(map.0.lock().highlighted.as_deref(), Some("c"));

    app.shutdown();
}

#[tokio::test]
async fn test_annotation_tap_moves_current_and_scrolls_cards() {
    let (app, _feed, _token, mut queue, events) = three_sites().await;
    wait_until(|| {
        queue.run_pending();
        events.lock().len() == 3
    })
    .await;

    let map = Map::default();
    let cards = Cards::default();
    let mut coordinator = CurrentPoiCoordinator::new(map.clone(), cards.clone());
    coordinator.apply_batch(events.lock().iter());

    assert!(coordinator.select_annotation("b"));
    assert_eq!(coordinator.selection(), Selection::CurrentAt(2));
    assert_eq!(cards.0.lock().scrolled_to, vec![2]);
    assert_eq!(map.0.lock().highlighted.as_deref(), Some("b"));

    // The previous current POI reverts on both surfaces.
    assert_eq!(cards.0.lock().current, vec![(0, true), (0, false), (2, true)]);
    assert_eq!(
        map.0.lock().highlight_calls,
        vec![("c".to_string(), true), ("c".to_string(), false), ("b".to_string(), true)]
    );

    app.shutdown();
}

#[tokio::test]
async fn test_removed_current_is_not_restored_on_readd() {
    let (app, feed, _token, mut queue, events) = three_sites().await;
    wait_until(|| {
        queue.run_pending();
        events.lock().len() == 3
    })
    .await;

    let map = Map::default();
    let cards = Cards::default();
    let mut coordinator = CurrentPoiCoordinator::new(map.clone(), cards.clone());
    coordinator.apply_batch(events.lock().drain(..).collect::<Vec<_>>().iter());
    assert_eq!(coordinator.current().unwrap().id(), "c");

    feed.remove("c");
    wait_until(|| {
        queue.run_pending();
        !events.lock().is_empty()
    })
    .await;
    coordinator.apply_batch(events.lock().drain(..).collect::<Vec<_>>().iter());
    assert_eq!(coordinator.selection(), Selection::NoCurrent);
    assert_eq!(cards.0.lock().ids, vec!["a", "b"]);
    assert_eq!(map.0.lock().highlighted, None);

    feed.set("c", site("c", "Charlie", -80.85));
    wait_until(|| {
        queue.run_pending();
        !events.lock().is_empty()
    })
    .await;
    let batch: Vec<_> = events.lock().drain(..).collect();
    assert_eq!(batch[0].kind, PoiEventKind::Added);
    coordinator.apply_batch(batch.iter());

    assert_eq!(cards.0.lock().ids, vec!["c", "a", "b"]);
    assert_eq!(coordinator.selection(), Selection::NoCurrent);

    app.shutdown();
}

#[tokio::test]
async fn test_missing_image_publishes_placeholder_and_malformed_is_skipped() {
    let feed = Arc::new(MemoryFeed::new());
    feed.set("broken", json!({ "uid": "broken", "name": "Nowhere" }));
    feed.set("x", site("x", "Settlers Cemetery", -80.84));

    let app = start(feed, StaticImages::default());
    let (_token, mut queue, events) = collect(&app);
    wait_until(|| {
        queue.run_pending();
        !events.lock().is_empty()
    })
    .await;

    // Give the malformed record a chance to (wrongly) appear.
    tokio::time::sleep(Duration::from_millis(50)).await;
    queue.run_pending();

    let events = events.lock();
    assert_eq!(events.len(), 1);
    let poi = &events[0].poi;
    assert_eq!(poi.id(), "x");
    let message = poi.image().message().expect("placeholder");
    assert!(message.contains("Settlers Cemetery"));
    assert!(message.contains("404"));
    assert_eq!(app.directory().len(), 1);
    drop(events);

    app.shutdown();
}

#[tokio::test]
async fn test_distances_follow_authorization() {
    let (app, _feed, _token, _queue, _events) = three_sites().await;
    let tracker = app.tracker();
    assert_eq!(tracker.tracked_count(), 3);

    assert_eq!(tracker.authorization_changed(AuthorizationStatus::Authorized), LocationAction::StartUpdates);
    tracker.update_location(Coordinate::new(35.21, -80.84));
    assert_eq!(tracker.format_distance("a"), "0 yds");
    assert_ne!(tracker.format_distance("b"), "<unknown>");

    let action = tracker.authorization_changed(AuthorizationStatus::Denied);
    assert!(matches!(action, LocationAction::ShowAdvisory(_)));
    assert_eq!(tracker.format_distance("a"), "<unknown>");
    assert_eq!(tracker.format_distance("b"), "<unknown>");

    app.shutdown();
}
