//! The POI directory service.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::dispatch::Dispatcher;
use super::event::{PoiEvent, PoiEventKind, PoiLifecycleHook, PoiListener};
use super::token::{Registry, SubscriptionToken};
use crate::feed::{Feed, FeedEvent, FeedEventKind};
use crate::imagery::ImageResolver;
use crate::poi::{sort_by_longitude, PoiImage, PoiRecord, PointOfInterest};

/// One registered listener and the context it runs on.
struct Registrant {
    id: u64,
    listener: PoiListener,
    dispatcher: Arc<dyn Dispatcher>,
    active: Arc<AtomicBool>,
}

impl Registrant {
    fn deliver(&self, event: PoiEvent) {
        let listener = Arc::clone(&self.listener);
        let active = Arc::clone(&self.active);
        self.dispatcher.dispatch(Box::new(move || {
            // Re-checked on the listener's side: the token may have been
            // closed while this notification sat in the queue.
            if active.load(Ordering::SeqCst) {
                listener(event);
            }
        }));
    }
}

struct Entry {
    arrival: u64,
    poi: Arc<PointOfInterest>,
}

#[derive(Default)]
struct DirectoryState {
    /// POIs whose image is resolved, keyed by id.
    published: HashMap<String, Entry>,
    /// Latest outstanding image fetch per id. Only that fetch may publish.
    pending: HashMap<String, u64>,
    next_fetch: u64,
    next_arrival: u64,
    registrants: Vec<Registrant>,
    next_registrant: u64,
    /// Set while the feed is being observed.
    feed_cancel: Option<CancellationToken>,
}

impl DirectoryState {
    fn entries_in_arrival_order(&self) -> Vec<Arc<PointOfInterest>> {
        let mut entries: Vec<&Entry> = self.published.values().collect();
        entries.sort_by_key(|e| e.arrival);
        entries.into_iter().map(|e| Arc::clone(&e.poi)).collect()
    }
}

struct DirectoryInner {
    feed: Arc<dyn Feed>,
    resolver: ImageResolver,
    runtime: Handle,
    state: Mutex<DirectoryState>,
    hooks: RwLock<Vec<Arc<dyn PoiLifecycleHook>>>,
}

/// Authoritative registry of POIs, fed by a [`Feed`].
///
/// The directory observes the feed while at least one listener is
/// registered (or after an explicit [`start`](Self::start)). Each valid
/// `added`/`changed` record has its image resolved before it is published;
/// malformed records are logged and dropped. Listeners receive every
/// published POI, existing ones first, on the dispatcher they registered
/// with.
///
/// Cloning is cheap and yields a handle to the same directory.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use trailhistory::directory::{PoiDirectory, SerialDispatcher};
///
/// let directory = PoiDirectory::new(feed, resolver, handle.clone());
/// let token = directory.register(
///     |event| println!("{} {}", event.kind, event.poi.name()),
///     Arc::new(SerialDispatcher::spawn(&handle)),
/// );
///
/// // Later
/// directory.deregister(&token);
/// ```
#[derive(Clone)]
pub struct PoiDirectory {
    inner: Arc<DirectoryInner>,
}

impl PoiDirectory {
    /// Create a directory. Nothing is observed until the first registration
    /// or an explicit [`start`](Self::start).
    ///
    /// # Arguments
    ///
    /// * `feed` - Source of POI child events
    /// * `resolver` - Image fetcher with placeholder fallback
    /// * `runtime` - Runtime on which the feed and image tasks run
    pub fn new(feed: Arc<dyn Feed>, resolver: ImageResolver, runtime: Handle) -> Self {
        Self {
            inner: Arc::new(DirectoryInner {
                feed,
                resolver,
                runtime,
                state: Mutex::new(DirectoryState::default()),
                hooks: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Begin observing the feed if not already doing so.
    pub fn start(&self) {
        let mut state = self.inner.state.lock();
        if state.feed_cancel.is_none() {
            self.inner.open_feed(&mut state);
        }
    }

    /// Stop observing the feed, close every subscription and forget all POIs.
    ///
    /// Queued notifications are not delivered. The directory can be started
    /// again afterwards.
    pub fn shutdown(&self) {
        let mut state = self.inner.state.lock();
        for registrant in state.registrants.drain(..) {
            registrant.active.store(false, Ordering::SeqCst);
        }
        self.inner.close_feed(&mut state);
        info!("POI directory shut down");
    }

    /// Register a listener.
    ///
    /// Every POI already published is delivered as [`PoiEventKind::Added`],
    /// followed by live events. All invocations happen on `dispatcher`.
    /// The returned token controls the subscription.
    pub fn register<F>(&self, listener: F, dispatcher: Arc<dyn Dispatcher>) -> SubscriptionToken
    where
        F: Fn(PoiEvent) + Send + Sync + 'static,
    {
        let mut state = self.inner.state.lock();

        let id = state.next_registrant;
        state.next_registrant += 1;

        let active = Arc::new(AtomicBool::new(true));
        let registrant = Registrant {
            id,
            listener: Arc::new(listener),
            dispatcher,
            active: Arc::clone(&active),
        };

        for poi in state.entries_in_arrival_order() {
            registrant.deliver(PoiEvent::new(PoiEventKind::Added, poi));
        }
        state.registrants.push(registrant);

        if state.feed_cancel.is_none() {
            self.inner.open_feed(&mut state);
        }

        debug!(registrant = id, listeners = state.registrants.len(), "Listener registered");

        let weak: Weak<DirectoryInner> = Arc::downgrade(&self.inner);
        let registry: Weak<dyn Registry> = weak;
        SubscriptionToken::new(id, active, registry)
    }

    /// Cancel a subscription. Calling it again is a no-op.
    pub fn deregister(&self, token: &SubscriptionToken) {
        token.close();
    }

    /// Attach a lifecycle hook.
    ///
    /// The hook immediately sees every POI already published.
    pub fn add_hook(&self, hook: Arc<dyn PoiLifecycleHook>) {
        let state = self.inner.state.lock();
        for poi in state.entries_in_arrival_order() {
            hook.on_published(&poi);
        }
        self.inner.hooks.write().push(hook);
    }

    /// Published POIs in arrival order.
    pub fn snapshot(&self) -> Vec<Arc<PointOfInterest>> {
        self.inner.state.lock().entries_in_arrival_order()
    }

    /// Published POIs sorted west to east.
    pub fn sorted(&self) -> Vec<Arc<PointOfInterest>> {
        let mut pois = self.snapshot();
        sort_by_longitude(&mut pois);
        pois
    }

    pub fn get(&self, id: &str) -> Option<Arc<PointOfInterest>> {
        self.inner
            .state
            .lock()
            .published
            .get(id)
            .map(|e| Arc::clone(&e.poi))
    }

    pub fn len(&self) -> usize {
        self.inner.state.lock().published.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of image fetches whose result is still awaited.
    pub fn pending_images(&self) -> usize {
        self.inner.state.lock().pending.len()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.state.lock().registrants.len()
    }

    /// Whether the feed is currently being observed.
    pub fn is_observing(&self) -> bool {
        self.inner.state.lock().feed_cancel.is_some()
    }
}

impl Registry for DirectoryInner {
    fn release(&self, registrant_id: u64) {
        let mut state = self.state.lock();
        state.registrants.retain(|r| r.id != registrant_id);
        debug!(
            registrant = registrant_id,
            listeners = state.registrants.len(),
            "Listener deregistered"
        );
        if state.registrants.is_empty() {
            self.close_feed(&mut state);
        }
    }
}

impl DirectoryInner {
    fn open_feed(self: &Arc<Self>, state: &mut DirectoryState) {
        let cancel = CancellationToken::new();
        state.feed_cancel = Some(cancel.clone());
        self.runtime.spawn(run_feed(Arc::clone(self), cancel));
    }

    /// Stop observing and drop everything learned from the feed.
    fn close_feed(&self, state: &mut DirectoryState) {
        let Some(cancel) = state.feed_cancel.take() else {
            return;
        };
        cancel.cancel();
        state.pending.clear();

        let hooks = self.hooks.read();
        for id in state.published.keys() {
            for hook in hooks.iter() {
                hook.on_removed(id);
            }
        }
        state.published.clear();
        info!(feed = %self.feed.name(), "Stopped observing POI feed");
    }

    fn handle_feed_event(self: &Arc<Self>, event: FeedEvent, cancel: &CancellationToken) {
        match event.kind {
            FeedEventKind::Added | FeedEventKind::Changed => match PoiRecord::validate(&event.value) {
                Ok(record) => self.begin_fetch(record, cancel),
                Err(e) => {
                    warn!(
                        key = %event.key,
                        kind = %event.kind,
                        error = %e,
                        "Invalid POI data - record dropped"
                    );
                }
            },
            FeedEventKind::Removed => match PoiRecord::id_of(&event.value) {
                Ok(id) => self.remove(&id, cancel),
                Err(e) => {
                    warn!(key = %event.key, error = %e, "Invalid POI removal - ignored");
                }
            },
        }
    }

    fn begin_fetch(self: &Arc<Self>, record: PoiRecord, cancel: &CancellationToken) {
        let seq = {
            let mut state = self.state.lock();
            if cancel.is_cancelled() {
                return;
            }
            let seq = state.next_fetch;
            state.next_fetch += 1;
            state.pending.insert(record.id.clone(), seq);
            seq
        };

        debug!(poi = %record.id, url = %record.image_url, "Resolving POI image");

        let inner = Arc::clone(self);
        self.runtime.spawn(async move {
            let image = inner.resolver.resolve(&record.name, &record.image_url).await;
            inner.complete(record, image, seq);
        });
    }

    fn complete(&self, record: PoiRecord, image: PoiImage, seq: u64) {
        let mut state = self.state.lock();

        match state.pending.get(&record.id) {
            Some(&latest) if latest == seq => {
                state.pending.remove(&record.id);
            }
            _ => {
                debug!(poi = %record.id, "Discarding superseded image result");
                return;
            }
        }

        let id = record.id.clone();
        let poi = Arc::new(PointOfInterest::new(record, image));

        let kind = match state.published.get_mut(&id) {
            Some(entry) => {
                entry.poi = Arc::clone(&poi);
                PoiEventKind::Updated
            }
            None => {
                let arrival = state.next_arrival;
                state.next_arrival += 1;
                state.published.insert(
                    id.clone(),
                    Entry {
                        arrival,
                        poi: Arc::clone(&poi),
                    },
                );
                PoiEventKind::Added
            }
        };

        for hook in self.hooks.read().iter() {
            hook.on_published(&poi);
        }
        for registrant in &state.registrants {
            registrant.deliver(PoiEvent::new(kind, Arc::clone(&poi)));
        }

        info!(
            poi = %id,
            name = poi.name(),
            kind = %kind,
            placeholder = poi.image().is_placeholder(),
            "POI published"
        );
    }

    fn remove(&self, id: &str, cancel: &CancellationToken) {
        let mut state = self.state.lock();
        if cancel.is_cancelled() {
            return;
        }

        let in_flight = state.pending.remove(id).is_some();

        match state.published.remove(id) {
            Some(entry) => {
                for hook in self.hooks.read().iter() {
                    hook.on_removed(id);
                }
                for registrant in &state.registrants {
                    registrant.deliver(PoiEvent::new(PoiEventKind::Removed, Arc::clone(&entry.poi)));
                }
                info!(poi = %id, name = entry.poi.name(), "POI removed");
            }
            None => {
                debug!(poi = %id, in_flight, "Removal for unpublished POI");
            }
        }
    }
}

async fn run_feed(inner: Arc<DirectoryInner>, cancel: CancellationToken) {
    let mut subscription = match inner.feed.subscribe() {
        Ok(subscription) => subscription,
        Err(e) => {
            error!(feed = %inner.feed.name(), error = %e, "Failed to observe POI feed");
            return;
        }
    };

    info!(feed = %inner.feed.name(), "Observing POI feed");

    loop {
        let event = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            event = subscription.next() => event,
        };

        match event {
            Some(event) => inner.handle_feed_event(event, &cancel),
            None => {
                info!(feed = %inner.feed.name(), "POI feed ended");
                break;
            }
        }
    }
}
