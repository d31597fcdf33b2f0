//! In-process feed.
//!
//! Holds the collection in memory and pushes child events to every live
//! subscription, the same way the remote store does: existing children are
//! replayed as `added` on subscribe, then edits arrive as they happen.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::types::{Feed, FeedError, FeedEvent, FeedEventKind, FeedSubscription};

#[derive(Default)]
struct MemoryFeedInner {
    children: BTreeMap<String, Value>,
    subscribers: Vec<(mpsc::UnboundedSender<FeedEvent>, CancellationToken)>,
}

impl MemoryFeedInner {
    fn broadcast(&mut self, event: FeedEvent) {
        self.subscribers
            .retain(|(tx, cancel)| !cancel.is_cancelled() && tx.send(event.clone()).is_ok());
    }
}

/// An in-memory `pointOfInterest` collection.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use trailhistory::feed::MemoryFeed;
///
/// let feed = MemoryFeed::new();
/// feed.set("a", json!({"uid": "a"}));
/// assert_eq!(feed.len(), 1);
/// ```
#[derive(Default)]
pub struct MemoryFeed {
    inner: Mutex<MemoryFeedInner>,
}

impl MemoryFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a child, emitting `added` or `changed`.
    pub fn set(&self, key: impl Into<String>, value: Value) {
        let key = key.into();
        let mut inner = self.inner.lock();
        let kind = match inner.children.insert(key.clone(), value.clone()) {
            Some(_) => FeedEventKind::Changed,
            None => FeedEventKind::Added,
        };
        debug!(key = %key, kind = %kind, "Memory feed child set");
        inner.broadcast(FeedEvent::new(kind, key, value));
    }

    /// Remove a child, emitting `removed` with its last value.
    ///
    /// Returns `false` if no such child exists.
    pub fn remove(&self, key: &str) -> bool {
        let mut inner = self.inner.lock();
        match inner.children.remove(key) {
            Some(value) => {
                inner.broadcast(FeedEvent::new(FeedEventKind::Removed, key, value));
                true
            }
            None => false,
        }
    }

    /// Push an arbitrary event without touching the stored children.
    ///
    /// Lets callers replay events exactly as a remote store delivered them.
    pub fn emit(&self, event: FeedEvent) {
        self.inner.lock().broadcast(event);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of subscriptions still observing the collection.
    pub fn subscriber_count(&self) -> usize {
        let mut inner = self.inner.lock();
        inner
            .subscribers
            .retain(|(tx, cancel)| !cancel.is_cancelled() && !tx.is_closed());
        inner.subscribers.len()
    }
}

impl Feed for MemoryFeed {
    fn name(&self) -> String {
        "memory".to_string()
    }

    fn subscribe(&self) -> Result<FeedSubscription, FeedError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let mut inner = self.inner.lock();
        for (key, value) in &inner.children {
            // The receiver is alive: it is returned below.
            let _ = tx.send(FeedEvent::new(FeedEventKind::Added, key, value.clone()));
        }
        inner.subscribers.push((tx, cancel.clone()));

        Ok(FeedSubscription::new(rx, cancel))
    }
}
