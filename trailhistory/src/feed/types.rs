//! Feed event and subscription types.

use std::fmt;
use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Kind of child event emitted by a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedEventKind {
    Added,
    Changed,
    Removed,
}

impl fmt::Display for FeedEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeedEventKind::Added => "child_added",
            FeedEventKind::Changed => "child_changed",
            FeedEventKind::Removed => "child_removed",
        };
        f.write_str(name)
    }
}

/// One raw child event: the child's key and its (unvalidated) value.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEvent {
    pub kind: FeedEventKind,
    pub key: String,
    pub value: Value,
}

impl FeedEvent {
    pub fn new(kind: FeedEventKind, key: impl Into<String>, value: Value) -> Self {
        Self {
            kind,
            key: key.into(),
            value,
        }
    }
}

/// Errors opening or reading a feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to read feed file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse feed data: {0}")]
    Parse(String),

    #[error("unexpected feed data layout: {0}")]
    Format(String),

    #[error("failed to connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("feed requires a running Tokio runtime")]
    NoRuntime,
}

/// A live observation of a feed.
///
/// Events arrive through [`next`](Self::next). Dropping the subscription (or
/// calling [`cancel`](Self::cancel)) stops the upstream observation.
#[derive(Debug)]
pub struct FeedSubscription {
    events: mpsc::UnboundedReceiver<FeedEvent>,
    cancel: CancellationToken,
}

impl FeedSubscription {
    /// Wrap a receiver and the token that stops its producer.
    pub fn new(events: mpsc::UnboundedReceiver<FeedEvent>, cancel: CancellationToken) -> Self {
        Self { events, cancel }
    }

    /// Wait for the next event; `None` once the feed has ended or been cancelled.
    pub async fn next(&mut self) -> Option<FeedEvent> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            event = self.events.recv() => event,
        }
    }

    /// Stop the upstream observation. Idempotent.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Token that fires when this subscription is cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// A push-based source of POI child events.
pub trait Feed: Send + Sync {
    /// Human-readable description used in logs.
    fn name(&self) -> String;

    /// Start observing the collection.
    ///
    /// Implementations deliver an `Added` event for every child already
    /// present, followed by live events.
    fn subscribe(&self) -> Result<FeedSubscription, FeedError>;
}
