//! Bundled JSON snapshot feed.
//!
//! Reads a document shaped like an export of the remote store:
//!
//! ```json
//! { "pointOfInterest": { "<key>": { "uid": "...", "name": "...", ... } } }
//! ```
//!
//! Each child is delivered once as `added`; the subscription then ends.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::types::{Feed, FeedError, FeedEvent, FeedEventKind, FeedSubscription};

/// Name of the collection inside a snapshot document.
pub const COLLECTION_KEY: &str = "pointOfInterest";

/// Feed backed by a JSON snapshot on disk.
#[derive(Debug, Clone)]
pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and split the snapshot into `added` events.
    pub fn load(&self) -> Result<Vec<FeedEvent>, FeedError> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| FeedError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_snapshot(&text)
    }
}

/// Split a snapshot document into `added` events, one per child.
pub(crate) fn parse_snapshot(text: &str) -> Result<Vec<FeedEvent>, FeedError> {
    let document: Value =
        serde_json::from_str(text).map_err(|e| FeedError::Parse(e.to_string()))?;

    let children = document
        .get(COLLECTION_KEY)
        .ok_or_else(|| FeedError::Format(format!("missing '{}' collection", COLLECTION_KEY)))?
        .as_object()
        .ok_or_else(|| FeedError::Format(format!("'{}' is not an object", COLLECTION_KEY)))?;

    Ok(children
        .iter()
        .map(|(key, value)| FeedEvent::new(FeedEventKind::Added, key, value.clone()))
        .collect())
}

impl Feed for FileFeed {
    fn name(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn subscribe(&self) -> Result<FeedSubscription, FeedError> {
        let events = self.load()?;
        info!(path = %self.path.display(), children = events.len(), "Loaded bundled POI snapshot");

        let (tx, rx) = mpsc::unbounded_channel();
        for event in events {
            // The receiver is alive: it is returned below.
            let _ = tx.send(event);
        }

        Ok(FeedSubscription::new(rx, CancellationToken::new()))
    }
}
