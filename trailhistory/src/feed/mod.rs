//! Remote POI feed abstraction.
//!
//! A feed is a push-based source of child events on the `pointOfInterest`
//! collection: `added` for every existing and new child, `changed` when a
//! child's record is edited and `removed` when it is deleted. The directory
//! treats the feed as opaque; reconnection and retries are the feed's own
//! business.
//!
//! # Implementations
//!
//! - [`MemoryFeed`] - in-process collection, for embedding and tests
//! - [`FileFeed`] - bundled JSON snapshot, emits `added` for each child
//! - [`WebSocketFeed`] - JSON text frames from a live backend

mod file;
mod memory;
mod types;
mod websocket;

pub use file::{FileFeed, COLLECTION_KEY};
pub use memory::MemoryFeed;
pub use types::{Feed, FeedError, FeedEvent, FeedEventKind, FeedSubscription};
pub use websocket::{parse_wire_message, WebSocketFeed};
