//! The POI directory: validated, image-ready POIs with listener fan-out.
//!
//! The directory consumes a [`Feed`](crate::feed::Feed), resolves each
//! record's image, and publishes [`PoiEvent`]s to registered listeners on
//! the [`Dispatcher`] each listener chose.

mod dispatch;
mod event;
mod poi_directory;
mod token;

pub use dispatch::{
    dispatch_queue, DispatchQueue, DispatchTask, Dispatcher, QueueDispatcher, SerialDispatcher,
};
pub use event::{PoiEvent, PoiEventKind, PoiLifecycleHook, PoiListener};
pub use poi_directory::PoiDirectory;
pub use token::SubscriptionToken;
