//! Current-POI coordination between the map and the card strip.
//!
//! [`CurrentPoiCoordinator`] owns the sorted collection and the
//! [`Selection`]. Either surface can change the current POI: a tap on a map
//! annotation, or a card settling under the strip's centre while the user
//! scrolls. Scroll detection is a periodic poll ([`run_scroll_poll`]) that
//! only runs while the strip is moving.
//!
//! # Example
//!
//! ```ignore
//! let mut coordinator = CurrentPoiCoordinator::new(map, cards);
//! coordinator.on_selection_change(|change| println!("{:?} -> {:?}", change.old, change.new));
//!
//! // UI loop: drain directory events, then user input.
//! coordinator.apply_batch(events.iter());
//! coordinator.select_annotation("latta-place");
//! ```

mod current;
mod layout;
mod scroll;
mod selection;
mod surfaces;

pub use current::{CurrentPoiCoordinator, SelectionObserver};
pub use layout::{CardLayout, DEFAULT_CARD_SPACING, DEFAULT_CARD_WIDTH};
pub use scroll::{
    run_scroll_poll, CardChange, PollOutcome, ScrollMonitor, DEFAULT_SCROLL_POLL_INTERVAL,
};
pub use selection::{Selection, SelectionChange, SelectionOrigin};
pub use surfaces::{CardSurface, CardViewport, MapSurface, ViewportState};
