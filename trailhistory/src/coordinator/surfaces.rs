//! Presentation seams driven by the coordinator.
//!
//! A UI toolkit implements these for its map view and card strip; tests use
//! recording doubles.

use std::sync::Arc;

use crate::coord::Coordinate;
use crate::poi::PointOfInterest;

/// The map showing one annotation per POI.
pub trait MapSurface {
    /// Add or replace the annotation for `poi`.
    fn show(&mut self, poi: &Arc<PointOfInterest>, highlighted: bool);

    /// Remove the annotation for the POI with this id.
    fn hide(&mut self, id: &str);

    /// Switch an annotation between its current and non-current look.
    fn set_highlighted(&mut self, poi: &Arc<PointOfInterest>, highlighted: bool);

    /// Recentre the map, animated.
    fn center_on(&mut self, coordinate: Coordinate);
}

/// The horizontally paged list of POI cards, one per sorted index.
pub trait CardSurface {
    /// Rebuild every card from the sorted collection.
    fn reload(&mut self, pois: &[Arc<PointOfInterest>], current: Option<usize>);

    /// Switch one card between its current and non-current look.
    fn set_current(&mut self, index: usize, current: bool);

    /// Programmatically scroll so the card at `index` is centred.
    fn scroll_to(&mut self, index: usize, animated: bool);
}

/// Geometry and motion of the card strip at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportState {
    /// Horizontal scroll position of the strip's content.
    pub content_offset: f64,
    /// Visible width of the strip.
    pub width: f64,
    pub item_count: usize,
    pub dragging: bool,
    pub decelerating: bool,
}

impl ViewportState {
    /// Whether the strip is being dragged or is still coasting.
    pub fn in_motion(&self) -> bool {
        self.dragging || self.decelerating
    }

    /// Content-space x of the viewport centre.
    pub fn reference_x(&self) -> f64 {
        self.content_offset + self.width / 2.0
    }
}

/// Read access to the live card strip, polled during scrolling.
pub trait CardViewport: Send + Sync {
    fn state(&self) -> ViewportState;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Map double recording every call.
    #[derive(Debug, Default)]
    pub struct RecordingMap {
        pub shown: Vec<String>,
        pub highlighted: Option<String>,
        /// Every `set_highlighted` call in order.
        pub highlight_calls: Vec<(String, bool)>,
        pub centered: Vec<Coordinate>,
    }

    impl MapSurface for RecordingMap {
        fn show(&mut self, poi: &Arc<PointOfInterest>, highlighted: bool) {
            self.shown.retain(|id| id != poi.id());
            self.shown.push(poi.id().to_string());
            if highlighted {
                self.highlighted = Some(poi.id().to_string());
            }
        }

        fn hide(&mut self, id: &str) {
            self.shown.retain(|shown| shown != id);
            if self.highlighted.as_deref() == Some(id) {
                self.highlighted = None;
            }
        }

        fn set_highlighted(&mut self, poi: &Arc<PointOfInterest>, highlighted: bool) {
            self.highlight_calls.push((poi.id().to_string(), highlighted));
            if highlighted {
                self.highlighted = Some(poi.id().to_string());
            } else if self.highlighted.as_deref() == Some(poi.id()) {
                self.highlighted = None;
            }
        }

        fn center_on(&mut self, coordinate: Coordinate) {
            self.centered.push(coordinate);
        }
    }

    /// Card strip double recording every call.
    #[derive(Debug, Default)]
    pub struct RecordingCards {
        pub ids: Vec<String>,
        pub current: Option<usize>,
        /// Every `set_current` call in order.
        pub current_calls: Vec<(usize, bool)>,
        pub scrolled_to: Vec<usize>,
        pub reloads: usize,
    }

    impl CardSurface for RecordingCards {
        fn reload(&mut self, pois: &[Arc<PointOfInterest>], current: Option<usize>) {
            self.ids = pois.iter().map(|p| p.id().to_string()).collect();
            self.current = current;
            self.reloads += 1;
        }

        fn set_current(&mut self, index: usize, current: bool) {
            self.current_calls.push((index, current));
            if current {
                self.current = Some(index);
            } else if self.current == Some(index) {
                self.current = None;
            }
        }

        fn scroll_to(&mut self, index: usize, _animated: bool) {
            self.scrolled_to.push(index);
        }
    }
}
