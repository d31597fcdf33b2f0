//! The current-POI state machine.

use std::sync::Arc;

use tracing::{debug, info};

use super::layout::CardLayout;
use super::scroll::ScrollMonitor;
use super::selection::{Selection, SelectionChange, SelectionOrigin};
use super::surfaces::{CardSurface, MapSurface};
use crate::directory::{PoiEvent, PoiEventKind};
use crate::poi::PointOfInterest;

/// Observer of selection changes.
pub type SelectionObserver = Box<dyn FnMut(&SelectionChange) + Send>;

/// Keeps one current POI consistent across the map and the card strip.
///
/// The coordinator owns the longitude-sorted collection built from
/// directory events. It lives on the presentation context: feed it events
/// from a listener registered with a [`QueueDispatcher`](crate::directory::QueueDispatcher)
/// and drive it with taps and scroll results from the same context.
///
/// The first time the collection becomes non-empty the westmost POI becomes
/// current. Until the user picks a POI (tap or scroll settle) that initial
/// selection stays on index 0, so a POI inserted further west takes it over.
/// After the current POI is removed the coordinator stays without a current
/// POI until the user picks one.
pub struct CurrentPoiCoordinator<M: MapSurface, C: CardSurface> {
    map: M,
    cards: C,
    layout: CardLayout,
    pois: Vec<Arc<PointOfInterest>>,
    selection: Selection,
    initialized: bool,
    /// The selection is the automatic one and tracks the westmost POI.
    anchored: bool,
    observers: Vec<SelectionObserver>,
}

impl<M: MapSurface, C: CardSurface> CurrentPoiCoordinator<M, C> {
    pub fn new(map: M, cards: C) -> Self {
        Self::with_layout(map, cards, CardLayout::default())
    }

    pub fn with_layout(map: M, cards: C, layout: CardLayout) -> Self {
        Self {
            map,
            cards,
            layout,
            pois: Vec::new(),
            selection: Selection::NoCurrent,
            initialized: false,
            anchored: false,
            observers: Vec::new(),
        }
    }

    /// Register an observer for every selection change.
    pub fn on_selection_change<F>(&mut self, observer: F)
    where
        F: FnMut(&SelectionChange) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Apply one directory event.
    pub fn apply(&mut self, event: &PoiEvent) {
        self.apply_batch(std::iter::once(event));
    }

    /// Apply several directory events, then initialize the selection if the
    /// collection became non-empty.
    ///
    /// The card strip is reloaded once per batch.
    pub fn apply_batch<'a, I>(&mut self, events: I)
    where
        I: IntoIterator<Item = &'a PoiEvent>,
    {
        let mut changed = false;
        for event in events {
            changed |= match event.kind {
                PoiEventKind::Added | PoiEventKind::Updated => self.upsert(&event.poi),
                PoiEventKind::Removed => self.remove(event.poi.id()),
            };
        }

        if changed {
            self.cards.reload(&self.pois, self.selection.index());
        }

        if !self.initialized && !self.pois.is_empty() {
            self.initialized = true;
            self.anchored = true;
            self.transition(0, SelectionOrigin::Initial, false);
        }
    }

    /// The user tapped the annotation of the POI with this id.
    ///
    /// Makes it current and scrolls the card strip to it. Returns `false` if
    /// the POI is unknown or already current.
    pub fn select_annotation(&mut self, id: &str) -> bool {
        let Some(index) = self.index_of(id) else {
            debug!(poi = %id, "Tap on unknown annotation ignored");
            return false;
        };
        if self.selection.is_current(index) {
            return false;
        }
        self.anchored = false;
        self.transition(index, SelectionOrigin::AnnotationTap, true);
        true
    }

    /// A different card settled under the viewport centre.
    ///
    /// Same dual update as a tap but without scrolling the strip, which the
    /// user is already doing. Returns `false` for an out-of-range or current
    /// index.
    pub fn scroll_settled_on(&mut self, index: usize) -> bool {
        if index >= self.pois.len() || self.selection.is_current(index) {
            return false;
        }
        self.anchored = false;
        self.transition(index, SelectionOrigin::CardScroll, false);
        true
    }

    /// A scroll monitor seeded with the current index, for drag begin.
    pub fn begin_scroll_tracking(&self) -> ScrollMonitor {
        ScrollMonitor::new(self.layout, self.selection.index())
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn current(&self) -> Option<&Arc<PointOfInterest>> {
        self.selection.index().and_then(|i| self.pois.get(i))
    }

    /// The sorted collection.
    pub fn pois(&self) -> &[Arc<PointOfInterest>] {
        &self.pois
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.pois.iter().position(|p| p.id() == id)
    }

    pub fn layout(&self) -> &CardLayout {
        &self.layout
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn cards(&self) -> &C {
        &self.cards
    }

    /// Insert or replace a POI keeping the collection sorted. Returns `true`
    /// when the collection changed.
    fn upsert(&mut self, poi: &Arc<PointOfInterest>) -> bool {
        let current_id = self.current().map(|p| p.id().to_string());

        if let Some(existing) = self.index_of(poi.id()) {
            self.pois.remove(existing);
        }

        // After any equal longitudes, so ties keep arrival order.
        let position = self
            .pois
            .partition_point(|p| p.longitude() <= poi.longitude());
        self.pois.insert(position, Arc::clone(poi));

        let is_current = current_id.as_deref() == Some(poi.id());
        self.map.show(poi, is_current);
        if self.anchored {
            self.keep_westmost(current_id.as_deref());
        } else {
            self.follow_current(current_id.as_deref());
        }
        true
    }

    fn remove(&mut self, id: &str) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let current_id = self.current().map(|p| p.id().to_string());

        self.pois.remove(index);
        self.map.hide(id);

        if current_id.as_deref() == Some(id) {
            let old = self.selection.index();
            self.selection = Selection::NoCurrent;
            self.anchored = false;
            info!(poi = %id, "Current POI removed");
            self.notify(SelectionChange {
                old,
                new: None,
                origin: SelectionOrigin::Removal,
            });
        } else {
            self.follow_current(current_id.as_deref());
        }
        true
    }

    /// Re-point the selection at the current POI after the collection moved.
    fn follow_current(&mut self, current_id: Option<&str>) {
        let Some(id) = current_id else {
            return;
        };
        let old = self.selection.index();
        let new = self.index_of(id);
        if old != new {
            self.selection = new.map_or(Selection::NoCurrent, Selection::CurrentAt);
            self.notify(SelectionChange {
                old,
                new,
                origin: SelectionOrigin::Reindex,
            });
        }
    }

    /// Keep the automatic selection on index 0 after the collection moved.
    fn keep_westmost(&mut self, current_id: Option<&str>) {
        let Some(id) = current_id else {
            return;
        };
        let westmost_is_current = self.pois.first().is_some_and(|p| p.id() == id);
        if westmost_is_current {
            self.follow_current(Some(id));
            return;
        }

        // Point at the previous POI's new index so the transition un-marks it.
        self.selection = self
            .index_of(id)
            .map_or(Selection::NoCurrent, Selection::CurrentAt);
        self.transition(0, SelectionOrigin::Initial, false);
    }

    fn transition(&mut self, index: usize, origin: SelectionOrigin, scroll_cards: bool) {
        let old = self.selection.index();

        if let Some(previous) = old.and_then(|i| self.pois.get(i)) {
            self.map.set_highlighted(previous, false);
        }
        if let Some(i) = old {
            self.cards.set_current(i, false);
        }

        let poi = Arc::clone(&self.pois[index]);
        self.map.set_highlighted(&poi, true);
        self.cards.set_current(index, true);
        self.map.center_on(poi.coordinate());
        if scroll_cards {
            self.cards.scroll_to(index, true);
        }

        self.selection = Selection::CurrentAt(index);
        debug!(old = ?old, new = index, origin = %origin, poi = %poi.id(), "Current POI changed");
        self.notify(SelectionChange {
            old,
            new: Some(index),
            origin,
        });
    }

    fn notify(&mut self, change: SelectionChange) {
        for observer in self.observers.iter_mut() {
            observer(&change);
        }
    }
}
