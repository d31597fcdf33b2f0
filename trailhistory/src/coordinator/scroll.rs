//! Detecting which card settles under the viewport centre while scrolling.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::layout::CardLayout;
use super::surfaces::{CardViewport, ViewportState};

/// Cadence of scroll polling while the strip is in motion.
pub const DEFAULT_SCROLL_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A different card now occupies the reference position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardChange {
    pub old: Option<usize>,
    pub new: usize,
}

/// Remembers which card last occupied the viewport centre.
///
/// Seeded at drag begin with the coordinator's current index.
#[derive(Debug, Clone)]
pub struct ScrollMonitor {
    layout: CardLayout,
    current: Option<usize>,
}

impl ScrollMonitor {
    pub fn new(layout: CardLayout, current: Option<usize>) -> Self {
        Self { layout, current }
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Hit-test the viewport centre.
    ///
    /// Returns a change only when a card other than the remembered one
    /// occupies the point. When no card occupies it (mid-gap) nothing is
    /// reported and the remembered card is kept.
    pub fn poll(&mut self, viewport: &ViewportState) -> Option<CardChange> {
        let hit = self
            .layout
            .item_at(viewport.reference_x(), viewport.item_count)?;
        if Some(hit) == self.current {
            return None;
        }
        let change = CardChange {
            old: self.current,
            new: hit,
        };
        self.current = Some(hit);
        Some(change)
    }
}

/// How a polling run finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Neither dragging nor decelerating any more.
    Settled,
    Cancelled,
}

/// Poll `viewport` every `period` until motion stops or `cancel` fires.
///
/// `on_change` is called for every [`CardChange`]; it typically forwards the
/// new index to the UI context, which calls
/// [`CurrentPoiCoordinator::scroll_settled_on`](super::CurrentPoiCoordinator::scroll_settled_on).
/// The first poll happens one period after the call.
pub async fn run_scroll_poll<F>(
    viewport: Arc<dyn CardViewport>,
    mut monitor: ScrollMonitor,
    period: Duration,
    cancel: CancellationToken,
    mut on_change: F,
) -> PollOutcome
where
    F: FnMut(CardChange) + Send,
{
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    debug!(period_ms = period.as_millis() as u64, "Scroll polling started");

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Scroll polling cancelled");
                return PollOutcome::Cancelled;
            }
            _ = ticker.tick() => {}
        }

        let state = viewport.state();
        if let Some(change) = monitor.poll(&state) {
            trace!(old = ?change.old, new = change.new, "Card under centre changed");
            on_change(change);
        }

        if !state.in_motion() {
            debug!("Scroll polling stopped - strip at rest");
            return PollOutcome::Settled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn layout() -> CardLayout {
        CardLayout::new(100.0, 10.0, 0.0)
    }

    fn state(offset: f64, moving: bool) -> ViewportState {
        ViewportState {
            content_offset: offset,
            width: 100.0,
            item_count: 4,
            dragging: moving,
            decelerating: false,
        }
    }

    #[test]
    fn test_poll_reports_only_changes() {
        let mut monitor = ScrollMonitor::new(layout(), Some(0));
        // Centre at 50: still card 0.
        assert_eq!(monitor.poll(&state(0.0, true)), None);
        // Centre at 160: card 1.
        assert_eq!(
            monitor.poll(&state(110.0, true)),
            Some(CardChange { old: Some(0), new: 1 })
        );
        assert_eq!(monitor.poll(&state(110.0, true)), None);
        assert_eq!(monitor.current(), Some(1));
    }

    #[test]
    fn test_poll_in_gap_keeps_previous() {
        let mut monitor = ScrollMonitor::new(layout(), Some(0));
        // Centre at 105 falls between card 0 and card 1.
        assert_eq!(monitor.poll(&state(55.0, true)), None);
        assert_eq!(monitor.current(), Some(0));
    }

    #[test]
    fn test_poll_without_seed_reports_first_hit() {
        let mut monitor = ScrollMonitor::new(layout(), None);
        assert_eq!(
            monitor.poll(&state(0.0, true)),
            Some(CardChange { old: None, new: 0 })
        );
    }

    struct ScriptedViewport {
        states: Mutex<Vec<ViewportState>>,
    }

    impl CardViewport for ScriptedViewport {
        fn state(&self) -> ViewportState {
            let mut states = self.states.lock();
            if states.len() > 1 {
                states.remove(0)
            } else {
                states[0]
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_scroll_poll_stops_at_rest() {
        let viewport = Arc::new(ScriptedViewport {
            states: Mutex::new(vec![
                state(0.0, true),
                state(110.0, true),
                state(220.0, false),
            ]),
        });
        let changes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&changes);

        let outcome = run_scroll_poll(
            viewport,
            ScrollMonitor::new(layout(), Some(0)),
            DEFAULT_SCROLL_POLL_INTERVAL,
            CancellationToken::new(),
            move |change| sink.lock().push(change.new),
        )
        .await;

        assert_eq!(outcome, PollOutcome::Settled);
        assert_eq!(*changes.lock(), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_scroll_poll_cancelled() {
        let viewport = Arc::new(ScriptedViewport {
            states: Mutex::new(vec![state(0.0, true)]),
        });
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_scroll_poll(
            viewport,
            ScrollMonitor::new(layout(), Some(0)),
            DEFAULT_SCROLL_POLL_INTERVAL,
            cancel.clone(),
            |_| {},
        ));

        tokio::time::sleep(Duration::from_secs(2)).await;
        cancel.cancel();
        assert_eq!(task.await.unwrap(), PollOutcome::Cancelled);
    }
}
