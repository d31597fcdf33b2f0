//! Distance-to-user registry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use super::authorization::{AuthorizationStatus, LocationAction, LocationAdvisory};
use crate::coord::Coordinate;
use crate::directory::PoiLifecycleHook;
use crate::poi::{format_distance, PointOfInterest};

/// Metres to yards.
pub const YARDS_PER_METER: f64 = 1.0936;

struct Tracked {
    coordinate: Coordinate,
    /// Yards from the last fix. `None` until a fix arrives while authorized.
    distance: Option<f64>,
}

#[derive(Default)]
struct TrackerState {
    tracked: HashMap<String, Tracked>,
    status: AuthorizationStatus,
    last_fix: Option<Coordinate>,
    denial_advised: bool,
    services_advised: bool,
}

impl TrackerState {
    fn clear_distances(&mut self) {
        self.last_fix = None;
        for entry in self.tracked.values_mut() {
            entry.distance = None;
        }
    }
}

/// Keeps the user's distance to every tracked POI current.
///
/// POIs are tracked by id, so removing a POI from the directory (see the
/// [`PoiLifecycleHook`] impl) is all it takes to stop updating it. Distances
/// exist only while location access is authorized.
#[derive(Default)]
pub struct DistanceTracker {
    state: Mutex<TrackerState>,
}

impl DistanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a POI, or refresh its coordinate.
    ///
    /// With a fix already known the distance is computed immediately.
    pub fn track(&self, poi: &PointOfInterest) {
        let mut state = self.state.lock();
        let distance = match (state.status.is_authorized(), state.last_fix) {
            (true, Some(fix)) => Some(yards_between(&fix, &poi.coordinate())),
            _ => None,
        };
        state.tracked.insert(
            poi.id().to_string(),
            Tracked {
                coordinate: poi.coordinate(),
                distance,
            },
        );
    }

    /// Stop tracking. Returns whether the id was tracked.
    pub fn untrack(&self, id: &str) -> bool {
        self.state.lock().tracked.remove(id).is_some()
    }

    /// Recompute every distance from a new fix.
    ///
    /// Ignored unless location access is authorized. Returns the number of
    /// POIs updated.
    pub fn update_location(&self, fix: Coordinate) -> usize {
        let mut state = self.state.lock();
        if !state.status.is_authorized() {
            debug!(status = ?state.status, "Location fix ignored - not authorized");
            return 0;
        }

        state.last_fix = Some(fix);
        for entry in state.tracked.values_mut() {
            entry.distance = Some(yards_between(&fix, &entry.coordinate));
        }

        let updated = state.tracked.len();
        debug!(fix = %fix, updated, "Distances updated");
        updated
    }

    /// React to a permission change.
    ///
    /// Denial clears every distance and yields the not-authorized advisory
    /// the first time only.
    pub fn authorization_changed(&self, status: AuthorizationStatus) -> LocationAction {
        let mut state = self.state.lock();
        state.status = status;

        match status {
            AuthorizationStatus::NotDetermined => LocationAction::RequestPermission,
            AuthorizationStatus::Authorized => {
                info!("Location access authorized");
                LocationAction::StartUpdates
            }
            AuthorizationStatus::Denied | AuthorizationStatus::Restricted => {
                state.clear_distances();
                if state.denial_advised {
                    LocationAction::None
                } else {
                    state.denial_advised = true;
                    info!(status = ?status, "Location access not authorized");
                    LocationAction::ShowAdvisory(LocationAdvisory::ACCESS_NOT_AUTHORIZED)
                }
            }
        }
    }

    /// Location services are off device-wide. Yields an advisory once.
    pub fn services_unavailable(&self) -> LocationAction {
        let mut state = self.state.lock();
        state.clear_distances();
        if state.services_advised {
            return LocationAction::None;
        }
        state.services_advised = true;
        info!("Location services unavailable");
        LocationAction::ShowAdvisory(LocationAdvisory::SERVICES_NEEDED)
    }

    /// Yards to the POI, if known.
    pub fn distance_to(&self, id: &str) -> Option<f64> {
        self.state.lock().tracked.get(id).and_then(|e| e.distance)
    }

    /// `"<N> yds"` or `"<unknown>"`.
    pub fn format_distance(&self, id: &str) -> String {
        format_distance(self.distance_to(id))
    }

    pub fn status(&self) -> AuthorizationStatus {
        self.state.lock().status
    }

    pub fn last_fix(&self) -> Option<Coordinate> {
        self.state.lock().last_fix
    }

    pub fn tracked_count(&self) -> usize {
        self.state.lock().tracked.len()
    }

    pub fn is_tracked(&self, id: &str) -> bool {
        self.state.lock().tracked.contains_key(id)
    }
}

impl PoiLifecycleHook for DistanceTracker {
    fn on_published(&self, poi: &Arc<PointOfInterest>) {
        self.track(poi);
    }

    fn on_removed(&self, id: &str) {
        self.untrack(id);
    }
}

fn yards_between(a: &Coordinate, b: &Coordinate) -> f64 {
    a.distance_meters(b) * YARDS_PER_METER
}
