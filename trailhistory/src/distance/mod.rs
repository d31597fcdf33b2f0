//! Distance from the user to each POI.
//!
//! The [`DistanceTracker`] is a registry keyed by POI id. The directory keeps
//! it in step through [`PoiLifecycleHook`](crate::directory::PoiLifecycleHook);
//! the host feeds it location fixes and permission changes and acts on the
//! returned [`LocationAction`].

mod authorization;
mod tracker;

pub use authorization::{AuthorizationStatus, LocationAction, LocationAdvisory};
pub use tracker::{DistanceTracker, YARDS_PER_METER};
