//! Location permission states and what the tracker asks the host to do.

use std::fmt;

/// Location permission as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthorizationStatus {
    #[default]
    NotDetermined,
    Authorized,
    Denied,
    Restricted,
}

impl AuthorizationStatus {
    pub fn is_authorized(&self) -> bool {
        matches!(self, AuthorizationStatus::Authorized)
    }
}

/// A one-time message for the user about location access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationAdvisory {
    pub title: &'static str,
    pub body: &'static str,
}

impl LocationAdvisory {
    /// Location services are switched off on the device.
    pub const SERVICES_NEEDED: LocationAdvisory = LocationAdvisory {
        title: "Location Services Needed",
        body: "Please enable location services so that Trail of History can show you where you are \
               on the trail and what the distances to the points of interest are.",
    };

    /// The user refused, or policy forbids, location access.
    pub const ACCESS_NOT_AUTHORIZED: LocationAdvisory = LocationAdvisory {
        title: "Location Access Not Authorized",
        body: "Trail of History will not be able show you the distance to the points of interest. \
               You can change the authorization in Settings",
    };
}

impl fmt::Display for LocationAdvisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.body)
    }
}

/// What the host should do after a permission or availability change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationAction {
    None,
    RequestPermission,
    StartUpdates,
    ShowAdvisory(LocationAdvisory),
}
