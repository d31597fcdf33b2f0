//! Events published by the directory and the hooks it drives.

use std::fmt;
use std::sync::Arc;

use crate::poi::PointOfInterest;

/// What happened to a POI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoiEventKind {
    /// First publication of this id (its image is ready).
    Added,
    /// A newer record replaced the published one.
    Updated,
    /// The POI left the directory.
    Removed,
}

impl fmt::Display for PoiEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PoiEventKind::Added => "added",
            PoiEventKind::Updated => "updated",
            PoiEventKind::Removed => "removed",
        };
        f.write_str(name)
    }
}

/// A directory notification.
///
/// For `Removed` the POI is the last published version.
#[derive(Debug, Clone)]
pub struct PoiEvent {
    pub kind: PoiEventKind,
    pub poi: Arc<PointOfInterest>,
}

impl PoiEvent {
    pub fn new(kind: PoiEventKind, poi: Arc<PointOfInterest>) -> Self {
        Self { kind, poi }
    }
}

/// Callback receiving directory notifications.
pub type PoiListener = Arc<dyn Fn(PoiEvent) + Send + Sync>;

/// Synchronous observer of directory membership.
///
/// Hooks run inside the directory's critical section, in publication order,
/// so they must be quick and must not call back into the directory.
pub trait PoiLifecycleHook: Send + Sync {
    /// A POI was added or replaced.
    fn on_published(&self, poi: &Arc<PointOfInterest>);

    /// The POI with this id left the directory.
    fn on_removed(&self, id: &str);
}
