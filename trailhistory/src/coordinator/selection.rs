//! Selection state and change notifications.

use std::fmt;

/// Which POI, if any, is current.
///
/// The index always refers to a live member of the coordinator's sorted
/// collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    NoCurrent,
    CurrentAt(usize),
}

impl Selection {
    pub fn index(&self) -> Option<usize> {
        match self {
            Selection::NoCurrent => None,
            Selection::CurrentAt(i) => Some(*i),
        }
    }

    pub fn is_current(&self, index: usize) -> bool {
        self.index() == Some(index)
    }
}

/// What caused a selection change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOrigin {
    /// The automatic selection: the westmost POI, chosen when the collection
    /// first fills and again whenever a POI lands west of it before the user
    /// picks one.
    Initial,
    /// The user tapped a map annotation.
    AnnotationTap,
    /// A different card settled under the viewport centre.
    CardScroll,
    /// The current POI left the collection.
    Removal,
    /// The current POI kept its identity but moved to another index.
    Reindex,
}

impl fmt::Display for SelectionOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SelectionOrigin::Initial => "initial",
            SelectionOrigin::AnnotationTap => "annotation tap",
            SelectionOrigin::CardScroll => "card scroll",
            SelectionOrigin::Removal => "removal",
            SelectionOrigin::Reindex => "reindex",
        };
        f.write_str(name)
    }
}

/// Current changed (old index, new index).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChange {
    pub old: Option<usize>,
    pub new: Option<usize>,
    pub origin: SelectionOrigin,
}
