use std::collections::BTreeSet;

use crate::dom::{ElementId, IntersectionEntry};

/// Tracks which elements a behaviour watches for viewport intersection.
///
/// The page delivers every intersection batch to every observer; each
/// observer only reacts to its own targets.
#[derive(Debug, Clone, Default)]
pub struct IntersectionObserver {
    observed: BTreeSet<ElementId>,
}

impl IntersectionObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, target: ElementId) {
        self.observed.insert(target);
    }

    pub fn unobserve(&mut self, target: ElementId) {
        self.observed.remove(&target);
    }

    pub fn is_observing(&self, target: ElementId) -> bool {
        self.observed.contains(&target)
    }

    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// Observed targets in `entries` that are now intersecting.
    pub fn intersecting(&self, entries: &[IntersectionEntry]) -> Vec<ElementId> {
        entries
            .iter()
            .filter(|entry| entry.is_intersecting() && self.is_observing(entry.target))
            .map(|entry| entry.target)
            .collect()
    }
}
