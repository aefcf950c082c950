//! Which parent rows are expanded.
//!
//! Keyed by [`EntityId`] and kept across refetches. An id missing from the
//! current collection has no visible effect and shows expanded again if it
//! comes back.

use std::collections::HashSet;

use crate::models::EntityId;

#[derive(Debug, Clone, Default)]
pub struct ExpandState {
    expanded: HashSet<EntityId>,
}

impl ExpandState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`. Returns `true` if it is now expanded.
    pub fn toggle(&mut self, id: EntityId) -> bool {
        if self.expanded.remove(&id) {
            false
        } else {
            self.expanded.insert(id);
            true
        }
    }

    pub fn expand(&mut self, id: EntityId) {
        self.expanded.insert(id);
    }

    pub fn is_expanded(&self, id: &EntityId) -> bool {
        self.expanded.contains(id)
    }

    pub fn clear(&mut self) {
        self.expanded.clear();
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}
