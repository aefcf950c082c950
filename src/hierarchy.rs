//! Two-level parent/child grouping over a flat entity collection.
//!
//! The hierarchy is a disposable projection: it borrows the flat list,
//! is rebuilt whenever rows are materialized, and is never the source of
//! truth. Building it is O(n): one pass collects ids, one pass marks roots,
//! one pass assigns each entity to the top level or to its parent's child
//! list.
//!
//! Resolution rules:
//!
//! - A *root* is an entity whose `parent_id` is absent, names no entity in
//!   the collection, or names itself.
//! - A non-root whose parent is a root becomes that parent's child.
//! - Anything else (grandchildren, reference cycles) degrades to top-level,
//!   the same as a dangling reference. No row is ever dropped.

use std::collections::{HashMap, HashSet};

use crate::models::{Entity, EntityId};

pub struct Hierarchy<'a> {
    top_level: Vec<&'a Entity>,
    children: HashMap<&'a EntityId, Vec<&'a Entity>>,
}

impl<'a> Hierarchy<'a> {
    pub fn build(entities: &'a [Entity]) -> Self {
        let ids: HashSet<&EntityId> = entities.iter().map(|e| &e.id).collect();

        let resolves = |e: &'a Entity| -> Option<&'a EntityId> {
            e.parent_id
                .as_ref()
                .filter(|p| **p != e.id && ids.contains(p))
        };

        let roots: HashSet<&EntityId> = entities
            .iter()
            .filter(|&e| resolves(e).is_none())
            .map(|e| &e.id)
            .collect();

        let mut top_level = Vec::new();
        let mut children: HashMap<&'a EntityId, Vec<&'a Entity>> = HashMap::new();

        for entity in entities {
            match resolves(entity).filter(|p| roots.contains(p)) {
                Some(parent) => children.entry(parent).or_default().push(entity),
                None => top_level.push(entity),
            }
        }

        Self {
            top_level,
            children,
        }
    }

    /// Entities with no resolvable parent, in fetch order.
    pub fn top_level(&self) -> &[&'a Entity] {
        &self.top_level
    }

    /// Children of `id` in fetch order; empty for leaves and unknown ids.
    pub fn children_of(&self, id: &EntityId) -> &[&'a Entity] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_children(&self, id: &EntityId) -> bool {
        self.children.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.top_level.is_empty()
    }
}
