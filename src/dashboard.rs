//! Page-level controller for the agency dashboard.
//!
//! [`Dashboard`] owns the flat entity collection, the filter query, the load
//! state, sort and expand state, and a handle to the shared explainer store.
//! Every mutation is a discrete, synchronous handler call; derived views
//! (hierarchy, sorted rows, summary) are recomputed from the flat collection
//! on demand and never cached.
//!
//! # Fetch sequencing
//!
//! Each fetch is issued as a [`FetchTicket`] carrying a generation number.
//! [`Dashboard::apply_fetch`] discards any response whose ticket is older
//! than the most recently issued one, so a slow response to a superseded
//! filter can never overwrite newer data.

use serde::Serialize;

use crate::client::{AgencyQuery, AgencySource};
use crate::error::FetchError;
use crate::expand::ExpandState;
use crate::explainer::{ExplainerStore, FocusHost, Trigger};
use crate::hierarchy::Hierarchy;
use crate::models::{Entity, EntityId};
use crate::sort::{SortField, SortState};
use crate::summary::CorpusSummary;

/// What the page is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    /// Transport failure; the message is shown verbatim.
    Failed(String),
}

/// A fetch in flight. Hand it back to [`Dashboard::apply_fetch`] with the
/// result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: AgencyQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind<'a> {
    Parent { has_children: bool, expanded: bool },
    Child { parent: &'a EntityId },
}

/// One materialized table row.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Row<'a> {
    pub entity: &'a Entity,
    pub kind: RowKind<'a>,
}

pub struct Dashboard {
    entities: Vec<Entity>,
    query: AgencyQuery,
    load: LoadState,
    sort: SortState,
    expand: ExpandState,
    explainer: ExplainerStore,
    issued: u64,
}

impl Dashboard {
    pub fn new(sort: SortState, explainer: ExplainerStore) -> Self {
        Self {
            entities: Vec::new(),
            query: AgencyQuery::default(),
            load: LoadState::Loading,
            sort,
            expand: ExpandState::new(),
            explainer,
            issued: 0,
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn query(&self) -> &AgencyQuery {
        &self.query
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn expand_state(&self) -> &ExpandState {
        &self.expand
    }

    pub fn explainer(&self) -> &ExplainerStore {
        &self.explainer
    }

    // ── Fetching ─────────────────────────────────────────────────────────

    /// Enter the loading state and issue a ticket for the current query.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        self.load = LoadState::Loading;
        FetchTicket {
            generation: self.issued,
            query: self.query.clone(),
        }
    }

    /// Apply a fetch result. Returns `false` if the ticket was stale and the
    /// result was dropped.
    ///
    /// Success replaces the collection wholesale. Failure records the error
    /// message and leaves the previous collection in place.
    pub fn apply_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Entity>, FetchError>,
    ) -> bool {
        if ticket.generation != self.issued {
            tracing::debug!(
                stale = ticket.generation,
                latest = self.issued,
                "dropping superseded agency response"
            );
            return false;
        }
        match result {
            Ok(entities) => {
                tracing::info!(rows = entities.len(), "agency collection loaded");
                self.entities = entities;
                self.load = LoadState::Ready;
            }
            Err(e) => {
                tracing::warn!(error = %e, "agency fetch failed");
                self.load = LoadState::Failed(e.to_string());
            }
        }
        true
    }

    /// Fetch the current query from `source` and apply the result.
    pub async fn refresh(&mut self, source: &dyn AgencySource) -> bool {
        let ticket = self.begin_fetch();
        let result = source.fetch_agencies(&ticket.query).await;
        self.apply_fetch(ticket, result)
    }

    // ── Filters ──────────────────────────────────────────────────────────

    /// Change the title filter. Returns `true` if the query changed and a
    /// refetch is due.
    pub fn set_title_filter(&mut self, title: Option<u32>) -> bool {
        let changed = self.query.title != title;
        self.query.title = title;
        changed
    }

    /// Toggle checksum inclusion. Returns `true` if a refetch is due.
    pub fn set_include_checksum(&mut self, include: bool) -> bool {
        let changed = self.query.include_checksum != include;
        self.query.include_checksum = include;
        changed
    }

    // ── Table interaction ────────────────────────────────────────────────

    /// Header click.
    pub fn set_sort_key(&mut self, field: SortField) {
        self.sort.set_sort_key(field);
    }

    /// Parent-row click. Returns `true` if the row is now expanded.
    pub fn toggle_expanded(&mut self, id: EntityId) -> bool {
        self.expand.toggle(id)
    }

    /// Expand every parent that currently has children.
    pub fn expand_all(&mut self) {
        let hierarchy = Hierarchy::build(&self.entities);
        let parents: Vec<EntityId> = hierarchy
            .top_level()
            .iter()
            .filter(|e| hierarchy.has_children(&e.id))
            .map(|e| e.id.clone())
            .collect();
        for id in parents {
            self.expand.expand(id);
        }
    }

    pub fn collapse_all(&mut self) {
        self.expand.clear();
    }

    /// Info-button or nav-link activation from one of the explainer triggers.
    pub fn activate_trigger(&self, trigger: Trigger, host: &dyn FocusHost) {
        self.explainer.toggle(Some(&trigger.control()), host);
    }

    // ── Derived views ────────────────────────────────────────────────────

    /// Sorted top-level rows, each followed by its children when expanded.
    pub fn rows(&self) -> Vec<Row<'_>> {
        let hierarchy = Hierarchy::build(&self.entities);
        let mut top: Vec<&Entity> = hierarchy.top_level().to_vec();
        self.sort.sort(&mut top);

        let mut rows = Vec::with_capacity(self.entities.len());
        for parent in top {
            let children = hierarchy.children_of(&parent.id);
            let expanded = self.expand.is_expanded(&parent.id);
            rows.push(Row {
                entity: parent,
                kind: RowKind::Parent {
                    has_children: !children.is_empty(),
                    expanded,
                },
            });
            if expanded {
                rows.extend(children.iter().map(|&child| Row {
                    entity: child,
                    kind: RowKind::Child { parent: &parent.id },
                }));
            }
        }
        rows
    }

    pub fn summary(&self) -> CorpusSummary {
        CorpusSummary::from_hierarchy(&Hierarchy::build(&self.entities))
    }
}
