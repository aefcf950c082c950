//! Shared visibility store for the RSCS explainer.
//!
//! The explainer can be opened from several independent places: the table
//! header info button, the "About RSCS" navigation link, and the info button
//! on the average-score metric card. All of them must drive a single
//! surface, so the dashboard root creates one [`ExplainerStore`] with
//! [`ExplainerStore::provide`] and hands clones of it to each trigger.
//! Clones share state.
//!
//! Closing returns input focus to whichever control opened the explainer.
//! The focus move is *deferred*: [`ExplainerStore::close`] only records the
//! request, and [`ExplainerStore::after_render`] performs it once the
//! current render pass has committed, so the target control is guaranteed
//! to be on screen.
//!
//! A consumer that was not handed a store calls
//! [`ExplainerStore::use_or_isolated`] with `None` and receives a private
//! instance. That instance toggles visibility but does no focus
//! bookkeeping and is never coordinated with any other consumer.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Heading of the explainer surface.
pub const EXPLAINER_TITLE: &str = "Understanding the RSCS Metric";

/// An interactive control that can receive input focus.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControlId(String);

impl ControlId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The places in the dashboard that can open the explainer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Info button in the "RSCS per 1K" column header.
    TableHeader,
    /// "About RSCS" link in the top navigation.
    NavLink,
    /// Info button on the "Avg. RSCS Score" metric card.
    MetricCard,
}

impl Trigger {
    pub fn control(&self) -> ControlId {
        ControlId::new(match self {
            Trigger::TableHeader => "rscs-header-info",
            Trigger::NavLink => "about-rscs-trigger",
            Trigger::MetricCard => "metric-card-info",
        })
    }
}

impl std::str::FromStr for Trigger {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "header" => Ok(Trigger::TableHeader),
            "nav" => Ok(Trigger::NavLink),
            "card" => Ok(Trigger::MetricCard),
            other => Err(format!(
                "unknown trigger: '{}'. Use header, nav, or card.",
                other
            )),
        }
    }
}

/// Where input focus lives. Implemented by whatever hosts the controls.
pub trait FocusHost {
    /// The control that currently holds focus, if any.
    fn active_control(&self) -> Option<ControlId>;
    /// Move focus to `control`.
    fn focus(&mut self, control: &ControlId);
}

/// Keys the explainer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

#[derive(Debug)]
struct ExplainerState {
    visible: bool,
    last_trigger: Option<ControlId>,
    pending_focus: Option<ControlId>,
    tracks_focus: bool,
}

/// Handle to an explainer visibility store. Cloning shares the store.
#[derive(Debug, Clone)]
pub struct ExplainerStore {
    inner: Rc<RefCell<ExplainerState>>,
}

impl ExplainerStore {
    fn with_focus_tracking(tracks_focus: bool) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ExplainerState {
                visible: false,
                last_trigger: None,
                pending_focus: None,
                tracks_focus,
            })),
        }
    }

    /// Create the shared store owned by a dashboard root.
    pub fn provide() -> Self {
        Self::with_focus_tracking(true)
    }

    /// The provided store if there is one, otherwise a private fallback.
    pub fn use_or_isolated(provided: Option<&ExplainerStore>) -> Self {
        match provided {
            Some(store) => store.clone(),
            None => Self::with_focus_tracking(false),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.inner.borrow().visible
    }

    /// Whether `other` is a handle to the same store.
    pub fn is_shared_with(&self, other: &ExplainerStore) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// The control focus will return to on close.
    pub fn last_trigger(&self) -> Option<ControlId> {
        self.inner.borrow().last_trigger.clone()
    }

    /// Show the explainer, remembering `trigger` (or, when `None`, whatever
    /// control currently holds focus in `host`).
    pub fn open(&self, trigger: Option<&ControlId>, host: &dyn FocusHost) {
        let mut state = self.inner.borrow_mut();
        if state.tracks_focus {
            state.last_trigger = trigger.cloned().or_else(|| host.active_control());
            state.pending_focus = None;
        }
        state.visible = true;
        tracing::debug!(trigger = ?state.last_trigger, "explainer opened");
    }

    /// Hide the explainer and schedule focus to return to the opener.
    pub fn close(&self) {
        let mut state = self.inner.borrow_mut();
        state.visible = false;
        if state.tracks_focus {
            state.pending_focus = state.last_trigger.clone();
        }
        tracing::debug!("explainer closed");
    }

    pub fn toggle(&self, trigger: Option<&ControlId>, host: &dyn FocusHost) {
        if self.is_visible() {
            self.close();
        } else {
            self.open(trigger, host);
        }
    }

    /// Route a key press. Escape closes an open explainer; returns `true`
    /// if the key was consumed.
    pub fn handle_key(&self, key: Key) -> bool {
        if key == Key::Escape && self.is_visible() {
            self.close();
            true
        } else {
            false
        }
    }

    /// Run deferred work once a render pass has committed: move focus back
    /// to the opener if a close is pending. Returns the focused control.
    pub fn after_render(&self, host: &mut dyn FocusHost) -> Option<ControlId> {
        let target = self.inner.borrow_mut().pending_focus.take()?;
        host.focus(&target);
        Some(target)
    }
}
