//! Tour state, partial updates and per-field change detection.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Action, Lifecycle, TourStatus};

/// Snapshot of a tour's progress.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TourState {
    /// Position in the step sequence
    pub index: usize,

    pub status: TourStatus,

    pub lifecycle: Lifecycle,

    /// Command that produced this state
    pub action: Action,

    /// A scroll issued for the current step has not settled yet
    pub scrolling: bool,

    /// Number of steps known to the store
    pub size: usize,

    /// The index is owned by the application rather than the store
    pub controlled: bool,
}

impl TourState {
    /// Whether `index` points at an existing step.
    pub fn has_step(&self) -> bool {
        self.index < self.size
    }

    pub fn is_last_step(&self) -> bool {
        self.size > 0 && self.index + 1 == self.size
    }
}

/// A partial state merged into the store by [`crate::Store::update`].
///
/// Absent fields leave the current value untouched.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StatePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle: Option<Lifecycle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TourStatus>,
}

impl StatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.lifecycle = Some(lifecycle);
        self
    }

    pub fn status(mut self, status: TourStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.action.is_none()
            && self.index.is_none()
            && self.lifecycle.is_none()
            && self.status.is_none()
    }

    /// Builds a patch from loosely shaped JSON.
    ///
    /// Unknown keys and values of the wrong shape are dropped instead of
    /// rejected, so a malformed patch degrades to a smaller (or empty) one.
    ///
    /// ```rust
    /// use serde_json::json;
    /// use waymark_core::models::{Lifecycle, StatePatch};
    ///
    /// let patch = StatePatch::from_json(&json!({
    ///     "lifecycle": "tooltip",
    ///     "index": "not a number",
    ///     "color": "red",
    /// }));
    /// assert_eq!(patch, StatePatch::new().lifecycle(Lifecycle::Tooltip));
    /// ```
    pub fn from_json(value: &Value) -> Self {
        let Some(fields) = value.as_object() else {
            return Self::default();
        };

        let field = |key: &str| fields.get(key).cloned();

        Self {
            action: field("action").and_then(|v| serde_json::from_value(v).ok()),
            index: field("index").and_then(|v| serde_json::from_value(v).ok()),
            lifecycle: field("lifecycle").and_then(|v| serde_json::from_value(v).ok()),
            status: field("status").and_then(|v| serde_json::from_value(v).ok()),
        }
    }
}

/// Field-by-field comparison between two consecutive states.
#[derive(Debug, Clone, Copy)]
pub struct StateChange<'a> {
    pub previous: &'a TourState,
    pub current: &'a TourState,
}

impl<'a> StateChange<'a> {
    pub fn new(previous: &'a TourState, current: &'a TourState) -> Self {
        Self { previous, current }
    }

    pub fn any(&self) -> bool {
        self.previous != self.current
    }

    pub fn status_changed(&self) -> bool {
        self.previous.status != self.current.status
    }

    pub fn index_changed(&self) -> bool {
        self.previous.index != self.current.index
    }

    pub fn lifecycle_changed(&self) -> bool {
        self.previous.lifecycle != self.current.lifecycle
    }

    pub fn status_changed_to(&self, status: TourStatus) -> bool {
        self.status_changed() && self.current.status == status
    }

    pub fn status_changed_from_to(&self, from: TourStatus, to: TourStatus) -> bool {
        self.previous.status == from && self.current.status == to
    }

    pub fn lifecycle_changed_to(&self, lifecycle: Lifecycle) -> bool {
        self.lifecycle_changed() && self.current.lifecycle == lifecycle
    }

    /// The lifecycle just moved into beacon or tooltip.
    pub fn entered_presentation(&self) -> bool {
        self.lifecycle_changed() && self.current.lifecycle.is_presenting()
    }
}
