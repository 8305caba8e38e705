//! Event envelope delivered to the application callback.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Action, Lifecycle, MergedStep, TourState, TourStatus};

/// Closed set of tour-level event types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventType {
    /// The tour went from ready to running
    #[serde(rename = "tour:start")]
    TourStart,

    /// Any other status change
    #[serde(rename = "tour:status")]
    TourStatus,

    /// The tour finished or was skipped
    #[serde(rename = "tour:end")]
    TourEnd,
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tour:start" => Ok(EventType::TourStart),
            "tour:status" => Ok(EventType::TourStatus),
            "tour:end" => Ok(EventType::TourEnd),
            _ => Err(format!("Invalid event type: {s}")),
        }
    }
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::TourStart => "tour:start",
            EventType::TourStatus => "tour:status",
            EventType::TourEnd => "tour:end",
        }
    }
}

/// Payload of one callback invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TourEvent {
    #[serde(rename = "type")]
    pub kind: EventType,
    pub status: TourStatus,
    pub lifecycle: Lifecycle,
    pub action: Action,
    pub index: usize,
    pub size: usize,

    /// The step the event is about; for `tour:end` this is the last step
    /// that was visited rather than the out-of-range current index
    pub step: Option<MergedStep>,
}

impl TourEvent {
    pub fn new(kind: EventType, state: &TourState, step: Option<MergedStep>) -> Self {
        Self {
            kind,
            status: state.status,
            lifecycle: state.lifecycle,
            action: state.action,
            index: state.index,
            size: state.size,
            step,
        }
    }
}
