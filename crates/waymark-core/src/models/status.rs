//! Status, lifecycle and action enumerations for a tour.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Overall status of a tour.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum TourStatus {
    /// No steps loaded yet
    #[default]
    Idle,

    /// Steps are loaded and the tour can start
    Ready,

    /// A step is being presented
    Running,

    /// The tour was stopped and can be resumed
    Paused,

    /// The last step was left behind
    Finished,

    /// The user skipped the rest of the tour
    Skipped,

    /// The tour cannot continue
    Error,
}

impl FromStr for TourStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(TourStatus::Idle),
            "ready" => Ok(TourStatus::Ready),
            "running" => Ok(TourStatus::Running),
            "paused" => Ok(TourStatus::Paused),
            "finished" => Ok(TourStatus::Finished),
            "skipped" => Ok(TourStatus::Skipped),
            "error" => Ok(TourStatus::Error),
            _ => Err(format!("Invalid tour status: {s}")),
        }
    }
}

impl TourStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TourStatus::Idle => "idle",
            TourStatus::Ready => "ready",
            TourStatus::Running => "running",
            TourStatus::Paused => "paused",
            TourStatus::Finished => "finished",
            TourStatus::Skipped => "skipped",
            TourStatus::Error => "error",
        }
    }

    /// Terminal statuses reject further navigation and externally driven
    /// index changes.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TourStatus::Finished | TourStatus::Skipped)
    }
}

/// Sub-state of the step currently presented.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    /// Step selected, nothing shown yet
    #[default]
    Init,

    /// The minimal indicator is shown
    Beacon,

    /// The full tooltip is shown
    Tooltip,

    /// The step has nothing left to wait on
    Ready,
}

impl FromStr for Lifecycle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "init" => Ok(Lifecycle::Init),
            "beacon" => Ok(Lifecycle::Beacon),
            "tooltip" => Ok(Lifecycle::Tooltip),
            "ready" => Ok(Lifecycle::Ready),
            _ => Err(format!("Invalid lifecycle: {s}")),
        }
    }
}

impl Lifecycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lifecycle::Init => "init",
            Lifecycle::Beacon => "beacon",
            Lifecycle::Tooltip => "tooltip",
            Lifecycle::Ready => "ready",
        }
    }

    /// Whether something is visible on screen for the current step.
    ///
    /// ```rust
    /// use waymark_core::models::Lifecycle;
    ///
    /// assert!(Lifecycle::Beacon.is_presenting());
    /// assert!(Lifecycle::Tooltip.is_presenting());
    /// assert!(!Lifecycle::Init.is_presenting());
    /// ```
    pub fn is_presenting(&self) -> bool {
        matches!(self, Lifecycle::Beacon | Lifecycle::Tooltip)
    }
}

/// The command that produced the current state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Store construction
    #[default]
    Init,
    Start,
    Stop,
    Next,
    Prev,
    Go,
    Close,
    Skip,
    Reset,
    Update,
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "init" => Ok(Action::Init),
            "start" => Ok(Action::Start),
            "stop" => Ok(Action::Stop),
            "next" => Ok(Action::Next),
            "prev" => Ok(Action::Prev),
            "go" => Ok(Action::Go),
            "close" => Ok(Action::Close),
            "skip" => Ok(Action::Skip),
            "reset" => Ok(Action::Reset),
            "update" => Ok(Action::Update),
            _ => Err(format!("Invalid action: {s}")),
        }
    }
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Init => "init",
            Action::Start => "start",
            Action::Stop => "stop",
            Action::Next => "next",
            Action::Prev => "prev",
            Action::Go => "go",
            Action::Close => "close",
            Action::Skip => "skip",
            Action::Reset => "reset",
            Action::Update => "update",
        }
    }
}
