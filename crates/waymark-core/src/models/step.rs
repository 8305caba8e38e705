//! Step descriptor definition and the merged view used at runtime.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where the tooltip should sit relative to its target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    Top,
    TopStart,
    TopEnd,
    #[default]
    Bottom,
    BottomStart,
    BottomEnd,
    Left,
    LeftStart,
    LeftEnd,
    Right,
    RightStart,
    RightEnd,
    /// Let the positioning library decide
    Auto,
    /// Centered on screen, without a target to wait on
    Center,
}

impl FromStr for Placement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "top" => Ok(Placement::Top),
            "top-start" => Ok(Placement::TopStart),
            "top-end" => Ok(Placement::TopEnd),
            "bottom" => Ok(Placement::Bottom),
            "bottom-start" => Ok(Placement::BottomStart),
            "bottom-end" => Ok(Placement::BottomEnd),
            "left" => Ok(Placement::Left),
            "left-start" => Ok(Placement::LeftStart),
            "left-end" => Ok(Placement::LeftEnd),
            "right" => Ok(Placement::Right),
            "right-start" => Ok(Placement::RightStart),
            "right-end" => Ok(Placement::RightEnd),
            "auto" => Ok(Placement::Auto),
            "center" => Ok(Placement::Center),
            _ => Err(format!("Invalid placement: {s}")),
        }
    }
}

impl Placement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Placement::Top => "top",
            Placement::TopStart => "top-start",
            Placement::TopEnd => "top-end",
            Placement::Bottom => "bottom",
            Placement::BottomStart => "bottom-start",
            Placement::BottomEnd => "bottom-end",
            Placement::Left => "left",
            Placement::LeftStart => "left-start",
            Placement::LeftEnd => "left-end",
            Placement::Right => "right",
            Placement::RightStart => "right-start",
            Placement::RightEnd => "right-end",
            Placement::Auto => "auto",
            Placement::Center => "center",
        }
    }
}

/// One entry of a tour script.
///
/// The override flags are optional; missing values are filled from the
/// tour-level options when the step is merged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct Step {
    /// Selector of the element to highlight
    pub target: String,

    /// Body shown in the tooltip
    pub content: String,

    /// Optional tooltip heading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default)]
    pub placement: Placement,

    /// Open the tooltip directly, without a beacon first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_beacon: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_close_on_esc: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_overlay: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_scrolling: Option<bool>,

    /// The target is pinned and should not be scrolled to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_fixed: Option<bool>,

    /// Extra room kept around the highlighted target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spotlight_padding: Option<f64>,
}

impl Step {
    /// Creates a step with the default placement and no overrides.
    pub fn new(target: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }
}

/// A step with every override resolved against the tour options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct MergedStep {
    pub target: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub placement: Placement,
    pub disable_beacon: bool,
    pub disable_close_on_esc: bool,
    pub disable_overlay: bool,
    pub disable_scrolling: bool,
    pub is_fixed: bool,
    pub spotlight_padding: f64,
}

impl MergedStep {
    pub fn is_centered(&self) -> bool {
        self.placement == Placement::Center
    }
}
