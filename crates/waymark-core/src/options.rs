//! Tour-level configuration.
//!
//! [`TourOptions`] plays the role of the properties a host application
//! passes to the tour: the step script, whether the tour should run, an
//! optional externally controlled step index, and defaults that every step
//! inherits unless it overrides them.
//!
//! ```rust
//! use waymark_core::{Step, TourOptions};
//!
//! let options = TourOptions {
//!     steps: vec![Step::new("#nav", "Navigation lives here")],
//!     scroll_to_first_step: true,
//!     ..TourOptions::default()
//! };
//!
//! let step = options.merge_step(&options.steps[0]);
//! assert_eq!(step.spotlight_padding, 10.0);
//! assert!(!step.disable_scrolling);
//! ```

use serde::{Deserialize, Serialize};

use crate::models::{MergedStep, Step};

/// Margin kept between a scrolled-to target and the viewport edge.
pub const DEFAULT_SCROLL_OFFSET: f64 = 20.0;

/// Room reserved around a highlighted target.
pub const DEFAULT_SPOTLIGHT_PADDING: f64 = 10.0;

/// Options controlling one tour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(default)]
pub struct TourOptions {
    /// Start (or keep) the tour running
    pub run: bool,

    /// Index owned by the application; makes the tour controlled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_index: Option<usize>,

    /// Steps advance into each other without closing in between
    pub continuous: bool,

    /// Raise controller diagnostics to info level
    pub debug: bool,

    pub disable_close_on_esc: bool,
    pub disable_overlay: bool,
    pub disable_scrolling: bool,

    /// Also scroll horizontally
    pub enable_scroll_x: bool,

    /// Scroll to the first step as well, not only on index changes
    pub scroll_to_first_step: bool,

    pub scroll_offset: f64,
    pub spotlight_padding: f64,

    pub steps: Vec<Step>,
}

impl Default for TourOptions {
    fn default() -> Self {
        Self {
            run: true,
            step_index: None,
            continuous: false,
            debug: false,
            disable_close_on_esc: false,
            disable_overlay: false,
            disable_scrolling: false,
            enable_scroll_x: false,
            scroll_to_first_step: false,
            scroll_offset: DEFAULT_SCROLL_OFFSET,
            spotlight_padding: DEFAULT_SPOTLIGHT_PADDING,
            steps: Vec::new(),
        }
    }
}

impl TourOptions {
    pub fn with_steps(steps: Vec<Step>) -> Self {
        Self {
            steps,
            ..Self::default()
        }
    }

    /// Whether the application drives the step index.
    pub fn is_controlled(&self) -> bool {
        self.step_index.is_some()
    }

    /// Resolves a step's overrides against these options.
    pub fn merge_step(&self, step: &Step) -> MergedStep {
        MergedStep {
            target: step.target.clone(),
            content: step.content.clone(),
            title: step.title.clone(),
            placement: step.placement,
            disable_beacon: step.disable_beacon.unwrap_or(false),
            disable_close_on_esc: step
                .disable_close_on_esc
                .unwrap_or(self.disable_close_on_esc),
            disable_overlay: step.disable_overlay.unwrap_or(self.disable_overlay),
            disable_scrolling: step.disable_scrolling.unwrap_or(self.disable_scrolling),
            is_fixed: step.is_fixed.unwrap_or(false),
            spotlight_padding: step.spotlight_padding.unwrap_or(self.spotlight_padding),
        }
    }
}
