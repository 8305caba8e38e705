//! Display implementations for domain models.
//!
//! Enums print their wire names. Steps and states print as markdown for the
//! terminal renderer; events print as a single line so they can be logged.

use std::fmt;

use crate::{
    host::{Axis, ScrollCall},
    models::{
        Action, EventType, Lifecycle, MergedStep, Placement, Step, TourEvent, TourState,
        TourStatus,
    },
};

impl fmt::Display for TourStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

impl Step {
    /// Title if there is one, the target otherwise.
    pub(crate) fn heading(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.target)
    }

    /// Everything below the heading.
    pub(crate) fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- **Target**: `{}`", self.target)?;
        writeln!(f, "- **Placement**: {}", self.placement)?;

        let overrides = [
            ("beacon", self.disable_beacon),
            ("close on escape", self.disable_close_on_esc),
            ("overlay", self.disable_overlay),
            ("scrolling", self.disable_scrolling),
        ];
        for (name, disabled) in overrides {
            if let Some(disabled) = disabled {
                let word = if disabled { "off" } else { "on" };
                writeln!(f, "- **{}**: {word}", capitalize(name))?;
            }
        }

        if self.is_fixed == Some(true) {
            writeln!(f, "- **Fixed**: yes")?;
        }
        if let Some(padding) = self.spotlight_padding {
            writeln!(f, "- **Spotlight padding**: {padding}")?;
        }

        writeln!(f)?;
        writeln!(f, "{}", self.content)?;
        writeln!(f)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {}", self.heading())?;
        writeln!(f)?;
        self.fmt_body(f)
    }
}

impl fmt::Display for MergedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {}", self.title.as_deref().unwrap_or(&self.target))?;
        writeln!(f)?;
        writeln!(f, "- **Target**: `{}`", self.target)?;
        writeln!(f, "- **Placement**: {}", self.placement)?;
        writeln!(f, "- **Beacon**: {}", on_off(!self.disable_beacon))?;
        writeln!(f, "- **Overlay**: {}", on_off(!self.disable_overlay))?;
        writeln!(f, "- **Scrolling**: {}", on_off(!self.disable_scrolling))?;
        writeln!(f, "- **Spotlight padding**: {}", self.spotlight_padding)?;
        writeln!(f)?;
        writeln!(f, "{}", self.content)?;
        writeln!(f)
    }
}

impl fmt::Display for TourState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- **Status**: {}", self.status)?;
        writeln!(f, "- **Lifecycle**: {}", self.lifecycle)?;
        writeln!(f, "- **Action**: {}", self.action)?;
        if self.has_step() {
            writeln!(f, "- **Step**: {} of {}", self.index + 1, self.size)?;
        } else {
            writeln!(f, "- **Step**: none ({} steps)", self.size)?;
        }
        if self.scrolling {
            writeln!(f, "- **Scrolling**: yes")?;
        }
        if self.controlled {
            writeln!(f, "- **Controlled**: yes")?;
        }
        Ok(())
    }
}

impl fmt::Display for TourEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` {} / {} / {} at {}/{}",
            self.kind, self.status, self.lifecycle, self.action, self.index, self.size
        )?;
        if let Some(step) = &self.step {
            write!(f, " (`{}`)", step.target)?;
        }
        Ok(())
    }
}

impl fmt::Display for ScrollCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scroll {} to {} on {}", self.parent.0, self.offset, self.axis)
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
