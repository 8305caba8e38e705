//! Positioning metadata reported by the renderer's popper library.

use serde::{Deserialize, Serialize};

/// Side of the target the floating element ended up on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PopperPlacement {
    Top,
    Bottom,
    Left,
    Right,
}

/// Page-relative box of the rendered floating element.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct PopperRect {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

/// Where a beacon or tooltip was actually rendered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PopperData {
    pub placement: PopperPlacement,

    /// Rendered on the opposite side of what was asked for
    #[serde(default)]
    pub flipped: bool,

    pub popper: PopperRect,
}

/// Which floating element a [`PopperData`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopperKind {
    Beacon,
    Tooltip,
}

/// Cached popper metadata for one floating element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PopperSlot {
    /// Nothing rendered since the last lifecycle reset
    #[default]
    Unset,
    Known(PopperData),
}

impl PopperSlot {
    pub fn set(&mut self, data: PopperData) {
        *self = PopperSlot::Known(data);
    }

    pub fn clear(&mut self) {
        *self = PopperSlot::Unset;
    }

    pub fn known(&self) -> Option<&PopperData> {
        match self {
            PopperSlot::Known(data) => Some(data),
            PopperSlot::Unset => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, PopperSlot::Known(_))
    }
}
