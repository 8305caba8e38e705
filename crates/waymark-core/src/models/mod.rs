//! Data models for tours, steps and their runtime state.
//!
//! This module contains the core domain models of the Waymark tour engine.
//! Display implementations for these models are located in
//! [`crate::display::models`] to keep data structures apart from
//! presentation.
//!
//! ## Model Overview
//!
//! - [`Step`]: one scripted entry pointing at a target, with optional
//!   per-step overrides
//! - [`MergedStep`]: a step with every override resolved against the tour
//!   options
//! - [`TourState`]: index, status, lifecycle, action and the scrolling flag
//! - [`StatePatch`]: a permissive partial update
//! - [`PopperData`] / [`PopperSlot`]: positioning metadata cached by the
//!   controller
//! - [`TourEvent`]: the envelope handed to the application callback
//!
//! # Examples
//!
//! ```rust
//! use waymark_core::models::{Placement, Step, TourState, TourStatus};
//!
//! let step = Step::new("#search", "Find anything from here")
//!     .with_title("Search")
//!     .with_placement(Placement::Right);
//! println!("{}", step); // Markdown with target, placement and content
//!
//! let state = TourState {
//!     status: TourStatus::Running,
//!     size: 3,
//!     ..TourState::default()
//! };
//! assert!(state.has_step());
//! ```

pub mod event;
pub mod popper;
pub mod state;
pub mod status;
pub mod step;


pub use event::{EventType, TourEvent};
pub use popper::{PopperData, PopperKind, PopperPlacement, PopperRect, PopperSlot};
pub use state::{StateChange, StatePatch, TourState};
pub use status::{Action, Lifecycle, TourStatus};
pub use step::{MergedStep, Placement, Step};
