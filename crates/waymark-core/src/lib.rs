//! Core library for the Waymark guided-tour engine.
//!
//! A tour walks a user through a sequence of steps, each pointing at a
//! target element. This crate holds everything except the rendering:
//!
//! - [`store`]: the tour state machine and its listeners
//! - [`tour`]: the controller that reacts to configuration changes, emits
//!   callback events and drives scrolling
//! - [`scroll`]: the scroll decision and offset computation
//! - [`host`]: the seam to the environment (element lookup, scrolling,
//!   keyboard) with an in-memory implementation
//! - [`script`]: JSON tour scripts and their default location
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use waymark_core::{
//!     host::{HeadlessHost, HeadlessTarget},
//!     models::{Lifecycle, StatePatch},
//!     Step, TourBuilder, TourStatus,
//! };
//!
//! let host = Arc::new(
//!     HeadlessHost::new().with_target("#search", HeadlessTarget::at(120.0, 0.0)),
//! );
//!
//! let mut tour = TourBuilder::new()
//!     .with_steps(vec![Step::new("#search", "Find anything from here")])
//!     .with_callback(|event| println!("{event}"))
//!     .mount(host);
//!
//! // The renderer reports that the tooltip is showing.
//! tour.update(StatePatch::new().lifecycle(Lifecycle::Tooltip));
//! tour.close();
//!
//! assert_eq!(tour.state().status, TourStatus::Finished);
//! ```

pub mod display;
pub mod error;
pub mod host;
pub mod models;
pub mod options;
pub mod scroll;
pub mod script;
pub mod store;
pub mod tour;
pub mod validation;

// Re-export commonly used types
pub use display::{EventLog, OperationStatus, Steps};
pub use error::{Result, TourError};
pub use models::{
    Action, EventType, Lifecycle, MergedStep, Placement, Step, TourEvent, TourState, TourStatus,
};
pub use options::TourOptions;
pub use script::TourScript;
pub use store::{Store, StoreOptions, Subscription};
pub use tour::{Tour, TourBuilder};
pub use validation::{check_steps, validate_steps};
