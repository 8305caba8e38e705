//! Display implementations and wrapper types for tour output.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]).
//! Collections and operation feedback get small newtype wrappers so the CLI
//! can print whole step lists or event logs the same way everywhere.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Display Impls & │    │    Markdown     │
//! │ (Step, State)   │───▶│    Wrappers     │───▶│     Output      │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: [`Steps`] and [`EventLog`]
//! - [`status`]: success and failure messages ([`OperationStatus`])
//! - [`models`]: Display implementations for domain models
//!
//! # Examples
//!
//! ```rust
//! use waymark_core::{display::Steps, Step};
//!
//! let steps = Steps(vec![
//!     Step::new("#search", "Find anything from here").with_title("Search"),
//!     Step::new("#profile", "Your settings"),
//! ]);
//!
//! let output = steps.to_string();
//! assert!(output.contains("## 1. Search"));
//! assert!(output.contains("## 2. #profile"));
//! ```

pub mod collections;
pub mod models;
pub mod status;

pub use collections::{EventLog, Steps};
pub use status::OperationStatus;
