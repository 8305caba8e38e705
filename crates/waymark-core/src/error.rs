//! Error types for the tour library.
//!
//! Store and controller commands never fail: invalid input degrades to a
//! no-op plus a logged diagnostic. The typed errors below surface where a
//! caller can act on them, namely step validation and script loading.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all tour operations.
#[derive(Error, Debug)]
pub enum TourError {
    /// A step descriptor failed structural validation
    #[error("Step {index} is invalid: {reason}")]
    InvalidStep { index: usize, reason: String },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating step validation errors.
pub struct InvalidStepBuilder {
    index: usize,
}

impl InvalidStepBuilder {
    /// Create a new invalid step error builder for the step at `index`.
    pub fn new(index: usize) -> Self {
        Self { index }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> TourError {
        TourError::InvalidStep {
            index: self.index,
            reason: reason.into(),
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> TourError {
        TourError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl TourError {
    /// Creates a builder for step validation errors.
    pub fn invalid_step(index: usize) -> InvalidStepBuilder {
        InvalidStepBuilder::new(index)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }
}

/// Extension trait for Result to provide concise error mapping with
/// anyhow-style context.
pub trait ResultExt<T, E> {
    /// Add context to any error type, converting to TourError.
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| TourError::Configuration {
            message: format!("{}: {}", context, e),
        })
    }
}

/// Result type alias for tour operations
pub type Result<T> = std::result::Result<T, TourError>;
