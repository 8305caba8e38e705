//! Builder for creating and mounting Tour instances.

use std::sync::Arc;

use super::{Callback, Tour};
use crate::{
    host::Host,
    models::{Step, TourEvent},
    options::TourOptions,
    script::TourScript,
};

/// Builder for creating and configuring Tour instances.
#[derive(Default)]
pub struct TourBuilder {
    options: TourOptions,
    callback: Option<Callback>,
}

impl TourBuilder {
    /// Creates a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a loaded tour script.
    pub fn from_script(script: TourScript) -> Self {
        Self::new().with_options(script.options)
    }

    /// Replaces all options at once.
    pub fn with_options(mut self, options: TourOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_steps(mut self, steps: Vec<Step>) -> Self {
        self.options.steps = steps;
        self
    }

    /// Whether the tour starts as soon as it is mounted. Defaults to true.
    pub fn with_run(mut self, run: bool) -> Self {
        self.options.run = run;
        self
    }

    /// Hands control of the step index to the application.
    pub fn with_step_index(mut self, index: usize) -> Self {
        self.options.step_index = Some(index);
        self
    }

    /// Sets the function receiving tour events.
    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&TourEvent) + Send + 'static,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    /// Mounts the configured tour on `host`.
    ///
    /// Invalid steps are reported and left out; when `run` is set the tour
    /// then waits until valid steps arrive through
    /// [`Tour::set_options`](super::Tour::set_options).
    pub fn mount(self, host: Arc<dyn Host>) -> Tour {
        Tour::mount(self.options, host, self.callback)
    }
}

impl std::fmt::Debug for TourBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TourBuilder")
            .field("options", &self.options)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}
