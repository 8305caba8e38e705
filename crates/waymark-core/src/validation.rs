//! Structural validation of step sequences.
//!
//! A tour only starts once its steps validate. Failures are reported as a
//! logged diagnostic; callers that want the reason can use
//! [`check_steps`] directly.

use log::warn;

use crate::{
    error::{Result, TourError},
    models::Step,
};

/// Checks a single step: it needs a target selector and some content.
pub fn check_step(index: usize, step: &Step) -> Result<()> {
    if step.target.trim().is_empty() {
        return Err(TourError::invalid_step(index).with_reason("target is missing from the step"));
    }

    if step.content.trim().is_empty() {
        return Err(TourError::invalid_step(index).with_reason("content is missing from the step"));
    }

    if let Some(padding) = step.spotlight_padding {
        if !padding.is_finite() || padding < 0.0 {
            return Err(TourError::invalid_step(index)
                .with_reason(format!("spotlight padding must be a non-negative number, got {padding}")));
        }
    }

    Ok(())
}

/// Checks every step, stopping at the first invalid one.
///
/// An empty sequence is valid: the tour simply waits for steps.
pub fn check_steps(steps: &[Step]) -> Result<()> {
    steps
        .iter()
        .enumerate()
        .try_for_each(|(index, step)| check_step(index, step))
}

/// Returns whether `steps` may be used for a tour, logging why not.
///
/// ```rust
/// use waymark_core::{validate_steps, Step};
///
/// assert!(validate_steps(&[Step::new("#a", "First")]));
/// assert!(!validate_steps(&[Step::new("", "No target")]));
/// ```
pub fn validate_steps(steps: &[Step]) -> bool {
    match check_steps(steps) {
        Ok(()) => true,
        Err(e) => {
            warn!("Steps are not valid: {e}");
            false
        }
    }
}
