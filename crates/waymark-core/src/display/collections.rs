//! Collection wrapper types for displaying groups of domain objects.

use std::{fmt, ops::Index};

use crate::models::{Step, TourEvent};

/// Newtype wrapper for displaying a numbered step list.
///
/// # Examples
///
/// ```rust
/// use waymark_core::{display::Steps, Step};
///
/// let steps = Steps(vec![Step::new("#search", "Find anything from here")]);
/// assert!(steps.to_string().contains("`#search`"));
/// ```
pub struct Steps(pub Vec<Step>);

impl Steps {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.0.iter()
    }
}

impl Index<usize> for Steps {
    type Output = Step;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IntoIterator for Steps {
    type Item = Step;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Steps {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Steps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No steps found.");
        }

        for (position, step) in self.0.iter().enumerate() {
            writeln!(f, "## {}. {}", position + 1, step.heading())?;
            writeln!(f)?;
            step.fmt_body(f)?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying the events a tour emitted, oldest first.
pub struct EventLog(pub Vec<TourEvent>);

impl EventLog {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TourEvent> {
        self.0.iter()
    }
}

impl fmt::Display for EventLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No events.");
        }

        for event in &self.0 {
            writeln!(f, "- {event}")?;
        }
        Ok(())
    }
}
