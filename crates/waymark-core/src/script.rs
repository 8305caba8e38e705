//! Tour scripts stored as JSON files.
//!
//! A script is a [`TourOptions`] document with an optional name and
//! description:
//!
//! ```json
//! {
//!   "name": "Welcome",
//!   "scroll_to_first_step": true,
//!   "steps": [
//!     { "target": "#search", "content": "Find anything from here" },
//!     { "target": "#profile", "content": "Your settings", "placement": "left" }
//!   ]
//! }
//! ```
//!
//! Without an explicit path the script is looked up at
//! `$XDG_CONFIG_HOME/waymark/tour.json` or `~/.config/waymark/tour.json`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, ResultExt, TourError},
    models::{Placement, Step},
    options::TourOptions,
    validation::check_steps,
};

/// A named set of tour options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct TourScript {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub options: TourOptions,
}

impl TourScript {
    pub fn new(options: TourOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// A small script to start from.
    pub fn sample() -> Self {
        let mut profile = Step::new("#profile", "Your settings live here").with_placement(Placement::Left);
        profile.disable_beacon = Some(true);

        Self {
            name: Some("Welcome".to_string()),
            description: Some("A first look around".to_string()),
            options: TourOptions {
                scroll_to_first_step: true,
                ..TourOptions::with_steps(vec![
                    Step::new("body", "Welcome aboard! Here is a quick tour.")
                        .with_title("Welcome")
                        .with_placement(Placement::Center),
                    Step::new("#search", "Find anything from here").with_title("Search"),
                    profile,
                ])
            },
        }
    }

    /// Parses a script from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses the script at `path`.
    ///
    /// # Errors
    ///
    /// Returns `TourError::FileSystem` if the file cannot be read
    /// Returns `TourError::Serialization` if it is not a valid script
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| TourError::FileSystem {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&json)
    }

    /// Writes the script as pretty-printed JSON, creating parent directories.
    pub fn to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| TourError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(self).with_context("Failed to encode tour script")?;
        fs::write(path, json + "\n").map_err(|e| TourError::FileSystem {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Checks the steps and the numeric options.
    pub fn validate(&self) -> Result<()> {
        let options = &self.options;

        if !options.scroll_offset.is_finite() {
            return Err(TourError::invalid_input("scroll_offset").with_reason("must be a finite number"));
        }

        if !options.spotlight_padding.is_finite() || options.spotlight_padding < 0.0 {
            return Err(TourError::invalid_input("spotlight_padding")
                .with_reason("must be a non-negative number"));
        }

        if let Some(index) = options.step_index {
            if index >= options.steps.len() {
                return Err(TourError::invalid_input("step_index").with_reason(format!(
                    "{index} is out of range for {} steps",
                    options.steps.len()
                )));
            }
        }

        check_steps(&options.steps)
    }

    /// Returns the default script path following the XDG Base Directory
    /// specification.
    pub fn default_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("waymark")
            .place_config_file("tour.json")
            .map_err(|e| TourError::XdgDirectory(e.to_string()))
    }
}
