//! Command handlers.
//!
//! Each handler loads the script, does its work through `waymark-core` and
//! hands markdown to the [`TerminalRenderer`].

use std::{fmt::Write as _, path::PathBuf};

use anyhow::{bail, Context, Result};
use waymark_core::{display::Steps, EventLog, OperationStatus, TourScript};

use crate::{
    renderer::TerminalRenderer,
    simulate::{simulate, Command},
};

pub struct Cli {
    script_path: PathBuf,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(script_path: PathBuf, renderer: TerminalRenderer) -> Self {
        Self {
            script_path,
            renderer,
        }
    }

    fn load(&self) -> Result<TourScript> {
        TourScript::from_path(&self.script_path)
            .with_context(|| format!("Failed to load tour script {}", self.script_path.display()))
    }

    fn load_valid(&self) -> Result<TourScript> {
        let script = self.load()?;
        script.validate().context("Tour script is not valid")?;
        Ok(script)
    }

    pub fn validate(&self) -> Result<()> {
        let script = self.load_valid()?;

        let message = format!(
            "{} is valid ({} steps)",
            self.script_path.display(),
            script.options.steps.len()
        );
        self.renderer.render(&OperationStatus::success(message).to_string());
        Ok(())
    }

    pub fn show(&self) -> Result<()> {
        let script = self.load()?;
        let options = &script.options;

        let mut out = String::new();
        writeln!(out, "# {}", script.name.as_deref().unwrap_or("Tour"))?;
        writeln!(out)?;
        if let Some(description) = &script.description {
            writeln!(out, "{description}")?;
            writeln!(out)?;
        }

        writeln!(out, "- **Run**: {}", yes_no(options.run))?;
        if let Some(index) = options.step_index {
            writeln!(out, "- **Controlled at step**: {}", index + 1)?;
        }
        writeln!(out, "- **Continuous**: {}", yes_no(options.continuous))?;
        writeln!(out, "- **Scrolling**: {}", yes_no(!options.disable_scrolling))?;
        writeln!(out, "- **Scroll to first step**: {}", yes_no(options.scroll_to_first_step))?;
        writeln!(out, "- **Scroll offset**: {}", options.scroll_offset)?;
        writeln!(out)?;
        write!(out, "{}", Steps(options.steps.clone()))?;

        self.renderer.render(&out);
        Ok(())
    }

    pub async fn run(&self, input: &[Command]) -> Result<()> {
        let script = self.load_valid()?;
        let report = simulate(script.options, input).await;

        let mut out = String::new();
        writeln!(out, "# Simulation")?;
        writeln!(out)?;
        for entry in &report.transcript {
            let label = entry
                .command
                .map_or_else(|| "mount".to_string(), |command| command.to_string());
            writeln!(
                out,
                "- **{label}**: {} / {} at {}",
                entry.state.status, entry.state.lifecycle, entry.state.index
            )?;
        }

        writeln!(out)?;
        writeln!(out, "## Events")?;
        writeln!(out)?;
        write!(out, "{}", EventLog(report.events))?;

        writeln!(out)?;
        writeln!(out, "## Scrolls")?;
        writeln!(out)?;
        if report.scrolls.is_empty() {
            writeln!(out, "No scrolls.")?;
        }
        for scroll in &report.scrolls {
            writeln!(out, "- {scroll}")?;
        }

        writeln!(out)?;
        writeln!(out, "## Final state")?;
        writeln!(out)?;
        write!(out, "{}", report.state)?;

        self.renderer.render(&out);
        Ok(())
    }

    pub fn init(&self, force: bool) -> Result<()> {
        if self.script_path.exists() && !force {
            bail!(
                "{} already exists, use --force to overwrite it",
                self.script_path.display()
            );
        }

        TourScript::sample()
            .to_path(&self.script_path)
            .context("Failed to write the sample script")?;

        let message = format!("Wrote sample script to {}", self.script_path.display());
        self.renderer.render(&OperationStatus::success(message).to_string());
        Ok(())
    }

    pub fn schema(&self) -> Result<()> {
        let schema = schemars::schema_for!(TourScript);
        self.renderer.raw(&serde_json::to_string_pretty(&schema)?);
        Ok(())
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
