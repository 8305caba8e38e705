//! Waymark CLI
//!
//! Command-line companion for Waymark tour scripts: validation, display,
//! headless simulation and schema export.

mod args;
mod cli;
mod renderer;
mod simulate;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;
use waymark_core::TourScript;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        script,
        no_color,
        command,
    } = Args::parse();

    let script_path = match script {
        Some(path) => path,
        None => TourScript::default_path().context("Failed to resolve the default script path")?,
    };

    info!("Waymark started with {}", script_path.display());

    let cli = Cli::new(script_path, TerminalRenderer::new(!no_color));

    match command {
        Some(Validate) => cli.validate(),
        Some(Show) | None => cli.show(),
        Some(Run { input }) => cli.run(&input).await,
        Some(Init { force }) => cli.init(force),
        Some(Schema) => cli.schema(),
    }
}
