use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::simulate::Command as SimCommand;

/// Command-line interface for Waymark guided tours
///
/// Waymark walks users through a sequence of steps, each highlighting one
/// element of an application. This tool validates tour scripts, prints them,
/// and simulates a run against a headless page so the resulting events and
/// scrolls can be inspected without a renderer.
#[derive(Parser)]
#[command(version, about, name = "wm")]
pub struct Args {
    /// Path to the tour script. Defaults to
    /// $XDG_CONFIG_HOME/waymark/tour.json
    #[arg(long, global = true)]
    pub script: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
///
/// Without a command the script is shown, like `wm show`.
#[derive(Subcommand)]
pub enum Commands {
    /// Check the script's steps and options
    #[command(alias = "v")]
    Validate,
    /// Print the script's options and steps
    #[command(alias = "s")]
    Show,
    /// Simulate the tour against a headless page
    #[command(alias = "r")]
    Run {
        /// Commands to apply in order: next, prev, close, skip, esc, stop,
        /// start, open, reset or go:N. Without any, the tour is advanced
        /// with `next` until it ends
        #[arg(short, long, value_delimiter = ',')]
        input: Vec<SimCommand>,
    },
    /// Write a sample script
    Init {
        /// Overwrite an existing script
        #[arg(long)]
        force: bool,
    },
    /// Print the JSON schema of tour scripts
    Schema,
}
