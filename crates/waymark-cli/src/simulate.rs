//! Headless simulation of a tour script.
//!
//! The simulator lays every target out down a synthetic page, mounts the
//! tour on a [`HeadlessHost`] and plays the part of the renderer: whenever a
//! step is waiting in `init` it reports the beacon (or the tooltip, for
//! steps that skip the beacon) as shown. Input commands are applied in
//! order and every event and scroll is collected for the report.

use std::{
    fmt,
    str::FromStr,
    sync::{Arc, Mutex, PoisonError},
};

use log::debug;
use waymark_core::{
    host::{HeadlessHost, HeadlessTarget, Key, ScrollCall},
    models::StatePatch,
    Lifecycle, Tour, TourBuilder, TourEvent, TourOptions, TourState, TourStatus,
};

/// Vertical distance between two targets on the synthetic page.
const TARGET_SPACING: f64 = 700.0;

/// Where the first target sits.
const FIRST_TARGET_TOP: f64 = 400.0;

/// One simulated user or application action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Next,
    Prev,
    Close,
    Skip,
    /// Press Escape
    Esc,
    Stop,
    Start,
    Open,
    Reset,
    Go(usize),
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();

        if let Some(index) = s.strip_prefix("go:") {
            return index
                .parse()
                .map(Command::Go)
                .map_err(|_| format!("Invalid step index in '{s}'"));
        }

        match s.as_str() {
            "next" => Ok(Command::Next),
            "prev" => Ok(Command::Prev),
            "close" => Ok(Command::Close),
            "skip" => Ok(Command::Skip),
            "esc" | "escape" => Ok(Command::Esc),
            "stop" => Ok(Command::Stop),
            "start" => Ok(Command::Start),
            "open" => Ok(Command::Open),
            "reset" => Ok(Command::Reset),
            _ => Err(format!("Invalid command: {s}")),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Next => write!(f, "next"),
            Command::Prev => write!(f, "prev"),
            Command::Close => write!(f, "close"),
            Command::Skip => write!(f, "skip"),
            Command::Esc => write!(f, "esc"),
            Command::Stop => write!(f, "stop"),
            Command::Start => write!(f, "start"),
            Command::Open => write!(f, "open"),
            Command::Reset => write!(f, "reset"),
            Command::Go(index) => write!(f, "go:{index}"),
        }
    }
}

/// State after one command was applied.
#[derive(Debug, Clone)]
pub struct Transcript {
    /// `None` for the state right after mounting
    pub command: Option<Command>,
    pub state: TourState,
}

/// Everything a simulated run produced.
#[derive(Debug, Clone)]
pub struct Report {
    pub transcript: Vec<Transcript>,
    pub events: Vec<TourEvent>,
    pub scrolls: Vec<ScrollCall>,
    pub state: TourState,
}

/// Lays the script's targets out on a headless page.
pub fn layout(options: &TourOptions) -> HeadlessHost {
    let host = HeadlessHost::new();

    for (position, step) in options.steps.iter().enumerate() {
        let mut target = HeadlessTarget::at(FIRST_TARGET_TOP + position as f64 * TARGET_SPACING, 0.0);
        if step.is_fixed == Some(true) {
            target = target.fixed();
        }
        host.place(step.target.clone(), target);
    }

    host
}

/// Runs `commands` against a fresh tour. Without commands the tour is
/// advanced until it ends.
pub async fn simulate(options: TourOptions, commands: &[Command]) -> Report {
    let host = Arc::new(layout(&options));
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();

    let commands: Vec<Command> = if commands.is_empty() {
        vec![Command::Next; options.steps.len().max(1)]
    } else {
        commands.to_vec()
    };

    let continuous = options.continuous;
    let mut tour = TourBuilder::new()
        .with_options(options)
        .with_callback(move |event| {
            sink.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(event.clone());
        })
        .mount(host.clone());

    let mut transcript = Vec::with_capacity(commands.len() + 1);

    present(&mut tour, continuous).await;
    transcript.push(Transcript {
        command: None,
        state: tour.state(),
    });

    for command in commands {
        debug!("simulating {command}");

        match command {
            Command::Next => tour.next(),
            Command::Prev => tour.prev(),
            Command::Close => tour.close(),
            Command::Skip => tour.skip(),
            Command::Esc => host.press(Key::Escape),
            Command::Stop => tour.stop(false),
            Command::Start => tour.start(),
            Command::Open => tour.open(),
            Command::Reset => tour.reset(false),
            Command::Go(index) => tour.go(index),
        }

        present(&mut tour, continuous).await;
        transcript.push(Transcript {
            command: Some(command),
            state: tour.state(),
        });
    }

    tour.settle().await;
    tour.unmount();

    let events = std::mem::take(&mut *events.lock().unwrap_or_else(PoisonError::into_inner));

    Report {
        transcript,
        events,
        scrolls: host.scrolls(),
        state: tour.state(),
    }
}

/// Shows the current step the way a renderer would.
async fn present(tour: &mut Tour, continuous: bool) {
    let state = tour.state();
    if state.status != TourStatus::Running {
        return;
    }

    let Some(step) = tour.current_step() else {
        return;
    };

    let skip_beacon = step.disable_beacon || (continuous && state.index > 0);

    let next = match state.lifecycle {
        Lifecycle::Init if skip_beacon => Lifecycle::Tooltip,
        Lifecycle::Init => Lifecycle::Beacon,
        Lifecycle::Ready => Lifecycle::Tooltip,
        Lifecycle::Beacon | Lifecycle::Tooltip => return,
    };

    tour.update(StatePatch::new().lifecycle(next));
    tour.settle().await;
}

#[cfg(test)]
mod tests {
    use waymark_core::{EventType, Step};

    use super::*;

    fn options() -> TourOptions {
        TourOptions::with_steps(vec![
            Step::new("#search", "Find anything from here"),
            Step::new("#projects", "Everything you are working on"),
        ])
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("next".parse::<Command>(), Ok(Command::Next));
        assert_eq!(" ESC ".parse::<Command>(), Ok(Command::Esc));
        assert_eq!("go:3".parse::<Command>(), Ok(Command::Go(3)));
        assert!("go:x".parse::<Command>().is_err());
        assert!("jump".parse::<Command>().is_err());
        assert_eq!(Command::Go(2).to_string(), "go:2");
    }

    #[test]
    fn test_layout_places_every_target() {
        let host = layout(&options());
        assert!(waymark_core::host::Host::find_target(&host, "#projects").is_some());
    }

    #[tokio::test]
    async fn test_default_run_finishes() {
        let report = simulate(options(), &[]).await;

        assert_eq!(report.state.status, TourStatus::Finished);
        assert_eq!(report.transcript.len(), 3);

        let kinds: Vec<EventType> = report.events.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventType::TourStart, EventType::TourEnd]);

        // Only the second step is scrolled to: 400 + 700 - 20.
        assert_eq!(report.scrolls.len(), 1);
        assert_eq!(report.scrolls[0].offset, 1080);
    }

    #[tokio::test]
    async fn test_escape_closes_tooltip() {
        let mut options = options();
        options.steps[0].disable_beacon = Some(true);

        let report = simulate(options, &[Command::Esc]).await;

        assert_eq!(report.transcript[0].state.lifecycle, Lifecycle::Tooltip);
        assert_eq!(report.state.index, 1);
        assert_eq!(report.state.lifecycle, Lifecycle::Beacon);
    }
}
