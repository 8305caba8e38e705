//! Tour state store.
//!
//! The [`Store`] owns the step sequence and the [`TourState`], and is the
//! only place either of them changes. Every command applies its mutation
//! under a lock, releases it, and then notifies the registered listeners
//! synchronously with the new state, but only when the state actually
//! changed.
//!
//! # State Machine
//!
//! ```text
//!            start            next/prev/go/close         past last step
//!  idle ──▶ ready ──────▶ running ─────────────────▶ running ─────────▶ finished
//!  (no steps)  ▲             │  ▲
//!              │        stop │  │ start                skip
//!        reset │             ▼  │            running ─────────▶ skipped
//!              └──────── paused ┘
//! ```
//!
//! Whenever the status is `running`, `index` points at an existing step.
//! Moving the index to `size` finishes the tour.
//!
//! # Controlled Tours
//!
//! A store built with a `start_index` is *controlled*: the application owns
//! the index and moves it with [`Store::update`]. Navigation helpers (`next`,
//! `prev`, `go`, `close`) then leave the index alone and `reset` is ignored.
//!
//! # Examples
//!
//! ```rust
//! use waymark_core::{Step, Store, StoreOptions, TourStatus};
//!
//! let store = Store::new(StoreOptions {
//!     steps: vec![Step::new("#a", "First"), Step::new("#b", "Second")],
//!     ..StoreOptions::default()
//! });
//! assert_eq!(store.state().status, TourStatus::Ready);
//!
//! store.start(None);
//! store.next();
//! assert_eq!(store.state().index, 1);
//!
//! store.next();
//! assert_eq!(store.state().status, TourStatus::Finished);
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::debug;
use serde_json::Value;

use crate::models::{Action, Lifecycle, StatePatch, Step, TourState, TourStatus};

mod listeners;


pub use listeners::Subscription;
use listeners::Listeners;

/// Initial configuration of a [`Store`].
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    pub steps: Vec<Step>,

    /// Application-owned start index; makes the store controlled
    pub start_index: Option<usize>,
}

struct StoreInner {
    state: TourState,
    steps: Vec<Step>,
    initial_steps: Vec<Step>,
    start_index: usize,
    /// A start was requested and not revoked by stop or reset
    start_requested: bool,
}

impl StoreInner {
    fn initial_state(&self) -> TourState {
        let size = self.steps.len();
        TourState {
            index: self.start_index,
            status: if size > 0 {
                TourStatus::Ready
            } else {
                TourStatus::Idle
            },
            lifecycle: Lifecycle::Init,
            action: Action::Init,
            scrolling: false,
            size,
            controlled: self.state.controlled,
        }
    }

    /// Moves to `index` with a fresh lifecycle, finishing the tour when the
    /// index runs past the last step.
    fn move_to(&mut self, action: Action, index: usize) {
        let size = self.state.size;
        self.state.action = action;
        self.state.lifecycle = Lifecycle::Init;
        self.state.index = index.min(size);

        if self.state.index == size {
            self.state.status = TourStatus::Finished;
        }
    }

    /// Restores `index < size` while running.
    ///
    /// A tour left without steps goes back to idle and keeps any pending
    /// start request, so the next non-empty sequence starts it again.
    fn settle_running_index(&mut self) {
        if self.state.status != TourStatus::Running || self.state.has_step() {
            return;
        }

        if self.state.size == 0 {
            self.state.status = TourStatus::Idle;
            self.state.lifecycle = Lifecycle::Init;
            self.state.index = 0;
        } else {
            self.state.index = self.state.size;
            self.state.status = TourStatus::Finished;
        }
    }
}

/// Shared handle to a tour's state.
///
/// Cloning a `Store` yields another handle to the same state and listeners.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Mutex<StoreInner>>,
    listeners: Arc<Listeners>,
}

impl Store {
    pub fn new(options: StoreOptions) -> Self {
        let StoreOptions { steps, start_index } = options;

        let mut inner = StoreInner {
            state: TourState {
                controlled: start_index.is_some(),
                ..TourState::default()
            },
            initial_steps: steps.clone(),
            steps,
            start_index: start_index.unwrap_or(0),
            start_requested: false,
        };
        inner.state = inner.initial_state();

        Self {
            inner: Arc::new(Mutex::new(inner)),
            listeners: Arc::new(Listeners::default()),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> TourState {
        self.lock().state
    }

    /// Alias of [`Store::state`].
    pub fn info(&self) -> TourState {
        self.state()
    }

    pub fn steps(&self) -> Vec<Step> {
        self.lock().steps.clone()
    }

    pub fn step(&self, index: usize) -> Option<Step> {
        self.lock().steps.get(index).cloned()
    }

    pub fn is_controlled(&self) -> bool {
        self.lock().state.controlled
    }

    /// Registers `listener`, called with the full new state after every
    /// mutation. The listener stays registered while the returned
    /// [`Subscription`] is alive.
    pub fn add_listener<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&TourState) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Starts the tour at `index`, or at the configured start index.
    ///
    /// Does nothing while already running. Without steps the request is
    /// remembered and honoured by the next non-empty [`Store::set_steps`].
    pub fn start(&self, index: Option<usize>) {
        self.mutate(|inner| {
            if inner.state.status == TourStatus::Running {
                debug!("start ignored: tour already running");
                return;
            }

            inner.start_requested = true;

            if inner.steps.is_empty() {
                debug!("start deferred: waiting for steps");
                return;
            }

            let index = index.unwrap_or(inner.start_index);
            inner.state.status = TourStatus::Running;
            inner.state.scrolling = false;
            inner.move_to(Action::Start, index);
        });
    }

    /// Pauses the tour, optionally moving one step forward.
    pub fn stop(&self, advance: bool) {
        self.mutate(|inner| {
            inner.start_requested = false;

            if inner.state.status.is_terminal() {
                debug!("stop ignored: tour already {}", inner.state.status.as_str());
                return;
            }

            let step = usize::from(advance && !inner.state.controlled);
            inner.state.action = Action::Stop;
            inner.state.lifecycle = Lifecycle::Init;
            inner.state.index = (inner.state.index + step).min(inner.state.size);
            inner.state.status = TourStatus::Paused;
        });
    }

    /// Shallow-merges `patch` into the state.
    ///
    /// Fields absent from the patch are left untouched. An index at or past
    /// the end of the steps finishes the tour.
    pub fn update(&self, patch: StatePatch) {
        self.mutate(|inner| {

            if let Some(action) = patch.action {
                inner.state.action = action;
            }
            if let Some(lifecycle) = patch.lifecycle {
                inner.state.lifecycle = lifecycle;
            }
            if let Some(status) = patch.status {
                inner.state.status = status;
            }
            if let Some(index) = patch.index {
                let size = inner.state.size;
                inner.state.index = index.min(size);
                if size > 0 && inner.state.index == size {
                    inner.state.status = TourStatus::Finished;
                }
            }

            inner.settle_running_index();
        });
    }

    /// Permissive variant of [`Store::update`] for untyped input.
    ///
    /// Unknown keys and values of the wrong shape are ignored.
    pub fn update_json(&self, value: &Value) {
        self.update(StatePatch::from_json(value));
    }

    /// Replaces the step sequence.
    ///
    /// When the store had no steps and a start was requested, receiving a
    /// non-empty sequence starts the tour.
    pub fn set_steps(&self, steps: Vec<Step>) {
        let mut should_start = false;

        self.mutate(|inner| {
            let was_empty = inner.steps.is_empty();

            inner.steps = steps;
            inner.state.size = inner.steps.len();

            match inner.state.status {
                TourStatus::Idle if inner.state.size > 0 => inner.state.status = TourStatus::Ready,
                TourStatus::Ready if inner.state.size == 0 => inner.state.status = TourStatus::Idle,
                _ => {}
            }
            inner.settle_running_index();

            should_start = was_empty
                && inner.state.size > 0
                && inner.start_requested
                && inner.state.status != TourStatus::Running;
        });

        if should_start {
            self.start(None);
        }
    }

    /// Closes the current step.
    ///
    /// On the last step the tour finishes; otherwise it moves on (unless
    /// controlled) and stays running.
    pub fn close(&self) {
        self.mutate(|inner| {
            if inner.state.status != TourStatus::Running {
                debug!("close ignored: tour is {}", inner.state.status.as_str());
                return;
            }

            if inner.state.controlled && !inner.state.is_last_step() {
                inner.state.action = Action::Close;
                inner.state.lifecycle = Lifecycle::Init;
                return;
            }

            let index = if inner.state.controlled {
                inner.state.size
            } else {
                inner.state.index + 1
            };
            inner.move_to(Action::Close, index);
        });
    }

    /// Restores the initial state.
    ///
    /// With `everything`, step replacements made through
    /// [`Store::set_steps`] are dropped as well and the steps given at
    /// construction come back. Ignored for controlled tours.
    pub fn reset(&self, everything: bool) {
        self.mutate(|inner| {
            if inner.state.controlled {
                debug!("reset ignored: tour is controlled");
                return;
            }

            if everything {
                inner.steps = inner.initial_steps.clone();
            }

            inner.start_requested = false;
            inner.state = TourState {
                action: Action::Reset,
                ..inner.initial_state()
            };
        });
    }

    pub fn next(&self) {
        self.navigate(Action::Next, |index| index + 1);
    }

    pub fn prev(&self) {
        self.navigate(Action::Prev, |index| index.saturating_sub(1));
    }

    /// Jumps to `index`; an index without a step finishes the tour.
    pub fn go(&self, index: usize) {
        self.navigate(Action::Go, |_| index);
    }

    pub fn skip(&self) {
        self.mutate(|inner| {
            if inner.state.status != TourStatus::Running {
                return;
            }

            inner.state.action = Action::Skip;
            inner.state.lifecycle = Lifecycle::Init;
            inner.state.status = TourStatus::Skipped;
        });
    }

    /// Opens the tooltip of the current step.
    pub fn open(&self) {
        self.mutate(|inner| {
            if inner.state.status != TourStatus::Running {
                return;
            }

            inner.state.action = Action::Update;
            inner.state.lifecycle = Lifecycle::Tooltip;
        });
    }

    /// Flips only the scrolling flag.
    pub fn set_scrolling(&self, scrolling: bool) {
        self.mutate(|inner| inner.state.scrolling = scrolling);
    }

    fn navigate(&self, action: Action, target: impl FnOnce(usize) -> usize) {
        self.mutate(|inner| {
            if inner.state.status != TourStatus::Running {
                debug!("{} ignored: tour is {}", action.as_str(), inner.state.status.as_str());
                return;
            }
            if inner.state.controlled {
                debug!("{} ignored: tour is controlled", action.as_str());
                return;
            }

            let index = target(inner.state.index);
            inner.move_to(action, index);
        });
    }

    fn mutate(&self, f: impl FnOnce(&mut StoreInner)) {
        let changed = {
            let mut inner = self.lock();
            let before = inner.state;
            f(&mut *inner);
            (inner.state != before).then_some(inner.state)
        };

        if let Some(state) = changed {
            self.listeners.notify(&state);
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("Store")
            .field("state", &inner.state)
            .field("steps", &inner.steps.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
