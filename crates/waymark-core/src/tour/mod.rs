//! The tour controller.
//!
//! A [`Tour`] owns a [`Store`] and coordinates everything around it: it
//! reacts to configuration changes, turns store notifications into callback
//! events, keeps the popper cache, scrolls steps into view through the
//! [`Host`] and closes the tooltip on Escape.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  set_options /  │    │      Store      │    │  notification   │
//! │ helpers / keys  │───▶│   (commands)    │───▶│     channel     │
//! └─────────────────┘    └─────────────────┘    └────────┬────────┘
//!                                                        │ pump
//!                        ┌─────────────────┐    ┌────────▼────────┐
//!                        │ callback / host │◀───│   did_update    │
//!                        │     scroll      │    │ (prev vs. next) │
//!                        └─────────────────┘    └─────────────────┘
//! ```
//!
//! Store listeners only enqueue the new state. The controller drains the
//! queue after every command it issues, comparing each state with the one
//! before it, so updates raised while handling a notification are processed
//! in order. The Escape handler drains the queue itself; when the controller
//! is busy on another thread, that thread drains it again before returning.
//! Scroll completion is picked up by [`Tour::settle`] and [`Tour::sync`].
//!
//! # Usage
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//!
//! use waymark_core::{
//!     host::{HeadlessHost, HeadlessTarget},
//!     EventType, Step, TourBuilder,
//! };
//!
//! let host = Arc::new(
//!     HeadlessHost::new()
//!         .with_target("#a", HeadlessTarget::at(100.0, 0.0))
//!         .with_target("#b", HeadlessTarget::at(900.0, 0.0)),
//! );
//!
//! let events = Arc::new(Mutex::new(Vec::new()));
//! let sink = events.clone();
//!
//! let mut tour = TourBuilder::new()
//!     .with_steps(vec![Step::new("#a", "First"), Step::new("#b", "Second")])
//!     .with_callback(move |event| sink.lock().unwrap().push(event.kind))
//!     .mount(host);
//!
//! tour.next();
//! tour.next();
//!
//! assert_eq!(
//!     *events.lock().unwrap(),
//!     vec![EventType::TourStart, EventType::TourEnd]
//! );
//! ```


use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard, PoisonError, TryLockError, Weak,
    },
};

use log::{debug, info, warn};
use tokio::{
    sync::mpsc::{self, UnboundedReceiver},
    task::JoinHandle,
};

use crate::{
    host::{Host, Key, KeyListener, KeyListenerGuard},
    models::{
        Action, EventType, Lifecycle, MergedStep, PopperData, PopperKind, PopperSlot, StateChange,
        StatePatch, TourEvent, TourState, TourStatus,
    },
    options::TourOptions,
    scroll::{PresentationTrail, ScrollContext, ScrollPlan},
    store::{Store, StoreOptions, Subscription},
    validation::validate_steps,
};

pub mod builder;

#[cfg(test)]
mod tests;

pub use builder::TourBuilder;

/// Receives one [`TourEvent`] per status change.
pub type Callback = Box<dyn FnMut(&TourEvent) + Send>;

/// A mounted tour.
pub struct Tour {
    store: Store,
    host: Arc<dyn Host>,
    options: TourOptions,
    shared: Arc<Shared>,
    subscription: Option<Subscription>,
    keyboard: Option<KeyListenerGuard>,
}

/// Controller state reachable from both the [`Tour`] and the Escape handler.
struct Shared {
    controller: Mutex<Controller>,
    /// Notifications were queued while the controller was locked
    pending: AtomicBool,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Controller> {
        self.controller.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Handles every queued notification, or leaves them to the thread that
    /// currently holds the controller.
    fn drive(&self) {
        self.pending.store(true, Ordering::SeqCst);

        loop {
            let mut controller = match self.controller.try_lock() {
                Ok(controller) => controller,
                Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
                Err(TryLockError::WouldBlock) => return,
            };

            self.pending.store(false, Ordering::SeqCst);
            controller.pump();
            drop(controller);

            if !self.pending.load(Ordering::SeqCst) {
                return;
            }
        }
    }
}

/// Turns store notifications into callback events, popper cache resets and
/// scrolls.
struct Controller {
    store: Store,
    options: TourOptions,
    host: Arc<dyn Host>,
    callback: Option<Callback>,
    /// Last state handled
    state: TourState,
    notifications: UnboundedReceiver<TourState>,
    beacon_popper: PopperSlot,
    tooltip_popper: PopperSlot,
    trail: PresentationTrail,
    scroll_tasks: Vec<JoinHandle<()>>,
}

impl Tour {
    /// Creates the store, subscribes to it, starts the tour when asked to and
    /// registers the Escape handler.
    pub(crate) fn mount(options: TourOptions, host: Arc<dyn Host>, callback: Option<Callback>) -> Self {
        let steps = if validate_steps(&options.steps) {
            options.steps.clone()
        } else {
            Vec::new()
        };

        let store = Store::new(StoreOptions {
            steps,
            start_index: options.step_index,
        });

        let (sender, notifications) = mpsc::unbounded_channel();
        let subscription = store.add_listener(move |state| {
            // The receiver only goes away together with the tour.
            let _ = sender.send(*state);
        });

        let controller = Controller {
            store: store.clone(),
            options: options.clone(),
            host: host.clone(),
            callback,
            state: store.state(),
            notifications,
            beacon_popper: PopperSlot::Unset,
            tooltip_popper: PopperSlot::Unset,
            trail: PresentationTrail::default(),
            scroll_tasks: Vec::new(),
        };
        controller.trace("init", format_args!("{:?} with {} steps", controller.state, options.steps.len()));

        let mut tour = Self {
            store,
            host,
            options,
            shared: Arc::new(Shared {
                controller: Mutex::new(controller),
                pending: AtomicBool::new(false),
            }),
            subscription: Some(subscription),
            keyboard: None,
        };

        if tour.options.run {
            tour.store.start(tour.options.step_index);
        }

        tour.sync_keyboard();
        tour.pump();
        tour
    }

    /// Last state handled by the controller.
    pub fn state(&self) -> TourState {
        self.shared.lock().state
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn options(&self) -> &TourOptions {
        &self.options
    }

    /// The current step, merged with the tour options.
    pub fn current_step(&self) -> Option<MergedStep> {
        let controller = self.shared.lock();
        controller.merged_step(controller.state.index)
    }

    pub fn popper(&self, kind: PopperKind) -> PopperSlot {
        let controller = self.shared.lock();
        match kind {
            PopperKind::Beacon => controller.beacon_popper,
            PopperKind::Tooltip => controller.tooltip_popper,
        }
    }

    /// Caches where the renderer placed the beacon or tooltip.
    pub fn set_popper(&mut self, kind: PopperKind, data: PopperData) {
        let mut controller = self.shared.lock();
        match kind {
            PopperKind::Beacon => controller.beacon_popper.set(data),
            PopperKind::Tooltip => controller.tooltip_popper.set(data),
        }
    }

    /// Applies a configuration change.
    ///
    /// Flipping `run` starts or stops the tour, new steps replace the old
    /// ones when they validate, and a changed `step_index` moves a
    /// controlled tour unless it already ended.
    pub fn set_options(&mut self, mut next: TourOptions) {
        if next == self.options {
            return;
        }

        let state = self.store.state();
        let run_changed = next.run != self.options.run;
        let steps_changed = next.steps != self.options.steps;
        let index_changed = next.step_index.is_some() && next.step_index != self.options.step_index;

        let steps_valid = !steps_changed || validate_steps(&next.steps);
        if !steps_valid {
            warn!("Steps are not valid, keeping the current ones");
            next.steps = self.options.steps.clone();
        }

        {
            let mut controller = self.shared.lock();
            controller.trace("options", format_args!("{next:?}"));
            controller.options = next.clone();
        }
        let previous = std::mem::replace(&mut self.options, next);
        self.sync_keyboard();

        if run_changed {
            if self.options.run {
                self.store.start(self.options.step_index);
            } else {
                self.store.stop(false);
            }
        }

        if steps_changed && steps_valid {
            self.store.set_steps(self.options.steps.clone());
        }

        if let (true, Some(index)) = (index_changed, self.options.step_index) {
            if state.status.is_terminal() {
                debug!("step index change ignored: tour is {}", state.status.as_str());
            } else {
                let action = match state.action {
                    Action::Stop => Action::Start,
                    Action::Close => Action::Close,
                    _ if index > previous.step_index.unwrap_or(0) => Action::Next,
                    _ => Action::Prev,
                };

                self.store.update(
                    StatePatch::new()
                        .action(action)
                        .index(index)
                        .lifecycle(Lifecycle::Init),
                );
            }
        }

        self.pump();
    }

    pub fn start(&mut self) {
        self.store.start(self.options.step_index);
        self.pump();
    }

    pub fn stop(&mut self, advance: bool) {
        self.store.stop(advance);
        self.pump();
    }

    pub fn next(&mut self) {
        self.store.next();
        self.pump();
    }

    pub fn prev(&mut self) {
        self.store.prev();
        self.pump();
    }

    pub fn go(&mut self, index: usize) {
        self.store.go(index);
        self.pump();
    }

    pub fn close(&mut self) {
        self.store.close();
        self.pump();
    }

    pub fn skip(&mut self) {
        self.store.skip();
        self.pump();
    }

    pub fn open(&mut self) {
        self.store.open();
        self.pump();
    }

    pub fn reset(&mut self, everything: bool) {
        self.store.reset(everything);
        self.pump();
    }

    /// Lets the renderer move the lifecycle (or anything else) forward.
    pub fn update(&mut self, patch: StatePatch) {
        self.store.update(patch);
        self.pump();
    }

    pub fn info(&self) -> TourState {
        self.store.info()
    }

    /// Handles state changes raised through the store directly.
    pub fn sync(&mut self) {
        self.pump();
    }

    /// Waits for every in-flight scroll and handles what they changed.
    pub async fn settle(&mut self) {
        loop {
            let tasks = std::mem::take(&mut self.shared.lock().scroll_tasks);
            if tasks.is_empty() {
                break;
            }

            for handle in tasks {
                if let Err(e) = handle.await {
                    warn!("scroll task failed: {e}");
                }
            }
            self.pump();
        }
        self.pump();
    }

    /// Releases the keyboard listener and the store subscription.
    pub fn unmount(&mut self) {
        if let Some(keyboard) = self.keyboard.take() {
            keyboard.release();
        }
        self.subscription = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// Registers the Escape handler unless the tour opts out of it.
    fn sync_keyboard(&mut self) {
        if !self.is_mounted() {
            return;
        }

        match (self.options.disable_close_on_esc, self.keyboard.take()) {
            (true, Some(keyboard)) => keyboard.release(),
            (false, None) => {
                let store = self.store.clone();
                let shared = Arc::downgrade(&self.shared);
                let listener: KeyListener = Arc::new(move |key| close_on_escape(&store, &shared, key));
                self.keyboard = Some(KeyListenerGuard::register(self.host.clone(), listener));
            }
            (_, keyboard) => self.keyboard = keyboard,
        }
    }

    fn pump(&mut self) {
        self.shared.drive();
    }
}

impl Controller {
    fn pump(&mut self) {
        while let Ok(next) = self.notifications.try_recv() {
            let previous = std::mem::replace(&mut self.state, next);
            self.did_update(&previous, &next);
        }
        self.scroll_tasks.retain(|handle| !handle.is_finished());
    }

    fn did_update(&mut self, previous: &TourState, current: &TourState) {
        let change = StateChange::new(previous, current);
        if !change.any() {
            return;
        }

        let step = self.merged_step(current.index);
        self.trace(
            "state",
            format_args!(
                "{} / {} / {} at {}",
                current.status.as_str(),
                current.lifecycle.as_str(),
                current.action.as_str(),
                current.index
            ),
        );

        if change.status_changed() {
            self.on_status_change(&change, step.clone());
        }

        if change.entered_presentation() {
            self.trail.record(current.index);
        }

        if let Some(step) = &step {
            self.scroll_to_step(&change, step);

            if step.is_centered()
                && current.status == TourStatus::Running
                && current.lifecycle == Lifecycle::Init
            {
                self.store.update(StatePatch::new().lifecycle(Lifecycle::Ready));
            }
        }

        if change.lifecycle_changed_to(Lifecycle::Init) {
            self.beacon_popper.clear();
            self.tooltip_popper.clear();
        }
    }

    fn on_status_change(&mut self, change: &StateChange<'_>, step: Option<MergedStep>) {
        let current = change.current;

        let (kind, step) = if change.status_changed_to(TourStatus::Finished)
            || change.status_changed_to(TourStatus::Skipped)
        {
            // Report the last step that was shown, not the index past it.
            (EventType::TourEnd, self.merged_step(change.previous.index))
        } else if change.status_changed_from_to(TourStatus::Ready, TourStatus::Running) {
            (EventType::TourStart, step)
        } else {
            (EventType::TourStatus, step)
        };

        if matches!(
            current.status,
            TourStatus::Finished | TourStatus::Skipped | TourStatus::Ready | TourStatus::Idle
        ) {
            self.trail.clear();
        }

        let event = TourEvent::new(kind, current, step);
        if let Some(callback) = self.callback.as_mut() {
            callback(&event);
        }
    }

    fn scroll_to_step(&mut self, change: &StateChange<'_>, step: &MergedStep) {
        let plan = {
            let ctx = ScrollContext {
                change: *change,
                step,
                options: &self.options,
                previous_index: self.trail.previous(),
                beacon: &self.beacon_popper,
                tooltip: &self.tooltip_popper,
            };
            ScrollPlan::for_change(&ctx, self.host.as_ref())
        };

        let Some(plan) = plan else {
            return;
        };

        self.trace("scroll", format_args!("{plan:?} for step {}", change.current.index));

        if let Some(handle) = plan.execute(&self.host, &self.store) {
            self.scroll_tasks.push(handle);
        }
    }

    fn merged_step(&self, index: usize) -> Option<MergedStep> {
        self.store
            .step(index)
            .map(|step| self.options.merge_step(&step))
    }

    fn trace(&self, title: &str, detail: fmt::Arguments<'_>) {
        if self.options.debug {
            info!("waymark {title}: {detail}");
        } else {
            debug!("waymark {title}: {detail}");
        }
    }
}

impl fmt::Debug for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let controller = self.shared.lock();
        f.debug_struct("Tour")
            .field("state", &controller.state)
            .field("options", &self.options)
            .field("beacon_popper", &controller.beacon_popper)
            .field("tooltip_popper", &controller.tooltip_popper)
            .field("mounted", &self.is_mounted())
            .finish_non_exhaustive()
    }
}

/// Escape closes an open tooltip unless the step opts out, then the
/// controller handles the close.
fn close_on_escape(store: &Store, shared: &Weak<Shared>, key: Key) {
    if key != Key::Escape {
        return;
    }

    let state = store.state();
    if state.lifecycle != Lifecycle::Tooltip {
        return;
    }

    let closable = store
        .step(state.index)
        .is_some_and(|step| !step.disable_close_on_esc.unwrap_or(false));
    if !closable {
        return;
    }

    store.close();
    if let Some(shared) = shared.upgrade() {
        shared.drive();
    }
}
