//! Tests for the tour controller.

use std::sync::{Arc, Mutex, PoisonError};

use futures::future::FutureExt;
use tokio::sync::oneshot;

use super::*;
use crate::{
    host::{
        headless::PAGE, Axis, HeadlessHost, HeadlessTarget, ScrollCall, ScrollFuture,
        ScrollParent, TargetHandle,
    },
    models::{Placement, PopperPlacement, PopperRect, Step},
};

type Events = Arc<Mutex<Vec<TourEvent>>>;

fn steps() -> Vec<Step> {
    vec![
        Step::new("#a", "First"),
        Step::new("#b", "Second"),
        Step::new("#c", "Third"),
    ]
}

fn page() -> Arc<HeadlessHost> {
    Arc::new(
        HeadlessHost::new()
            .with_target("#a", HeadlessTarget::at(100.0, 0.0))
            .with_target("#b", HeadlessTarget::at(900.0, 0.0))
            .with_target("#c", HeadlessTarget::at(1600.0, 0.0)),
    )
}

fn recording(builder: TourBuilder, host: Arc<HeadlessHost>) -> (Tour, Events) {
    let events: Events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let tour = builder
        .with_callback(move |event| sink.lock().unwrap().push(event.clone()))
        .mount(host);
    (tour, events)
}

fn kinds(events: &Events) -> Vec<EventType> {
    events.lock().unwrap().iter().map(|e| e.kind).collect()
}

fn popper_data() -> PopperData {
    PopperData {
        placement: PopperPlacement::Top,
        flipped: false,
        popper: PopperRect {
            top: 10.0,
            left: 10.0,
            bottom: 90.0,
            right: 210.0,
        },
    }
}

#[test]
fn test_mount_starts_and_reports_tour_start() {
    let (tour, events) = recording(TourBuilder::new().with_steps(steps()), page());

    let state = tour.state();
    assert_eq!(state.status, TourStatus::Running);
    assert_eq!(state.action, Action::Start);
    assert_eq!(state.index, 0);
    assert_eq!(state.lifecycle, Lifecycle::Init);

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, EventType::TourStart);
    assert_eq!(events[0].step.as_ref().unwrap().target, "#a");
}

#[test]
fn test_mount_without_run_stays_ready() {
    let (tour, events) = recording(TourBuilder::new().with_steps(steps()).with_run(false), page());

    assert_eq!(tour.state().status, TourStatus::Ready);
    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn test_tour_end_reports_last_visited_step() {
    let (mut tour, events) = recording(TourBuilder::new().with_steps(steps()), page());

    tour.next();
    tour.next();
    tour.next();

    assert_eq!(tour.state().status, TourStatus::Finished);
    assert_eq!(kinds(&events), vec![EventType::TourStart, EventType::TourEnd]);

    let events = events.lock().unwrap();
    let end = &events[1];
    assert_eq!(end.index, 3);
    assert_eq!(end.step.as_ref().unwrap().target, "#c");
}

#[test]
fn test_skip_and_stop_events() {
    let (mut tour, events) = recording(TourBuilder::new().with_steps(steps()), page());

    tour.stop(false);
    tour.start();
    tour.skip();

    assert_eq!(
        kinds(&events),
        vec![
            EventType::TourStart,
            EventType::TourStatus,
            EventType::TourStatus,
            EventType::TourEnd,
        ]
    );
    assert_eq!(events.lock().unwrap()[3].status, TourStatus::Skipped);
}

#[test]
fn test_centered_step_goes_straight_to_ready() {
    let steps = vec![
        Step::new("body", "Welcome").with_placement(Placement::Center),
        Step::new("#a", "First"),
    ];
    let (mut tour, _) = recording(TourBuilder::new().with_steps(steps), page());

    assert_eq!(tour.state().lifecycle, Lifecycle::Ready);
    assert_eq!(tour.store().state().lifecycle, Lifecycle::Ready);

    tour.next();
    assert_eq!(tour.state().index, 1);
    assert_eq!(tour.state().lifecycle, Lifecycle::Init);
}

#[test]
fn test_popper_cache_cleared_on_new_step() {
    let (mut tour, _) = recording(TourBuilder::new().with_steps(steps()), page());

    tour.update(StatePatch::new().lifecycle(Lifecycle::Tooltip));
    tour.set_popper(PopperKind::Beacon, popper_data());
    tour.set_popper(PopperKind::Tooltip, popper_data());
    assert!(tour.popper(PopperKind::Tooltip).is_known());

    tour.next();

    assert!(!tour.popper(PopperKind::Beacon).is_known());
    assert!(!tour.popper(PopperKind::Tooltip).is_known());
}

#[test]
fn test_escape_closes_open_tooltip() {
    let host = page();
    let (mut tour, _) = recording(TourBuilder::new().with_steps(steps()), host.clone());
    assert_eq!(host.listener_count(), 1);

    host.press(Key::Escape);
    assert_eq!(tour.state().index, 0, "escape only closes an open tooltip");

    tour.update(StatePatch::new().lifecycle(Lifecycle::Tooltip));
    host.press(Key::Enter);
    assert_eq!(tour.state().lifecycle, Lifecycle::Tooltip);

    host.press(Key::Escape);

    let state = tour.state();
    assert_eq!(state.action, Action::Close);
    assert_eq!(state.index, 1);
    assert_eq!(state.lifecycle, Lifecycle::Init);
}

#[test]
fn test_escape_on_last_step_ends_tour() {
    let host = page();
    let (mut tour, events) = recording(
        TourBuilder::new().with_steps(vec![Step::new("#a", "Only")]),
        host.clone(),
    );
    tour.update(StatePatch::new().lifecycle(Lifecycle::Tooltip));

    host.press(Key::Escape);

    assert_eq!(kinds(&events), vec![EventType::TourStart, EventType::TourEnd]);
    assert_eq!(tour.state().status, TourStatus::Finished);

    let last = events.lock().unwrap()[1].clone();
    assert_eq!(last.step.map(|step| step.target), Some("#a".to_string()));
}

#[test]
fn test_escape_from_another_thread_is_handled() {
    let host = page();
    let (mut tour, events) = recording(TourBuilder::new().with_steps(steps()), host.clone());
    tour.go(2);
    tour.update(StatePatch::new().lifecycle(Lifecycle::Tooltip));

    let remote = host.clone();
    std::thread::spawn(move || remote.press(Key::Escape))
        .join()
        .unwrap();

    assert_eq!(kinds(&events), vec![EventType::TourStart, EventType::TourEnd]);
    assert_eq!(tour.state().status, TourStatus::Finished);
}

#[test]
fn test_callback_may_press_escape() {
    let host = page();
    let remote = host.clone();
    let events: Events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();

    let mut tour = TourBuilder::new()
        .with_steps(vec![Step::new("#a", "Only")])
        .with_callback(move |event| {
            sink.lock().unwrap().push(event.clone());
            if event.kind == EventType::TourStatus {
                remote.press(Key::Escape);
            }
        })
        .mount(host);

    tour.update(StatePatch::new().lifecycle(Lifecycle::Tooltip));

    // Escape while paused is ignored; once running again it ends the tour
    // from inside the callback.
    tour.update(StatePatch::new().status(TourStatus::Paused));
    tour.update(StatePatch::new().status(TourStatus::Running));

    assert_eq!(
        kinds(&events),
        vec![
            EventType::TourStart,
            EventType::TourStatus,
            EventType::TourStatus,
            EventType::TourEnd
        ]
    );
    assert_eq!(tour.state().status, TourStatus::Finished);
}

#[test]
fn test_step_can_opt_out_of_escape() {
    let host = page();
    let mut pinned = Step::new("#a", "First");
    pinned.disable_close_on_esc = Some(true);
    let (mut tour, _) = recording(
        TourBuilder::new().with_steps(vec![pinned, Step::new("#b", "Second")]),
        host.clone(),
    );

    tour.update(StatePatch::new().lifecycle(Lifecycle::Tooltip));
    host.press(Key::Escape);

    assert_eq!(tour.state().index, 0);
    assert_eq!(tour.state().lifecycle, Lifecycle::Tooltip);
}

#[test]
fn test_tour_level_escape_opt_out() {
    let host = page();
    let options = TourOptions {
        disable_close_on_esc: true,
        ..TourOptions::with_steps(steps())
    };
    let (mut tour, _) = recording(TourBuilder::new().with_options(options.clone()), host.clone());
    assert_eq!(host.listener_count(), 0);

    tour.set_options(TourOptions {
        disable_close_on_esc: false,
        ..options
    });
    assert_eq!(host.listener_count(), 1);
}

#[test]
fn test_set_options_run_flip() {
    let options = TourOptions {
        run: false,
        ..TourOptions::with_steps(steps())
    };
    let (mut tour, events) = recording(TourBuilder::new().with_options(options.clone()), page());

    tour.set_options(TourOptions {
        run: true,
        ..options.clone()
    });
    assert_eq!(tour.state().status, TourStatus::Running);

    tour.set_options(options);
    assert_eq!(tour.state().status, TourStatus::Paused);
    assert_eq!(tour.state().action, Action::Stop);

    assert_eq!(kinds(&events), vec![EventType::TourStart, EventType::TourStatus]);
}

#[test]
fn test_set_options_keeps_steps_when_invalid() {
    let (mut tour, _) = recording(TourBuilder::new().with_steps(steps()), page());

    tour.set_options(TourOptions::with_steps(vec![Step::new("", "Nowhere")]));

    assert_eq!(tour.options().steps, steps());
    assert_eq!(tour.store().steps(), steps());
    assert_eq!(tour.state().size, 3);
}

#[test]
fn test_set_options_replaces_valid_steps() {
    let (mut tour, _) = recording(TourBuilder::new().with_steps(steps()), page());

    let mut more = steps();
    more.push(Step::new("#d", "Fourth"));
    tour.set_options(TourOptions::with_steps(more.clone()));

    assert_eq!(tour.store().steps(), more);
    assert_eq!(tour.state().size, 4);
    assert_eq!(tour.state().status, TourStatus::Running);
}

#[test]
fn test_set_options_without_steps_stops_presenting() {
    let (mut tour, events) = recording(TourBuilder::new().with_steps(steps()), page());

    tour.set_options(TourOptions::with_steps(Vec::new()));

    let state = tour.state();
    assert_eq!(state.status, TourStatus::Idle);
    assert_eq!(state.size, 0);
    assert!(tour.current_step().is_none());
    assert_eq!(kinds(&events), vec![EventType::TourStart, EventType::TourStatus]);

    tour.set_options(TourOptions::with_steps(steps()));
    assert_eq!(tour.state().status, TourStatus::Running);
    assert_eq!(tour.state().index, 0);
}

#[test]
fn test_start_waits_for_valid_steps() {
    let (mut tour, events) = recording(
        TourBuilder::new().with_steps(vec![Step::new("#a", "")]),
        page(),
    );

    assert_eq!(tour.state().status, TourStatus::Idle);
    assert_eq!(tour.state().size, 0);
    // Steps come from the store, which never loaded the invalid ones.
    assert_eq!(tour.options().steps.len(), 1);
    assert!(tour.current_step().is_none());

    tour.set_options(TourOptions::with_steps(steps()));

    assert_eq!(tour.state().status, TourStatus::Running);
    assert_eq!(tour.state().index, 0);
    assert_eq!(kinds(&events), vec![EventType::TourStatus, EventType::TourStart]);
}

#[test]
fn test_controlled_index_changes() {
    let (mut tour, _) = recording(
        TourBuilder::new().with_steps(steps()).with_step_index(0),
        page(),
    );
    let controlled = tour.options().clone();
    assert!(tour.state().controlled);

    tour.next();
    assert_eq!(tour.state().index, 0, "navigation belongs to the application");

    tour.set_options(TourOptions {
        step_index: Some(2),
        ..controlled.clone()
    });
    assert_eq!(tour.state().index, 2);
    assert_eq!(tour.state().action, Action::Next);

    tour.set_options(TourOptions {
        step_index: Some(1),
        ..controlled.clone()
    });
    assert_eq!(tour.state().index, 1);
    assert_eq!(tour.state().action, Action::Prev);

    tour.stop(false);
    tour.set_options(TourOptions {
        step_index: Some(2),
        ..controlled
    });
    assert_eq!(tour.state().index, 2);
    assert_eq!(tour.state().action, Action::Start);
    assert_eq!(tour.state().lifecycle, Lifecycle::Init);
}

#[test]
fn test_controlled_close_keeps_index_until_last_step() {
    let (mut tour, events) = recording(
        TourBuilder::new().with_steps(steps()).with_step_index(1),
        page(),
    );
    let controlled = tour.options().clone();

    tour.close();
    assert_eq!(tour.state().index, 1);
    assert_eq!(tour.state().action, Action::Close);

    tour.set_options(TourOptions {
        step_index: Some(2),
        ..controlled.clone()
    });
    assert_eq!(tour.state().action, Action::Close);

    tour.close();
    assert_eq!(tour.state().status, TourStatus::Finished);
    assert_eq!(kinds(&events).last(), Some(&EventType::TourEnd));

    tour.set_options(TourOptions {
        step_index: Some(0),
        ..controlled
    });
    assert_eq!(tour.state().status, TourStatus::Finished);
    assert_eq!(tour.state().index, 3);
}

#[tokio::test]
async fn test_scrolls_when_moving_to_another_step() {
    let host = page();
    let (mut tour, _) = recording(TourBuilder::new().with_steps(steps()), host.clone());

    tour.update(StatePatch::new().lifecycle(Lifecycle::Tooltip));
    tour.settle().await;
    assert!(host.scrolls().is_empty(), "first step needs scroll_to_first_step");

    tour.next();
    tour.update(StatePatch::new().lifecycle(Lifecycle::Beacon));
    tour.settle().await;

    assert_eq!(
        host.scrolls(),
        vec![ScrollCall {
            parent: PAGE,
            offset: 880,
            axis: Axis::Y,
        }]
    );
    assert!(!tour.state().scrolling);

    tour.update(StatePatch::new().lifecycle(Lifecycle::Tooltip));
    tour.settle().await;
    assert_eq!(host.scrolls().len(), 2, "tooltip realigns the same step");

    tour.update(StatePatch::new().lifecycle(Lifecycle::Tooltip));
    tour.settle().await;
    assert_eq!(host.scrolls().len(), 2, "no lifecycle edge, no scroll");
}

#[tokio::test]
async fn test_disable_scrolling_never_scrolls() {
    let host = page();
    let options = TourOptions {
        disable_scrolling: true,
        scroll_to_first_step: true,
        ..TourOptions::with_steps(steps())
    };
    let (mut tour, _) = recording(TourBuilder::new().with_options(options), host.clone());

    tour.update(StatePatch::new().lifecycle(Lifecycle::Tooltip));
    tour.next();
    tour.update(StatePatch::new().lifecycle(Lifecycle::Beacon));
    tour.settle().await;

    assert!(host.scrolls().is_empty());
    assert!(!tour.state().scrolling);
}

/// Host whose scrolls complete only when the test lets them.
#[derive(Default)]
struct GatedHost {
    gates: Mutex<Vec<oneshot::Sender<()>>>,
}

impl GatedHost {
    fn pending(&self) -> usize {
        self.lock().len()
    }

    fn release_one(&self) {
        let gate = self.lock().remove(0);
        let _ = gate.send(());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<oneshot::Sender<()>>> {
        self.gates.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Host for GatedHost {
    fn find_target(&self, _selector: &str) -> Option<TargetHandle> {
        Some(TargetHandle(7))
    }

    fn is_fixed(&self, _target: TargetHandle) -> bool {
        false
    }

    fn has_custom_scroll_parent(&self, _target: TargetHandle) -> bool {
        false
    }

    fn scroll_parent(&self, _target: TargetHandle) -> ScrollParent {
        PAGE
    }

    fn offset_into_view(&self, _target: TargetHandle, margin: f64, axis: Axis) -> f64 {
        match axis {
            Axis::Y => 500.0 - margin,
            Axis::X => 300.0 - margin,
        }
    }

    fn scroll_to(&self, _parent: ScrollParent, _offset: u64, _axis: Axis) -> ScrollFuture {
        let (sender, receiver) = oneshot::channel();
        self.lock().push(sender);
        async move {
            let _ = receiver.await;
        }
        .boxed()
    }

    fn add_key_listener(&self, _listener: KeyListener) -> crate::host::KeyListenerId {
        crate::host::KeyListenerId(0)
    }

    fn remove_key_listener(&self, _id: crate::host::KeyListenerId) {}
}

#[tokio::test]
async fn test_scrolling_flag_waits_for_every_axis() {
    let host = Arc::new(GatedHost::default());
    let options = TourOptions {
        enable_scroll_x: true,
        scroll_to_first_step: true,
        ..TourOptions::with_steps(steps())
    };
    let mut tour = TourBuilder::new().with_options(options).mount(host.clone());

    tour.update(StatePatch::new().lifecycle(Lifecycle::Beacon));
    assert_eq!(host.pending(), 2);
    assert!(tour.state().scrolling);

    host.release_one();
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
    tour.sync();
    assert!(tour.store().state().scrolling, "one axis is still moving");

    host.release_one();
    tour.settle().await;

    assert!(!tour.store().state().scrolling);
    assert!(!tour.state().scrolling);
}

#[test]
fn test_unmount_releases_listeners() {
    let host = page();
    let (mut tour, events) = recording(TourBuilder::new().with_steps(steps()), host.clone());
    assert!(tour.is_mounted());
    assert_eq!(tour.store().listener_count(), 1);

    tour.unmount();

    assert!(!tour.is_mounted());
    assert_eq!(host.listener_count(), 0);
    assert_eq!(tour.store().listener_count(), 0);

    tour.skip();
    assert_eq!(kinds(&events), vec![EventType::TourStart]);
}

#[test]
fn test_reset_everything_restores_mounted_steps() {
    let (mut tour, _) = recording(TourBuilder::new().with_steps(steps()), page());

    tour.set_options(TourOptions::with_steps(vec![Step::new("#z", "Only")]));
    assert_eq!(tour.state().size, 1);

    tour.reset(true);

    let state = tour.state();
    assert_eq!(state.status, TourStatus::Ready);
    assert_eq!(state.action, Action::Reset);
    assert_eq!(state.size, 3);
}
