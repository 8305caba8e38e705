use std::sync::{Arc, Mutex};

use waymark_core::{
    host::{HeadlessHost, HeadlessTarget},
    Step, TourBuilder, TourEvent,
};

pub type Events = Arc<Mutex<Vec<TourEvent>>>;

/// Three steps stacked down a long page.
pub fn sample_steps() -> Vec<Step> {
    vec![
        Step::new("#search", "Find anything from here").with_title("Search"),
        Step::new("#projects", "Everything you are working on"),
        Step::new("#profile", "Your settings"),
    ]
}

/// Headless page holding every target of [`sample_steps`].
pub fn sample_page() -> Arc<HeadlessHost> {
    Arc::new(
        HeadlessHost::new()
            .with_target("#search", HeadlessTarget::at(100.0, 0.0))
            .with_target("#projects", HeadlessTarget::at(1200.0, 40.0))
            .with_target("#profile", HeadlessTarget::at(2400.0, 0.0)),
    )
}

/// Adds a callback that stores every event.
pub fn recording(builder: TourBuilder) -> (TourBuilder, Events) {
    let events: Events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let builder = builder.with_callback(move |event| {
        sink.lock().expect("event log poisoned").push(event.clone());
    });
    (builder, events)
}
