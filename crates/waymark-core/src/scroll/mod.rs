//! Scroll synchronization for the presented step.
//!
//! Deciding whether to scroll and where to is pure: [`should_scroll`] and
//! [`compute_offsets`] only look at the state change, the merged step, the
//! tour options, the cached popper metadata and a few host measurements.
//! [`ScrollPlan::execute`] then performs the scroll through the [`Host`],
//! raising the store's `scrolling` flag for as long as any issued scroll is
//! in flight.
//!
//! ```text
//!  state change ──▶ should_scroll ──▶ measure ──▶ compute_offsets ──▶ ScrollPlan
//!                                                                        │
//!        store.set_scrolling(false) ◀── join_all(scroll_to…) ◀── execute ┘
//! ```

use std::sync::Arc;

use futures::future::join_all;
use log::{debug, warn};
use tokio::task::JoinHandle;

use crate::{
    host::{Axis, Host, ScrollFuture, ScrollParent, TargetHandle},
    models::{Lifecycle, MergedStep, PopperPlacement, PopperSlot, StateChange, TourStatus},
    options::TourOptions,
    store::Store,
};


/// Indices of the step being presented and the one presented before it.
///
/// The controller records every lifecycle edge into beacon or tooltip here
/// so the predicate can tell a new step from the first one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresentationTrail {
    current: Option<usize>,
    previous: Option<usize>,
}

impl PresentationTrail {
    pub fn record(&mut self, index: usize) {
        if self.current != Some(index) {
            self.previous = self.current;
            self.current = Some(index);
        }
    }

    /// Index presented before the current step.
    pub fn previous(&self) -> Option<usize> {
        self.previous
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Everything the scroll decision depends on, besides the host.
#[derive(Debug, Clone, Copy)]
pub struct ScrollContext<'a> {
    pub change: StateChange<'a>,
    pub step: &'a MergedStep,
    pub options: &'a TourOptions,

    /// Index presented before the current one, if any
    pub previous_index: Option<usize>,

    pub beacon: &'a PopperSlot,
    pub tooltip: &'a PopperSlot,
}

/// Host measurements for the resolved target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurements {
    /// Generic into-view offset on the vertical axis
    pub y: f64,
    /// Generic into-view offset on the horizontal axis
    pub x: f64,
    pub custom_scroll_parent: bool,
}

impl Measurements {
    pub fn take(host: &dyn Host, target: TargetHandle, margin: f64) -> Self {
        Self {
            y: host.offset_into_view(target, margin, Axis::Y),
            x: host.offset_into_view(target, margin, Axis::X),
            custom_scroll_parent: host.has_custom_scroll_parent(target),
        }
    }
}

/// Computed offsets; negative values mean the target is already in view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offsets {
    pub y: i64,
    /// Only computed when horizontal scrolling is enabled
    pub x: Option<i64>,
}

/// Whether the current state change should scroll its step into view.
///
/// Every condition must hold:
/// - scrolling is enabled both for the tour and for the step
/// - the step is not pinned, or its target is not fixed-positioned
/// - the lifecycle just moved into beacon or tooltip
/// - this is the first step with `scroll_to_first_step` set, or a different
///   step than the one presented before
pub fn should_scroll(ctx: &ScrollContext<'_>, target_is_fixed: bool) -> bool {
    let current = ctx.change.current;

    let first_step_allowed = match ctx.previous_index {
        Some(previous) => previous != current.index,
        None => ctx.options.scroll_to_first_step,
    };

    !ctx.options.disable_scrolling
        && !ctx.step.disable_scrolling
        && (!ctx.step.is_fixed || !target_is_fixed)
        && ctx.change.entered_presentation()
        && first_step_allowed
}

/// Computes the scroll offset per axis for the current lifecycle.
pub fn compute_offsets(ctx: &ScrollContext<'_>, measured: &Measurements) -> Offsets {
    let margin = ctx.options.scroll_offset;
    let padding = ctx.step.spotlight_padding;
    let scroll_x = ctx.options.enable_scroll_x;
    let custom = measured.custom_scroll_parent;

    let mut y = floor(measured.y);
    let mut x = scroll_x.then(|| floor(measured.x));

    match ctx.change.current.lifecycle {
        Lifecycle::Beacon => {
            if let (Some(data), false) = (ctx.beacon.known(), custom) {
                if data.placement != PopperPlacement::Bottom {
                    y = floor(data.popper.top - margin);
                }
                if scroll_x && data.placement != PopperPlacement::Right {
                    x = Some(floor(data.popper.left - margin));
                }
            }
        }
        Lifecycle::Tooltip => {
            if let Some(data) = ctx.tooltip.known() {
                let anchored = !data.flipped && !custom;

                if anchored
                    && matches!(data.placement, PopperPlacement::Top | PopperPlacement::Right)
                {
                    y = floor(data.popper.top - margin);
                } else {
                    y = without_padding(y, padding);
                }

                if let Some(current) = x {
                    x = Some(
                        if anchored
                            && matches!(
                                data.placement,
                                PopperPlacement::Left | PopperPlacement::Top
                            )
                        {
                            floor(data.popper.left - margin)
                        } else {
                            without_padding(current, padding)
                        },
                    );
                }
            }
        }
        Lifecycle::Init | Lifecycle::Ready => {}
    }

    Offsets { y, x }
}

/// Subtracts the spotlight padding unless that would go negative.
fn without_padding(offset: i64, padding: f64) -> i64 {
    let reduced = floor(offset as f64 - padding);
    if reduced >= 0 {
        reduced
    } else {
        offset
    }
}

fn floor(value: f64) -> i64 {
    value.floor() as i64
}

/// Scrolls to issue for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollPlan {
    pub parent: ScrollParent,
    pub y: Option<u64>,
    pub x: Option<u64>,
}

impl ScrollPlan {
    /// Keeps only the non-negative offsets.
    pub fn new(parent: ScrollParent, offsets: Offsets) -> Self {
        Self {
            parent,
            y: u64::try_from(offsets.y).ok(),
            x: offsets.x.and_then(|x| u64::try_from(x).ok()),
        }
    }

    /// Resolves the target and builds the plan, if the change calls for one.
    pub fn for_change(ctx: &ScrollContext<'_>, host: &dyn Host) -> Option<Self> {
        if ctx.change.current.status != TourStatus::Running {
            return None;
        }

        let Some(target) = host.find_target(&ctx.step.target) else {
            debug!("scroll skipped: target {} not found", ctx.step.target);
            return None;
        };

        if !should_scroll(ctx, host.is_fixed(target)) {
            return None;
        }

        let measured = Measurements::take(host, target, ctx.options.scroll_offset);
        let offsets = compute_offsets(ctx, &measured);
        Some(Self::new(host.scroll_parent(target), offsets))
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_none() && self.x.is_none()
    }

    pub fn requests(&self) -> impl Iterator<Item = (u64, Axis)> {
        [self.y.map(|y| (y, Axis::Y)), self.x.map(|x| (x, Axis::X))]
            .into_iter()
            .flatten()
    }

    /// Issues the scrolls and clears the scrolling flag once all of them
    /// settled.
    ///
    /// The join runs on the current tokio runtime and its handle is
    /// returned. Without a runtime the scrolls are driven to completion
    /// before returning.
    pub fn execute(self, host: &Arc<dyn Host>, store: &Store) -> Option<JoinHandle<()>> {
        if self.is_empty() {
            return None;
        }

        store.set_scrolling(true);

        let scrolls: Vec<ScrollFuture> = self
            .requests()
            .map(|(offset, axis)| host.scroll_to(self.parent, offset, axis))
            .collect();

        let store = store.clone();
        let settle = async move {
            join_all(scrolls).await;
            store.set_scrolling(false);
        };

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => Some(runtime.spawn(settle)),
            Err(_) => {
                warn!("no async runtime available, scrolling synchronously");
                futures::executor::block_on(settle);
                None
            }
        }
    }
}
