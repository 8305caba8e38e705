//! In-memory [`Host`] used by the CLI simulator and by tests.
//!
//! Targets are placed at fixed page coordinates, every scroll is recorded
//! and resolves immediately, and key presses are delivered synchronously to
//! the registered listeners.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::future::{self, FutureExt};

use super::{
    Axis, Host, Key, KeyListener, KeyListenerId, ScrollFuture, ScrollParent, TargetHandle,
};

/// Id of the page-level scroll parent.
pub const PAGE: ScrollParent = ScrollParent(0);

/// Layout of one target in the headless page.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeadlessTarget {
    pub top: f64,
    pub left: f64,
    pub fixed: bool,

    /// Scrolls inside its own container instead of the page
    pub custom_scroll_parent: bool,
}

impl HeadlessTarget {
    pub fn at(top: f64, left: f64) -> Self {
        Self {
            top,
            left,
            ..Self::default()
        }
    }

    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    pub fn in_container(mut self) -> Self {
        self.custom_scroll_parent = true;
        self
    }
}

/// A recorded [`Host::scroll_to`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollCall {
    pub parent: ScrollParent,
    pub offset: u64,
    pub axis: Axis,
}

#[derive(Default)]
struct HeadlessInner {
    selectors: HashMap<String, TargetHandle>,
    targets: Vec<HeadlessTarget>,
    scrolls: Vec<ScrollCall>,
    listeners: Vec<(KeyListenerId, KeyListener)>,
    next_listener: u64,
}

/// Headless page with a handful of positioned targets.
#[derive(Default)]
pub struct HeadlessHost {
    inner: Mutex<HeadlessInner>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or moves) the target matching `selector`.
    pub fn with_target(self, selector: impl Into<String>, target: HeadlessTarget) -> Self {
        self.place(selector, target);
        self
    }

    pub fn place(&self, selector: impl Into<String>, target: HeadlessTarget) {
        let mut inner = self.lock();
        let selector = selector.into();

        match inner.selectors.get(&selector).copied() {
            Some(handle) => {
                if let Some(slot) = inner.targets.get_mut(handle.0 as usize) {
                    *slot = target;
                }
            }
            None => {
                let handle = TargetHandle(inner.targets.len() as u64);
                inner.targets.push(target);
                inner.selectors.insert(selector, handle);
            }
        }
    }

    /// Every scroll issued so far, oldest first.
    pub fn scrolls(&self) -> Vec<ScrollCall> {
        self.lock().scrolls.clone()
    }

    pub fn clear_scrolls(&self) {
        self.lock().scrolls.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Delivers `key` to every registered listener.
    pub fn press(&self, key: Key) {
        let listeners: Vec<KeyListener> = self
            .lock()
            .listeners
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in listeners {
            listener(key);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HeadlessInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn target(&self, handle: TargetHandle) -> Option<HeadlessTarget> {
        self.lock().targets.get(handle.0 as usize).copied()
    }
}

impl Host for HeadlessHost {
    fn find_target(&self, selector: &str) -> Option<TargetHandle> {
        self.lock().selectors.get(selector).copied()
    }

    fn is_fixed(&self, target: TargetHandle) -> bool {
        self.target(target).is_some_and(|t| t.fixed)
    }

    fn has_custom_scroll_parent(&self, target: TargetHandle) -> bool {
        self.target(target).is_some_and(|t| t.custom_scroll_parent)
    }

    fn scroll_parent(&self, target: TargetHandle) -> ScrollParent {
        if self.has_custom_scroll_parent(target) {
            ScrollParent(target.0 + 1)
        } else {
            PAGE
        }
    }

    fn offset_into_view(&self, target: TargetHandle, margin: f64, axis: Axis) -> f64 {
        let Some(target) = self.target(target) else {
            return -1.0;
        };

        match axis {
            Axis::Y => target.top - margin,
            Axis::X => target.left - margin,
        }
    }

    fn scroll_to(&self, parent: ScrollParent, offset: u64, axis: Axis) -> ScrollFuture {
        self.lock().scrolls.push(ScrollCall {
            parent,
            offset,
            axis,
        });
        future::ready(()).boxed()
    }

    fn add_key_listener(&self, listener: KeyListener) -> KeyListenerId {
        let mut inner = self.lock();
        let id = KeyListenerId(inner.next_listener);
        inner.next_listener += 1;
        inner.listeners.push((id, listener));
        id
    }

    fn remove_key_listener(&self, id: KeyListenerId) {
        self.lock().listeners.retain(|(existing, _)| *existing != id);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::*;
    use crate::host::KeyListenerGuard;

    #[test]
    fn test_lookup_and_offsets() {
        let host = HeadlessHost::new()
            .with_target("#a", HeadlessTarget::at(500.0, 40.0))
            .with_target("#b", HeadlessTarget::at(10.0, 0.0).fixed());

        let a = host.find_target("#a").unwrap();
        let b = host.find_target("#b").unwrap();
        assert!(host.find_target("#missing").is_none());

        assert_eq!(host.offset_into_view(a, 20.0, Axis::Y), 480.0);
        assert_eq!(host.offset_into_view(a, 20.0, Axis::X), 20.0);
        assert!(!host.is_fixed(a));
        assert!(host.is_fixed(b));
        assert_eq!(host.scroll_parent(a), PAGE);
    }

    #[test]
    fn test_place_moves_existing_target() {
        let host = HeadlessHost::new().with_target("#a", HeadlessTarget::at(100.0, 0.0));
        let before = host.find_target("#a").unwrap();

        host.place("#a", HeadlessTarget::at(300.0, 0.0).in_container());

        let after = host.find_target("#a").unwrap();
        assert_eq!(before, after);
        assert_eq!(host.offset_into_view(after, 0.0, Axis::Y), 300.0);
        assert!(host.has_custom_scroll_parent(after));
        assert_ne!(host.scroll_parent(after), PAGE);
    }

    #[test]
    fn test_key_listener_guard_releases_on_drop() {
        let host: Arc<HeadlessHost> = Arc::new(HeadlessHost::new());
        let presses = Arc::new(AtomicUsize::new(0));

        let counter = presses.clone();
        let guard = KeyListenerGuard::register(
            host.clone(),
            Arc::new(move |_key| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        assert_eq!(host.listener_count(), 1);

        host.press(Key::Escape);
        assert_eq!(presses.load(Ordering::SeqCst), 1);

        drop(guard);
        assert_eq!(host.listener_count(), 0);

        host.press(Key::Escape);
        assert_eq!(presses.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_scroll_is_recorded() {
        let host = HeadlessHost::new();
        host.scroll_to(PAGE, 120, Axis::Y).await;

        assert_eq!(
            host.scrolls(),
            vec![ScrollCall {
                parent: PAGE,
                offset: 120,
                axis: Axis::Y,
            }]
        );

        host.clear_scrolls();
        assert!(host.scrolls().is_empty());
    }
}
