//! The environment a tour runs in.
//!
//! The engine never measures or scrolls anything itself. Element lookup,
//! fixed-position detection, scroll containers, the asynchronous scroll
//! primitive and keyboard subscription all live behind [`Host`], so the same
//! controller can sit on top of a browser bridge, a terminal UI or the
//! in-memory [`HeadlessHost`].

use std::sync::Arc;

use futures::future::BoxFuture;

pub mod headless;

pub use headless::{HeadlessHost, HeadlessTarget, ScrollCall};

/// Future returned by [`Host::scroll_to`]; resolves once the scroll settled.
pub type ScrollFuture = BoxFuture<'static, ()>;

/// Callback invoked for every key press while registered.
pub type KeyListener = Arc<dyn Fn(Key) + Send + Sync>;

/// Opaque handle to a resolved target element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetHandle(pub u64);

/// Opaque handle to the scrollable ancestor of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScrollParent(pub u64);

/// Registration id handed out by [`Host::add_key_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyListenerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Left,
    Right,
    Char(char),
}

/// Services a tour needs from its surroundings.
pub trait Host: Send + Sync {
    /// Looks up the element matching `selector`.
    fn find_target(&self, selector: &str) -> Option<TargetHandle>;

    /// Whether the target (or one of its ancestors) is fixed-positioned.
    fn is_fixed(&self, target: TargetHandle) -> bool;

    /// Whether the target scrolls inside a container other than the page.
    fn has_custom_scroll_parent(&self, target: TargetHandle) -> bool;

    fn scroll_parent(&self, target: TargetHandle) -> ScrollParent;

    /// Scroll position on `axis` that brings the target into view with
    /// `margin` to spare. Negative values mean the target is already visible.
    fn offset_into_view(&self, target: TargetHandle, margin: f64, axis: Axis) -> f64;

    /// Scrolls `parent` to `offset` on `axis`.
    fn scroll_to(&self, parent: ScrollParent, offset: u64, axis: Axis) -> ScrollFuture;

    fn add_key_listener(&self, listener: KeyListener) -> KeyListenerId;

    fn remove_key_listener(&self, id: KeyListenerId);
}

/// Keeps a key listener registered until dropped or released.
pub struct KeyListenerGuard {
    host: Arc<dyn Host>,
    id: Option<KeyListenerId>,
}

impl KeyListenerGuard {
    /// Registers `listener` with `host`.
    pub fn register(host: Arc<dyn Host>, listener: KeyListener) -> Self {
        let id = host.add_key_listener(listener);
        Self { host, id: Some(id) }
    }

    pub fn id(&self) -> Option<KeyListenerId> {
        self.id
    }

    /// Deregisters the listener now.
    pub fn release(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if let Some(id) = self.id.take() {
            self.host.remove_key_listener(id);
        }
    }
}

impl Drop for KeyListenerGuard {
    fn drop(&mut self) {
        self.remove();
    }
}

impl std::fmt::Debug for KeyListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyListenerGuard")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
