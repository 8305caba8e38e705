//! Observer registry for store state changes.
//!
//! Callbacks are owned by the [`Subscription`] handed back to the caller;
//! the registry only keeps weak references. Dropping the subscription makes
//! the callback unreachable and the dead entry is pruned on the next
//! notification.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use crate::models::TourState;

type Callback = dyn Fn(&TourState) + Send + Sync;

#[derive(Default)]
pub(crate) struct Listeners {
    entries: Mutex<Vec<Weak<Callback>>>,
}

impl Listeners {
    pub(crate) fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&TourState) + Send + Sync + 'static,
    {
        let callback: Arc<Callback> = Arc::new(callback);
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::downgrade(&callback));
        Subscription {
            _callback: callback,
        }
    }

    /// Calls every live listener in registration order.
    ///
    /// The registry lock is released before any callback runs, so callbacks
    /// may subscribe or issue further store commands.
    pub(crate) fn notify(&self, state: &TourState) {
        let live: Vec<Arc<Callback>> = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            entries.retain(|entry| entry.strong_count() > 0);
            entries.iter().filter_map(Weak::upgrade).collect()
        };

        for callback in live {
            callback(state);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|entry| entry.strong_count() > 0)
            .count()
    }
}

/// Keeps a store listener registered for as long as it is alive.
#[must_use = "dropping a Subscription unregisters the listener"]
pub struct Subscription {
    _callback: Arc<Callback>,
}

impl Subscription {
    /// Unregisters the listener.
    pub fn cancel(self) {}
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
