// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Change notifications and callback observers

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

/// Change notification broadcast after a mutation is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// A record was appended; `len` is the store size afterwards
    Appended { id: u64, len: usize },
    /// The store was emptied (only with `notify_on_clear`)
    Cleared,
}

/// Callback invoked on the store worker after each applied change
pub type ChangeCallback = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

/// Registered callbacks, in registration order
#[derive(Default)]
pub(crate) struct ObserverRegistry {
    next_id: AtomicU64,
    callbacks: RwLock<Vec<(u64, ChangeCallback)>>,
}

impl ObserverRegistry {
    pub(crate) fn register(self: &Arc<Self>, callback: ChangeCallback) -> Observer {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.callbacks.write().push((id, callback));
        Observer {
            id,
            registry: Arc::downgrade(self),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.callbacks.read().is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.callbacks.read().len()
    }

    /// Invoke every callback. The list is copied first so callbacks may
    /// register or drop observers themselves.
    pub(crate) fn notify(&self, event: &StoreEvent) {
        let callbacks: Vec<ChangeCallback> = self
            .callbacks
            .read()
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();

        for callback in callbacks {
            if catch_unwind(AssertUnwindSafe(|| callback(event))).is_err() {
                tracing::error!(?event, "Log store observer panicked");
            }
        }
    }

    fn unregister(&self, id: u64) {
        self.callbacks.write().retain(|(cb_id, _)| *cb_id != id);
    }
}

/// Registration guard returned by [`LogStore::observe`](super::LogStore::observe).
///
/// The callback stays registered until this guard is dropped.
#[must_use = "the callback is unregistered when the observer is dropped"]
pub struct Observer {
    id: u64,
    registry: Weak<ObserverRegistry>,
}

impl Observer {
    /// Keep the callback registered for the lifetime of the store
    pub fn detach(self) {
        std::mem::forget(self);
    }
}

impl Drop for Observer {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.unregister(self.id);
        }
    }
}

impl std::fmt::Debug for Observer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observer").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    fn counter(registry: &Arc<ObserverRegistry>) -> (Observer, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let observer = registry.register(Arc::new(move |_: &StoreEvent| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));
        (observer, count)
    }

    #[test]
    fn test_drop_unregisters() {
        let registry = Arc::new(ObserverRegistry::default());
        let (first, first_count) = counter(&registry);
        let (_second, second_count) = counter(&registry);
        assert_eq!(registry.len(), 2);

        registry.notify(&StoreEvent::Cleared);
        drop(first);
        registry.notify(&StoreEvent::Cleared);

        assert_eq!(first_count.load(Ordering::SeqCst), 1);
        assert_eq!(second_count.load(Ordering::SeqCst), 2);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_panicking_callback_does_not_stop_others() {
        let registry = Arc::new(ObserverRegistry::default());
        let _bad = registry.register(Arc::new(|_: &StoreEvent| panic!("observer bug")));
        let (_good, count) = counter(&registry);

        registry.notify(&StoreEvent::Appended { id: 1, len: 1 });

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
