// SPDX-License-Identifier: MPL-2.0
//! Ordered listener set and the broadcast primitive.
//!
//! Broadcast copies the listener list out of the lock before invoking
//! anything, so listeners are free to subscribe, unsubscribe or call back
//! into the store while being notified. Each listener runs behind its own
//! panic boundary, and every delivery carries a version so a listener never
//! receives an older state after a newer one.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Identifies one registration within a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerKey(u64);

struct Entry<T> {
    key: ListenerKey,
    listener: Box<dyn Fn(&T) + Send + Sync>,
    /// Cleared by `unsubscribe`; checked before every call.
    active: AtomicBool,
    /// Highest version handed to this listener so far (0: none yet).
    seen: AtomicU64,
}

struct Listeners<T> {
    next_key: u64,
    entries: Vec<Arc<Entry<T>>>,
}

/// Registration-ordered set of callbacks receiving `&T`.
pub struct Registry<T> {
    inner: Arc<Mutex<Listeners<T>>>,
}

impl<T: 'static> Registry<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Listeners {
                next_key: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Appends `listener` and returns the handle that removes it again.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let key = {
            let mut listeners = lock(&self.inner);
            let key = ListenerKey(listeners.next_key);
            listeners.next_key += 1;
            listeners.entries.push(Arc::new(Entry {
                key,
                listener: Box::new(listener),
                active: AtomicBool::new(true),
                seen: AtomicU64::new(0),
            }));
            key
        };

        let registry: Weak<Mutex<Listeners<T>>> = Arc::downgrade(&self.inner);
        Subscription {
            key,
            detach: Box::new(move |key| {
                if let Some(inner) = registry.upgrade() {
                    lock(&inner).entries.retain(|entry| {
                        if entry.key == key {
                            entry.active.store(false, Ordering::SeqCst);
                        }
                        entry.key != key
                    });
                }
            }),
        }
    }

    /// Invokes every listener registered at call time, in order, with `state`.
    ///
    /// `version` orders deliveries: a listener that already received an equal
    /// or newer version (for instance from a broadcast issued by another
    /// listener while this one was running) is skipped, so the last state a
    /// listener sees is always the newest one published. Listeners removed
    /// while the broadcast is in progress are not called.
    ///
    /// A listener that panics is recorded in the report; the rest still run.
    pub fn broadcast(&self, state: &T, version: u64) -> BroadcastReport {
        let listeners: Vec<Arc<Entry<T>>> = lock(&self.inner).entries.clone();

        let mut report = BroadcastReport::default();
        for entry in listeners {
            if !entry.active.load(Ordering::SeqCst) {
                continue;
            }
            if entry.seen.fetch_max(version, Ordering::SeqCst) >= version {
                report.superseded += 1;
                continue;
            }
            match catch_unwind(AssertUnwindSafe(|| (entry.listener)(state))) {
                Ok(()) => report.delivered += 1,
                Err(payload) => report.failures.push(ListenerFailure {
                    key: entry.key,
                    message: panic_payload_message(payload),
                }),
            }
        }
        report
    }

    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.inner).entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: 'static> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("listeners", &lock(&self.inner).entries.len())
            .finish()
    }
}

/// Returned by `subscribe`; removes the listener when asked.
///
/// Dropping the handle leaves the listener registered.
#[must_use = "keep the subscription to be able to unsubscribe"]
pub struct Subscription {
    key: ListenerKey,
    detach: Box<dyn Fn(ListenerKey) + Send + Sync>,
}

impl Subscription {
    /// Removes the listener, effective immediately, even for a broadcast
    /// already in progress. Calling it again, or after the registry is gone,
    /// does nothing.
    pub fn unsubscribe(&self) {
        (self.detach)(self.key);
    }

    #[must_use]
    pub fn key(&self) -> ListenerKey {
        self.key
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("key", &self.key).finish()
    }
}

/// Outcome of one broadcast.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Listeners that returned normally.
    pub delivered: usize,
    /// Listeners skipped because they already saw a newer version.
    pub superseded: usize,
    /// Listeners that panicked.
    pub failures: Vec<ListenerFailure>,
}

impl BroadcastReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerFailure {
    pub key: ListenerKey,
    pub message: String,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn panic_payload_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "unknown panic payload".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, Registry<u32>) {
        (Arc::new(Mutex::new(Vec::new())), Registry::new())
    }

    #[test]
    fn broadcast_runs_listeners_in_registration_order() {
        let (log, registry) = recorder();
        for name in ["first", "second", "third"] {
            let log = Arc::clone(&log);
            let _ = registry.subscribe(move |value: &u32| {
                log.lock().unwrap().push(format!("{name}:{value}"));
            });
        }

        let report = registry.broadcast(&7, 1);

        assert_eq!(report.delivered, 3);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["first:7", "second:7", "third:7"]
        );
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry: Registry<u32> = Registry::new();
        let counter = Arc::clone(&calls);
        let subscription = registry.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        registry.broadcast(&1, 1);
        subscription.unsubscribe();
        subscription.unsubscribe();
        registry.broadcast(&2, 2);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn unsubscribe_only_removes_its_own_listener() {
        let registry: Registry<u32> = Registry::new();
        let first = registry.subscribe(|_| {});
        let _second = registry.subscribe(|_| {});

        first.unsubscribe();

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn listener_removed_mid_broadcast_is_not_called() {
        let registry: Registry<u32> = Registry::new();
        let victim: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&victim);
        let _remover = registry.subscribe(move |_| {
            if let Some(subscription) = slot.lock().unwrap().as_ref() {
                subscription.unsubscribe();
            }
        });
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        *victim.lock().unwrap() = Some(registry.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        let report = registry.broadcast(&1, 1);

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(report.delivered, 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn older_version_is_not_delivered_after_newer() {
        let (log, registry) = recorder();
        let sink = Arc::clone(&log);
        let _ = registry.subscribe(move |value: &u32| {
            sink.lock().unwrap().push(value.to_string());
        });

        registry.broadcast(&20, 2);
        let report = registry.broadcast(&10, 1);

        assert_eq!(report.superseded, 1);
        assert_eq!(*log.lock().unwrap(), vec!["20"]);
    }

    #[test]
    fn nested_broadcast_wins_over_outer_one() {
        let registry: Arc<Registry<u32>> = Arc::new(Registry::new());
        let nested = Arc::clone(&registry);
        let _ = registry.subscribe(move |value: &u32| {
            if *value == 1 {
                nested.broadcast(&2, 2);
            }
        });
        let last = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&last);
        let _ = registry.subscribe(move |value: &u32| {
            sink.lock().unwrap().push(*value);
        });

        registry.broadcast(&1, 1);

        assert_eq!(*last.lock().unwrap(), vec![2]);
    }

    #[test]
    fn panicking_listener_does_not_block_the_rest() {
        let (log, registry) = recorder();
        let _ = registry.subscribe(|_: &u32| panic!("render failed"));
        let tail = Arc::clone(&log);
        let _ = registry.subscribe(move |value: &u32| {
            tail.lock().unwrap().push(value.to_string());
        });

        let report = registry.broadcast(&3, 1);

        assert_eq!(report.delivered, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].message, "render failed");
        assert_eq!(*log.lock().unwrap(), vec!["3"]);
    }

    #[test]
    fn listener_may_subscribe_during_broadcast() {
        let registry: Arc<Registry<u32>> = Arc::new(Registry::new());
        let inner = Arc::clone(&registry);
        let _ = registry.subscribe(move |_| {
            let _ = inner.subscribe(|_| {});
        });

        let report = registry.broadcast(&0, 1);

        assert_eq!(report.delivered, 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn unsubscribe_after_registry_dropped_is_harmless() {
        let registry: Registry<u32> = Registry::new();
        let subscription = registry.subscribe(|_| {});
        drop(registry);

        subscription.unsubscribe();
    }
}
