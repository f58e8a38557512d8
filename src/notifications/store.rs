// SPDX-License-Identifier: MPL-2.0
//! Notification store: the toast list, its timers and its subscribers.
//!
//! `NotificationStore` is a cheap, cloneable handle to one shared instance.
//! Every mutation runs the same way: take the state lock, apply an
//! [`Action`] through [`reduce`], adjust timers from the [`Outcome`], copy a
//! [`Snapshot`] stamped with a new version, release the lock, then broadcast
//! the snapshot. Timer firings (see [`NotificationStore::tick`]) go through
//! the exact same path.
//!
//! Broadcasts run outside the lock, so two of them can race (a listener
//! mutating the store from inside its callback, or the timer driver and a
//! caller on different threads). The version makes the registry drop any
//! snapshot older than one a listener has already received.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;
use tokio::time::Instant;

use super::action::{reduce, Action, Outcome};
use super::id::IdAllocator;
use super::notification::{Notification, NotificationId, Payload, PayloadPatch};
use super::subscription::{BroadcastReport, Registry, Subscription};
use super::timers::{TimerKind, TimerTable};
use crate::diagnostics::{DiagnosticsHandle, ToastEvent};
use crate::domain::notifications::{Capacity, RemovalDelay, ToastDuration};

/// Tuning of a store instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Maximum number of toasts retained at once.
    pub capacity: Capacity,
    /// Delay between a toast closing and its removal.
    pub removal_delay: RemovalDelay,
    /// Lifetime applied when `enqueue` gets no explicit duration.
    pub default_duration: ToastDuration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            capacity: Capacity::default(),
            removal_delay: RemovalDelay::default(),
            default_duration: ToastDuration::from_millis(crate::config::DEFAULT_DURATION_MS),
        }
    }
}

/// The state handed to subscribers: every toast, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Number of mutations applied to the store when this copy was taken.
    pub version: u64,
    pub items: Vec<Notification>,
}

impl Snapshot {
    #[must_use]
    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.items.iter().find(|n| n.id() == id)
    }

    /// Ids in list order (newest first).
    #[must_use]
    pub fn ids(&self) -> Vec<NotificationId> {
        self.items.iter().map(Notification::id).collect()
    }

    /// Toasts that have not been dismissed yet.
    pub fn open(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter().filter(|n| n.is_open())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Default)]
struct StoreState {
    version: u64,
    items: Vec<Notification>,
    ids: IdAllocator,
    timers: TimerTable,
}

impl StoreState {
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: self.version,
            items: self.items.clone(),
        }
    }

    /// Records a mutation and returns the snapshot to broadcast for it.
    fn commit(&mut self) -> Snapshot {
        self.version += 1;
        self.snapshot()
    }
}

#[derive(Debug)]
struct Shared {
    config: StoreConfig,
    state: Mutex<StoreState>,
    listeners: Registry<Snapshot>,
    /// Signalled whenever a timer may have been added or moved earlier.
    timers_changed: Notify,
    diagnostics: Option<DiagnosticsHandle>,
}

/// Owner of the toast list.
///
/// Clones share the same list, timers and subscribers.
#[derive(Debug, Clone)]
pub struct NotificationStore {
    shared: Arc<Shared>,
}

impl NotificationStore {
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self::build(config, None)
    }

    /// Creates a store that reports every transition to `diagnostics`.
    #[must_use]
    pub fn with_diagnostics(config: StoreConfig, diagnostics: DiagnosticsHandle) -> Self {
        Self::build(config, Some(diagnostics))
    }

    fn build(config: StoreConfig, diagnostics: Option<DiagnosticsHandle>) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                state: Mutex::new(StoreState::default()),
                listeners: Registry::new(),
                timers_changed: Notify::new(),
                diagnostics,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> StoreConfig {
        self.shared.config
    }

    /// Adds a toast at the head of the list and returns its id.
    ///
    /// `None` uses the configured default duration. A finite duration too
    /// long to be represented as a deadline is treated as infinite. When the
    /// list grows past capacity the oldest toasts are dropped without a
    /// closing transition.
    pub fn enqueue(&self, payload: Payload, duration: Option<ToastDuration>) -> NotificationId {
        self.enqueue_at(payload, duration, Instant::now())
    }

    /// Same as [`enqueue`](Self::enqueue) with an explicit creation time.
    pub fn enqueue_at(
        &self,
        payload: Payload,
        duration: Option<ToastDuration>,
        now: Instant,
    ) -> NotificationId {
        let requested = duration.unwrap_or(self.shared.config.default_duration);
        let deadline = requested.as_finite().and_then(|ttl| now.checked_add(ttl));
        let duration = match (requested, deadline) {
            (ToastDuration::Finite(_), None) => ToastDuration::Infinite,
            _ => requested,
        };
        let severity = payload.severity();

        let (id, outcome, snapshot) = {
            let mut state = self.lock_state();
            let id = state.ids.next_id();
            let notification = Notification::new(id, payload, duration, now);
            let outcome = reduce(
                &mut state.items,
                self.shared.config.capacity,
                Action::Add(notification),
            );
            for evicted in &outcome.evicted {
                state.timers.cancel(*evicted);
            }
            if let Some(deadline) = deadline {
                state.timers.schedule(id, TimerKind::AutoDismiss, deadline);
            }
            (id, outcome, state.commit())
        };

        if duration != requested {
            self.warn(format!(
                "toast {id} duration {requested:?} exceeds the clock range, kept open until dismissed"
            ));
        }
        self.log(ToastEvent::Enqueued { id, severity });
        for evicted in outcome.evicted {
            self.log(ToastEvent::Evicted { id: evicted });
        }
        if deadline.is_some() {
            self.shared.timers_changed.notify_one();
        }
        self.publish(&snapshot);
        id
    }

    /// Enqueues with the default duration and returns a handle bound to the id.
    pub fn toast(&self, payload: Payload) -> ToastHandle {
        ToastHandle {
            id: self.enqueue(payload, None),
            store: self.clone(),
        }
    }

    /// Merges `patch` into the toast's payload.
    ///
    /// Returns false (and broadcasts nothing) if the id is unknown.
    pub fn update(&self, id: NotificationId, patch: PayloadPatch) -> bool {
        let applied = self.mutate(Action::Update { id, patch }, |_, _| {});
        if applied {
            self.log(ToastEvent::Updated { id });
        }
        applied
    }

    /// Closes the toast and schedules its removal.
    ///
    /// Idempotent: unknown or already closed ids are left alone and nothing
    /// is broadcast. Returns whether the toast transitioned.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        self.dismiss_at(id, Instant::now())
    }

    /// Same as [`dismiss`](Self::dismiss), measuring the removal delay from `now`.
    pub fn dismiss_at(&self, id: NotificationId, now: Instant) -> bool {
        let closed = self.close(Action::Dismiss(Some(id)), now);
        for id in &closed {
            self.log(ToastEvent::Dismissed { id: *id });
        }
        !closed.is_empty()
    }

    /// Closes every open toast in one mutation. Returns how many closed.
    pub fn dismiss_all(&self) -> usize {
        let closed = self.close(Action::Dismiss(None), Instant::now());
        for id in &closed {
            self.log(ToastEvent::Dismissed { id: *id });
        }
        closed.len()
    }

    /// Removes every toast immediately and cancels all timers.
    ///
    /// Broadcasts once if the list was not already empty.
    pub fn clear(&self) -> usize {
        let mut removed = 0;
        self.mutate(Action::Remove(None), |timers, outcome| {
            timers.clear();
            removed = outcome.removed.len();
        });
        if removed > 0 {
            self.log(ToastEvent::Cleared { count: removed });
        }
        removed
    }

    /// Registers `listener` for every future broadcast.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        self.shared.listeners.subscribe(listener)
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.lock_state().snapshot()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock_state().items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.shared.listeners.len()
    }

    /// Number of pending timers, both kinds counted.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.lock_state().timers.len()
    }

    /// Earliest pending timer deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.lock_state().timers.next_deadline()
    }

    /// Fires every timer that is due now. Returns how many fired.
    pub fn tick(&self) -> usize {
        self.tick_at(Instant::now())
    }

    /// Fires every timer due at `now`, earliest first.
    ///
    /// Timers scheduled by a firing (a removal following an auto-dismiss)
    /// fire in the same pass when they are already due.
    pub fn tick_at(&self, now: Instant) -> usize {
        let mut fired = 0;
        loop {
            let due = self.lock_state().timers.take_due(now);
            if due.is_empty() {
                return fired;
            }
            for timer in due {
                fired += 1;
                match timer.kind {
                    TimerKind::AutoDismiss => self.expire(timer.id, now),
                    TimerKind::Removal => self.purge(timer.id),
                }
            }
        }
    }

    pub(crate) fn timers_changed(&self) -> &Notify {
        &self.shared.timers_changed
    }

    fn expire(&self, id: NotificationId, now: Instant) {
        if !self.close(Action::Dismiss(Some(id)), now).is_empty() {
            self.log(ToastEvent::Expired { id });
        }
    }

    fn purge(&self, id: NotificationId) {
        let removed = self.mutate(Action::Remove(Some(id)), |timers, _| {
            timers.cancel(id);
        });
        if removed {
            self.log(ToastEvent::Removed { id });
        }
    }

    /// Applies a dismiss action and schedules removal of every closed toast.
    fn close(&self, action: Action, now: Instant) -> Vec<NotificationId> {
        let mut closed = Vec::new();
        let delay = self.shared.config.removal_delay.as_duration();
        // Past the clock range, purge on the next tick instead.
        let removal_at = now.checked_add(delay).unwrap_or(now);
        self.mutate(action, |timers, outcome| {
            for id in &outcome.closed {
                timers.cancel_kind(*id, TimerKind::AutoDismiss);
                timers.schedule(*id, TimerKind::Removal, removal_at);
            }
            closed.clone_from(&outcome.closed);
        });
        if !closed.is_empty() {
            self.shared.timers_changed.notify_one();
        }
        closed
    }

    /// Runs `action` under the lock, lets `on_change` adjust timers, then
    /// broadcasts if the list changed. Returns whether it changed.
    fn mutate<F>(&self, action: Action, on_change: F) -> bool
    where
        F: FnOnce(&mut TimerTable, &Outcome),
    {
        let snapshot = {
            let mut state = self.lock_state();
            let outcome = reduce(&mut state.items, self.shared.config.capacity, action);
            if !outcome.changed {
                return false;
            }
            on_change(&mut state.timers, &outcome);
            state.commit()
        };
        self.publish(&snapshot);
        true
    }

    fn publish(&self, snapshot: &Snapshot) -> BroadcastReport {
        let report = self.shared.listeners.broadcast(snapshot, snapshot.version);
        if let Some(diagnostics) = &self.shared.diagnostics {
            for failure in &report.failures {
                diagnostics.log_error(format!(
                    "toast listener {:?} panicked: {}",
                    failure.key, failure.message
                ));
            }
        }
        report
    }

    fn warn(&self, message: String) {
        if let Some(diagnostics) = &self.shared.diagnostics {
            diagnostics.log_warning(message);
        }
    }

    fn log(&self, event: ToastEvent) {
        if let Some(diagnostics) = &self.shared.diagnostics {
            diagnostics.log_toast(event);
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, StoreState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

/// A toast id bound to the store that owns it.
#[derive(Debug, Clone)]
pub struct ToastHandle {
    id: NotificationId,
    store: NotificationStore,
}

impl ToastHandle {
    #[must_use]
    pub fn id(&self) -> NotificationId {
        self.id
    }

    pub fn dismiss(&self) -> bool {
        self.store.dismiss(self.id)
    }

    pub fn update(&self, patch: PayloadPatch) -> bool {
        self.store.update(self.id, patch)
    }
}
