// SPDX-License-Identifier: MPL-2.0
//! Pending auto-dismiss and removal deadlines, keyed by notification id.
//!
//! The table never fires anything itself. The store asks it which timers
//! are due and runs each one through its normal mutation path, so a timer
//! is just a deadline that can be cancelled by forgetting it.

use super::notification::NotificationId;
use std::collections::HashMap;
use tokio::time::Instant;

/// What happens when a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerKind {
    /// Close the toast (`dismiss`).
    AutoDismiss,
    /// Purge the closed toast from the list.
    Removal,
}

/// A timer whose deadline has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueTimer {
    pub id: NotificationId,
    pub kind: TimerKind,
    pub deadline: Instant,
}

#[derive(Debug, Clone, Copy, Default)]
struct PendingTimers {
    auto_dismiss: Option<Instant>,
    removal: Option<Instant>,
}

impl PendingTimers {
    fn slot(&mut self, kind: TimerKind) -> &mut Option<Instant> {
        match kind {
            TimerKind::AutoDismiss => &mut self.auto_dismiss,
            TimerKind::Removal => &mut self.removal,
        }
    }

    fn is_empty(&self) -> bool {
        self.auto_dismiss.is_none() && self.removal.is_none()
    }

    fn iter(&self) -> impl Iterator<Item = (TimerKind, Instant)> {
        [
            self.auto_dismiss.map(|at| (TimerKind::AutoDismiss, at)),
            self.removal.map(|at| (TimerKind::Removal, at)),
        ]
        .into_iter()
        .flatten()
    }
}

/// At most one timer of each kind per notification.
#[derive(Debug, Default)]
pub struct TimerTable {
    entries: HashMap<NotificationId, PendingTimers>,
}

impl TimerTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the deadline for `kind`, replacing any earlier one.
    pub fn schedule(&mut self, id: NotificationId, kind: TimerKind, deadline: Instant) {
        *self.entries.entry(id).or_default().slot(kind) = Some(deadline);
    }

    /// Drops both timers of `id`. Returns true if anything was pending.
    pub fn cancel(&mut self, id: NotificationId) -> bool {
        self.entries.remove(&id).is_some()
    }

    /// Drops one timer of `id`. Returns true if it was pending.
    pub fn cancel_kind(&mut self, id: NotificationId, kind: TimerKind) -> bool {
        let Some(pending) = self.entries.get_mut(&id) else {
            return false;
        };
        let cancelled = pending.slot(kind).take().is_some();
        if pending.is_empty() {
            self.entries.remove(&id);
        }
        cancelled
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn is_scheduled(&self, id: NotificationId, kind: TimerKind) -> bool {
        self.deadline(id, kind).is_some()
    }

    #[must_use]
    pub fn deadline(&self, id: NotificationId, kind: TimerKind) -> Option<Instant> {
        let mut pending = *self.entries.get(&id)?;
        *pending.slot(kind)
    }

    /// Earliest deadline across all pending timers.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries
            .values()
            .flat_map(PendingTimers::iter)
            .map(|(_, at)| at)
            .min()
    }

    /// Removes and returns every timer due at `now`, earliest first.
    ///
    /// Ties are broken by kind (auto-dismiss before removal), then by id.
    pub fn take_due(&mut self, now: Instant) -> Vec<DueTimer> {
        let mut due: Vec<DueTimer> = self
            .entries
            .iter()
            .flat_map(|(&id, pending)| {
                pending
                    .iter()
                    .filter(move |&(_, at)| at <= now)
                    .map(move |(kind, deadline)| DueTimer { id, kind, deadline })
            })
            .collect();

        for timer in &due {
            self.cancel_kind(timer.id, timer.kind);
        }

        due.sort_by_key(|timer| (timer.deadline, timer.kind, timer.id));
        due
    }

    /// Number of pending timers (both kinds counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .values()
            .map(|pending| pending.iter().count())
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
