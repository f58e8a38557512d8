// SPDX-License-Identifier: MPL-2.0
//! Pure state transitions of the toast list.
//!
//! The store applies every mutation through [`reduce`] and then reacts to
//! the returned [`Outcome`] (timers, diagnostics, broadcast). Keeping the
//! list logic free of timers and locks makes it testable on its own.

use super::notification::{Notification, NotificationId, PayloadPatch};
use crate::domain::notifications::Capacity;

/// A mutation of the toast list.
#[derive(Debug, Clone)]
pub enum Action {
    /// Insert at the head, then drop the oldest entries beyond capacity.
    Add(Notification),
    /// Merge a patch into the payload of the given toast.
    Update {
        id: NotificationId,
        patch: PayloadPatch,
    },
    /// Close one toast, or every open toast with `None`.
    Dismiss(Option<NotificationId>),
    /// Purge one toast, or every toast with `None`.
    Remove(Option<NotificationId>),
}

/// What a [`reduce`] call changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// True if the list differs from before; the store broadcasts only then.
    pub changed: bool,
    /// Toasts that went from open to closing.
    pub closed: Vec<NotificationId>,
    /// Toasts purged by `Remove`.
    pub removed: Vec<NotificationId>,
    /// Toasts dropped by capacity truncation, oldest last.
    pub evicted: Vec<NotificationId>,
}

/// Applies `action` to `items` (newest first).
pub fn reduce(items: &mut Vec<Notification>, capacity: Capacity, action: Action) -> Outcome {
    match action {
        Action::Add(notification) => {
            items.insert(0, notification);
            let evicted = if items.len() > capacity.value() {
                items
                    .drain(capacity.value()..)
                    .map(|evicted| evicted.id())
                    .collect()
            } else {
                Vec::new()
            };
            Outcome {
                changed: true,
                evicted,
                ..Outcome::default()
            }
        }
        Action::Update { id, patch } => {
            let Some(notification) = items.iter_mut().find(|n| n.id() == id) else {
                return Outcome::default();
            };
            patch.apply_to(notification.payload_mut());
            Outcome {
                changed: true,
                ..Outcome::default()
            }
        }
        Action::Dismiss(target) => {
            let closed: Vec<NotificationId> = items
                .iter_mut()
                .filter(|n| target.is_none_or(|id| n.id() == id))
                .filter_map(|n| n.close().then(|| n.id()))
                .collect();
            Outcome {
                changed: !closed.is_empty(),
                closed,
                ..Outcome::default()
            }
        }
        Action::Remove(target) => {
            let mut removed = Vec::new();
            items.retain(|n| {
                let hit = target.is_none_or(|id| n.id() == id);
                if hit {
                    removed.push(n.id());
                }
                !hit
            });
            Outcome {
                changed: !removed.is_empty(),
                removed,
                ..Outcome::default()
            }
        }
    }
}
