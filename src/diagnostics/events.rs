// SPDX-License-Identifier: MPL-2.0
//! Diagnostic event types.
//!
//! Every store mutation and every absorbed failure is recorded as one of
//! these events so a host application can inspect what the toast manager
//! did without subscribing to snapshots.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::notifications::{NotificationId, Severity};

/// A toast lifecycle transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "transition", rename_all = "snake_case")]
pub enum ToastEvent {
    /// A toast was added at the head of the list.
    Enqueued {
        id: NotificationId,
        severity: Severity,
    },

    /// A toast's payload was patched.
    Updated { id: NotificationId },

    /// A toast was closed by a caller.
    Dismissed { id: NotificationId },

    /// A toast was closed by its auto-dismiss timer.
    Expired { id: NotificationId },

    /// A closed toast was purged after its removal delay.
    Removed { id: NotificationId },

    /// A toast was dropped because a newer one overflowed the capacity.
    Evicted { id: NotificationId },

    /// Every toast was removed at once.
    Cleared {
        /// Number of records that were present.
        count: usize,
    },
}

/// A diagnostic event with timestamp.
#[derive(Debug, Clone)]
pub struct DiagnosticEvent {
    /// When the event occurred (monotonic clock for duration calculations)
    pub timestamp: Instant,
    /// The type and data of the event
    pub kind: DiagnosticEventKind,
}

impl DiagnosticEvent {
    #[must_use]
    pub fn new(kind: DiagnosticEventKind) -> Self {
        Self {
            timestamp: Instant::now(),
            kind,
        }
    }

    #[must_use]
    pub fn with_timestamp(kind: DiagnosticEventKind, timestamp: Instant) -> Self {
        Self { timestamp, kind }
    }
}

/// The type and associated data for a diagnostic event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticEventKind {
    /// Toast lifecycle transition.
    Toast { event: ToastEvent },

    /// Non-critical issue (e.g. a dropped setting).
    Warning { message: String },

    /// A failure that was absorbed, such as a panicking listener.
    Error { message: String },
}
