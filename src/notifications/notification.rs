// SPDX-License-Identifier: MPL-2.0
//! Core notification data structures.
//!
//! This module defines the `Notification` record, its caller-supplied
//! `Payload`, and the structured `PayloadPatch` used by updates.

use crate::domain::notifications::ToastDuration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tokio::time::Instant;

/// Longest title or description kept, in characters.
pub const MAX_TEXT_CHARS: usize = 500;

/// Identifier of a notification, unique among the records currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(u64);

impl NotificationId {
    /// Wraps a raw counter value.
    #[must_use]
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Severity level, used by the presentation layer for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Operation completed successfully.
    Success,
    /// Neutral informational message.
    #[default]
    Info,
    /// Something the user should know about; nothing failed.
    Warning,
    /// An operation failed.
    Error,
}

/// A button rendered inside the toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastAction {
    /// Text shown on the button.
    pub label: String,
    /// Opaque key handed back to the caller when the button is pressed.
    pub key: String,
}

impl ToastAction {
    pub fn new(label: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            key: key.into(),
        }
    }
}

/// Caller-supplied content of a toast, passed through unmodified apart
/// from text normalization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Payload {
    title: Option<String>,
    description: Option<String>,
    severity: Severity,
    action: Option<ToastAction>,
    data: BTreeMap<String, String>,
}

impl Payload {
    #[must_use]
    pub fn new(severity: Severity) -> Self {
        Self {
            severity,
            ..Self::default()
        }
    }

    /// Creates a success payload with the given title.
    pub fn success(title: impl Into<String>) -> Self {
        Self::new(Severity::Success).with_title(title)
    }

    /// Creates an info payload with the given title.
    pub fn info(title: impl Into<String>) -> Self {
        Self::new(Severity::Info).with_title(title)
    }

    /// Creates a warning payload with the given title.
    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(Severity::Warning).with_title(title)
    }

    /// Creates an error payload with the given title.
    pub fn error(title: impl Into<String>) -> Self {
        Self::new(Severity::Error).with_title(title)
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = normalize_text(title.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = normalize_text(description.into());
        self
    }

    #[must_use]
    pub fn with_action(mut self, action: ToastAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Attaches a custom key/value pair for the presentation layer.
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn action(&self) -> Option<&ToastAction> {
        self.action.as_ref()
    }

    #[must_use]
    pub fn data(&self) -> &BTreeMap<String, String> {
        &self.data
    }
}

/// A partial update of a [`Payload`].
///
/// Every field is optional; only the fields that are set replace the
/// current values. `data` entries are merged key by key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PayloadPatch {
    title: Option<String>,
    description: Option<String>,
    severity: Option<Severity>,
    action: Option<ToastAction>,
    data: BTreeMap<String, String>,
}

impl PayloadPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title. Blank titles are ignored.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = normalize_text(title.into());
        self
    }

    /// Replaces the description. Blank descriptions are ignored.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = normalize_text(description.into());
        self
    }

    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    #[must_use]
    pub fn action(mut self, action: ToastAction) -> Self {
        self.action = Some(action);
        self
    }

    #[must_use]
    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Returns true if applying this patch cannot change anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.severity.is_none()
            && self.action.is_none()
            && self.data.is_empty()
    }

    /// Merges the patch into `payload`.
    pub fn apply_to(self, payload: &mut Payload) {
        if let Some(title) = self.title {
            payload.title = Some(title);
        }
        if let Some(description) = self.description {
            payload.description = Some(description);
        }
        if let Some(severity) = self.severity {
            payload.severity = severity;
        }
        if let Some(action) = self.action {
            payload.action = Some(action);
        }
        payload.data.extend(self.data);
    }
}

/// A toast held by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    id: NotificationId,
    payload: Payload,
    /// `false` once dismissed, until the removal delay purges the record.
    open: bool,
    duration: ToastDuration,
    created_at: Instant,
}

impl Notification {
    pub(crate) fn new(
        id: NotificationId,
        payload: Payload,
        duration: ToastDuration,
        created_at: Instant,
    ) -> Self {
        Self {
            id,
            payload,
            open: true,
            duration,
            created_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> NotificationId {
        self.id
    }

    #[must_use]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn duration(&self) -> ToastDuration {
        self.duration
    }

    #[must_use]
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub(crate) fn payload_mut(&mut self) -> &mut Payload {
        &mut self.payload
    }

    /// Flips the record to closing. Returns false if it was already closed.
    pub(crate) fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }
}

/// Trims surrounding whitespace and caps the length; blank text becomes `None`.
fn normalize_text(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_TEXT_CHARS).collect())
}
