// SPDX-License-Identifier: MPL-2.0
//! Diagnostics module for recording what the toast manager did.
//!
//! The store reports every lifecycle transition and every absorbed failure
//! (for example a listener that panicked during broadcast) as a
//! [`DiagnosticEvent`]. Events travel over a bounded channel to a
//! [`DiagnosticsCollector`], which keeps the most recent ones in a
//! memory-bounded [`CircularBuffer`] and can export them as JSON.
//!
//! # Architecture
//!
//! - [`DiagnosticsHandle`]: cloneable, non-blocking producer side
//! - [`DiagnosticsCollector`]: drains the channel, owns the buffer
//! - [`CircularBuffer`]: generic ring buffer with configurable capacity
//! - [`DiagnosticEventKind`] / [`ToastEvent`]: serializable event payloads

mod buffer;
mod collector;
mod events;
mod report;

pub use buffer::{BufferCapacity, CircularBuffer};
pub use collector::{DiagnosticsCollector, DiagnosticsHandle};
pub use events::{DiagnosticEvent, DiagnosticEventKind, ToastEvent};
pub use report::{DiagnosticReport, ReportMetadata, SerializableEvent};
