// SPDX-License-Identifier: MPL-2.0
//! Toast notification store for user feedback.
//!
//! Toasts are kept newest first, bounded by a capacity. Each toast is open
//! until it is dismissed, by a caller or by its auto-dismiss timer. It then
//! stays in the list, closed, for a removal delay so a view can animate it
//! out, and is finally purged.
//!
//! # Components
//!
//! - [`notification`]: `Notification`, `Payload`, `PayloadPatch` and `Severity`
//! - [`store`]: `NotificationStore`, the shared owner of the list
//! - [`action`]: the pure list reducer every mutation goes through
//! - [`timers`]: pending auto-dismiss and removal deadlines
//! - [`subscription`]: listener registry and broadcast
//! - [`driver`]: tokio task firing timers for hosts without their own loop
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use toastline::notifications::{NotificationStore, Payload, ToastDuration};
//!
//! let store = NotificationStore::default();
//! let _subscription = store.subscribe(|snapshot| {
//!     println!("{} toast(s) on screen", snapshot.len());
//! });
//!
//! let start = tokio::time::Instant::now();
//! let id = store.enqueue_at(
//!     Payload::success("Image saved"),
//!     Some(ToastDuration::from_millis(3_000)),
//!     start,
//! );
//!
//! store.tick_at(start + Duration::from_secs(3));
//! assert!(!store.snapshot().get(id).unwrap().is_open());
//! ```

pub mod action;
pub mod driver;
pub mod id;
pub mod notification;
pub mod store;
pub mod subscription;
pub mod timers;

pub use crate::domain::notifications::{Capacity, RemovalDelay, ToastDuration};
pub use action::{reduce, Action, Outcome};
pub use driver::{spawn_driver, DriverHandle};
pub use id::IdAllocator;
pub use notification::{
    Notification, NotificationId, Payload, PayloadPatch, Severity, ToastAction, MAX_TEXT_CHARS,
};
pub use store::{NotificationStore, Snapshot, StoreConfig, ToastHandle};
pub use subscription::{BroadcastReport, ListenerFailure, ListenerKey, Registry, Subscription};
pub use timers::{DueTimer, TimerKind, TimerTable};
