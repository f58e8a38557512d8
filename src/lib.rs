// SPDX-License-Identifier: MPL-2.0
//! `toastline` is a toast notification manager for GUI applications.
//!
//! It keeps a bounded, newest-first list of transient notifications, runs
//! their auto-dismiss and removal timers, and hands an immutable snapshot of
//! the list to every subscriber after each change. Rendering is left to the
//! host.

#![doc(html_root_url = "https://docs.rs/toastline/0.1.0")]

pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod notifications;
