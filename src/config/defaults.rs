// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module is the single source of truth for the defaults used when
//! `settings.toml` is missing or leaves a field out.
//!
//! # Categories
//!
//! - **Notifications**: capacity, removal delay, auto-dismiss duration
//! - **Diagnostics**: event buffer size

// ==========================================================================
// Notification Defaults
// ==========================================================================

/// Default number of toasts retained at once.
pub const DEFAULT_CAPACITY: usize = 5;

/// Minimum number of toasts retained at once.
pub const MIN_CAPACITY: usize = 1;

/// Maximum number of toasts retained at once.
pub const MAX_CAPACITY: usize = 100;

/// Default delay between a toast closing and its removal (in milliseconds).
pub const DEFAULT_REMOVAL_DELAY_MS: u64 = 1_000;

/// Maximum delay between a toast closing and its removal (in milliseconds).
pub const MAX_REMOVAL_DELAY_MS: u64 = 3_600_000;

/// Default auto-dismiss duration when the caller gives none (in milliseconds).
pub const DEFAULT_DURATION_MS: u64 = 5_000;

// ==========================================================================
// Diagnostics Defaults
// ==========================================================================

/// Default number of diagnostic events kept in memory.
pub const DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY: usize = 1_000;

/// Minimum number of diagnostic events kept in memory.
pub const MIN_DIAGNOSTICS_BUFFER_CAPACITY: usize = 100;

/// Maximum number of diagnostic events kept in memory.
pub const MAX_DIAGNOSTICS_BUFFER_CAPACITY: usize = 10_000;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_CAPACITY > 0);
    assert!(MAX_CAPACITY >= MIN_CAPACITY);
    assert!(DEFAULT_CAPACITY >= MIN_CAPACITY);
    assert!(DEFAULT_CAPACITY <= MAX_CAPACITY);

    assert!(DEFAULT_REMOVAL_DELAY_MS <= MAX_REMOVAL_DELAY_MS);
    assert!(DEFAULT_DURATION_MS > 0);

    assert!(MIN_DIAGNOSTICS_BUFFER_CAPACITY > 0);
    assert!(MAX_DIAGNOSTICS_BUFFER_CAPACITY >= MIN_DIAGNOSTICS_BUFFER_CAPACITY);
    assert!(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY >= MIN_DIAGNOSTICS_BUFFER_CAPACITY);
    assert!(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY <= MAX_DIAGNOSTICS_BUFFER_CAPACITY);
};
