// SPDX-License-Identifier: MPL-2.0
//! Notification value objects.
//!
//! Range-checked wrappers for the store's tuning knobs and the
//! finite-or-infinite toast lifetime.

use std::time::Duration;

// =============================================================================
// Capacity Bounds
// =============================================================================

/// Retained toast bounds (1 to 100 records).
pub mod capacity_bounds {
    /// Minimum number of retained toasts.
    pub const MIN: usize = 1;
    /// Maximum number of retained toasts.
    pub const MAX: usize = 100;
    /// Default number of retained toasts.
    pub const DEFAULT: usize = 5;
}

/// Removal delay bounds, in milliseconds (0 to 1 hour).
pub mod removal_delay_bounds {
    /// Minimum delay between close and purge.
    pub const MIN_MS: u64 = 0;
    /// Maximum delay between close and purge.
    pub const MAX_MS: u64 = 3_600_000;
    /// Default delay between close and purge.
    pub const DEFAULT_MS: u64 = 1_000;
}

// =============================================================================
// Capacity
// =============================================================================

/// Maximum number of toasts retained at once.
///
/// Always within 1–100, so the store never has to special-case an empty
/// list limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capacity(usize);

impl Capacity {
    /// Creates a capacity, clamping to the valid range.
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(capacity_bounds::MIN, capacity_bounds::MAX))
    }

    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for Capacity {
    fn default() -> Self {
        Self(capacity_bounds::DEFAULT)
    }
}

// =============================================================================
// RemovalDelay
// =============================================================================

/// Grace period between a toast closing and its physical removal.
///
/// Gives the presentation layer time to play an exit transition while the
/// record is still present with `open == false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RemovalDelay(Duration);

impl RemovalDelay {
    /// Creates a removal delay, clamping to at most one hour.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self(delay.clamp(
            Duration::from_millis(removal_delay_bounds::MIN_MS),
            Duration::from_millis(removal_delay_bounds::MAX_MS),
        ))
    }

    /// Creates a removal delay from milliseconds, clamping to the valid range.
    #[must_use]
    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    #[must_use]
    pub fn as_duration(self) -> Duration {
        self.0
    }

    /// Returns true if closed toasts are purged on the very next tick.
    #[must_use]
    pub fn is_immediate(self) -> bool {
        self.0.is_zero()
    }
}

impl Default for RemovalDelay {
    fn default() -> Self {
        Self::from_millis(removal_delay_bounds::DEFAULT_MS)
    }
}

// =============================================================================
// ToastDuration
// =============================================================================

/// How long a toast stays open before it is dismissed automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastDuration {
    /// Auto-dismiss after the given time-to-live.
    Finite(Duration),
    /// Never auto-dismiss; the toast stays until dismissed explicitly.
    Infinite,
}

impl ToastDuration {
    #[must_use]
    pub fn from_millis(millis: u64) -> Self {
        ToastDuration::Finite(Duration::from_millis(millis))
    }

    /// Returns the time-to-live, or `None` for the infinite sentinel.
    #[must_use]
    pub fn as_finite(self) -> Option<Duration> {
        match self {
            ToastDuration::Finite(ttl) => Some(ttl),
            ToastDuration::Infinite => None,
        }
    }

    #[must_use]
    pub fn is_infinite(self) -> bool {
        matches!(self, ToastDuration::Infinite)
    }
}

impl From<Duration> for ToastDuration {
    fn from(ttl: Duration) -> Self {
        ToastDuration::Finite(ttl)
    }
}

// =============================================================================
// Tests
// =============================================================================
