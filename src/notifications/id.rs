// SPDX-License-Identifier: MPL-2.0
//! Notification id allocation.

use super::notification::NotificationId;

/// Hands out increasing ids, starting at 1.
///
/// Wraps back to 0 after `u64::MAX`. No collision check is made: at most
/// `capacity` records are alive at once, so a wrapped id never meets a
/// live record in practice.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    last: u64,
}

impl IdAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an allocator whose next id is `last + 1` (wrapping).
    #[must_use]
    pub fn starting_after(last: u64) -> Self {
        Self { last }
    }

    pub fn next_id(&mut self) -> NotificationId {
        self.last = self.last.wrapping_add(1);
        NotificationId::from_raw(self.last)
    }
}
