// SPDX-License-Identifier: MPL-2.0
//! Domain layer - value objects with ZERO external dependencies.
//!
//! Types here only depend on `std`, so the rules they encode (clamped
//! ranges, the infinite-duration sentinel) can be tested in isolation.
//!
//! # Modules
//!
//! - [`diagnostics`]: Diagnostics types ([`BufferCapacity`](diagnostics::BufferCapacity))
//! - [`notifications`]: Store tuning ([`Capacity`](notifications::Capacity),
//!   [`RemovalDelay`](notifications::RemovalDelay),
//!   [`ToastDuration`](notifications::ToastDuration))

pub mod diagnostics;
pub mod notifications;
