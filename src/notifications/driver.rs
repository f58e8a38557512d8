// SPDX-License-Identifier: MPL-2.0
//! Background task that fires store timers on a tokio runtime.
//!
//! The driver sleeps until the store's earliest deadline, ticks, and goes
//! back to sleep. Mutations that add or move a timer wake it early so the
//! sleep is recomputed. Hosts that run their own event loop can skip the
//! driver and call [`NotificationStore::tick`] themselves.

use std::future;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::sleep_until;

use super::store::NotificationStore;

/// Spawns the timer driver for `store` on the current runtime.
///
/// # Panics
///
/// Panics if called outside of a tokio runtime, like [`tokio::spawn`].
pub fn spawn_driver(store: NotificationStore) -> DriverHandle {
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        loop {
            store.tick();

            let deadline = store.next_deadline();
            let sleep = async move {
                match deadline {
                    Some(deadline) => sleep_until(deadline).await,
                    None => future::pending::<()>().await,
                }
            };

            tokio::select! {
                () = sleep => {}
                () = store.timers_changed().notified() => {}
                _ = &mut shutdown_rx => break,
            }
        }
    });

    DriverHandle {
        shutdown: Some(shutdown_tx),
        task: Some(task),
    }
}

/// Owns the driver task. Dropping it aborts the task.
#[derive(Debug)]
pub struct DriverHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl DriverHandle {
    /// Stops the driver and waits for the task to finish.
    ///
    /// Pending timers stay in the store; a new driver or a manual `tick`
    /// picks them up.
    pub async fn shutdown(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            // A cancelled or panicked driver has nothing left to clean up.
            let _ = task.await;
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for DriverHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notifications::{RemovalDelay, ToastDuration};
    use crate::notifications::{Payload, StoreConfig};
    use std::time::Duration;
    use tokio::time::sleep;

    fn store() -> NotificationStore {
        NotificationStore::new(StoreConfig {
            removal_delay: RemovalDelay::from_millis(1_000),
            ..StoreConfig::default()
        })
    }

    #[tokio::test(start_paused = true)]
    async fn driver_expires_then_removes_on_schedule() {
        let store = store();
        let driver = spawn_driver(store.clone());
        let id = store.enqueue(Payload::info("Saved"), Some(ToastDuration::from_millis(200)));

        sleep(Duration::from_millis(199)).await;
        assert!(store.snapshot().get(id).expect("present").is_open());

        sleep(Duration::from_millis(2)).await;
        assert!(!store.snapshot().get(id).expect("closing").is_open());

        sleep(Duration::from_millis(1_000)).await;
        assert!(store.is_empty());

        driver.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn driver_wakes_for_timers_added_while_idle() {
        let store = store();
        let driver = spawn_driver(store.clone());

        // Let the driver park with no deadline at all.
        sleep(Duration::from_secs(10)).await;
        let id = store.enqueue(Payload::info("Late"), Some(ToastDuration::from_millis(50)));
        sleep(Duration::from_millis(51)).await;

        assert!(!store.snapshot().get(id).expect("closing").is_open());
        driver.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_leaves_pending_timers_in_place() {
        let store = store();
        let driver = spawn_driver(store.clone());
        store.enqueue(Payload::info("Kept"), Some(ToastDuration::from_millis(100)));

        driver.shutdown().await;
        sleep(Duration::from_millis(500)).await;

        assert_eq!(store.snapshot().open().count(), 1);
        assert_eq!(store.pending_timers(), 1);
    }
}
