//! Cancellable round countdown
//!
//! A clock owns one spawned timer task. It fires at most once; cancelling or
//! dropping the clock aborts the task, so early-ended rounds never leave a
//! timer behind.

use chrono::{DateTime, Utc};
use std::future::Future;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub struct RoundClock {
    task: JoinHandle<()>,
    expired_rx: Option<oneshot::Receiver<()>>,
    fired: Option<bool>,
    deadline: DateTime<Utc>,
}

impl RoundClock {
    /// Start a plain countdown
    pub fn start(duration: Duration) -> Self {
        Self::start_with(duration, async {})
    }

    /// Start a countdown that runs `on_expire` when it elapses, before the
    /// expiry is signalled to `expired()`
    pub fn start_with<F>(duration: Duration, on_expire: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let deadline = Utc::now()
            + chrono::Duration::from_std(duration).unwrap_or_else(|_| chrono::Duration::zero());

        let task = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            on_expire.await;
            let _ = tx.send(());
        });

        Self {
            task,
            expired_rx: Some(rx),
            fired: None,
            deadline,
        }
    }

    /// Wait for the clock. Returns `true` if it expired, `false` if it was
    /// cancelled first. Repeated calls return the same answer.
    pub async fn expired(&mut self) -> bool {
        if let Some(fired) = self.fired {
            return fired;
        }

        let fired = match self.expired_rx.take() {
            Some(rx) => rx.await.is_ok(),
            None => false,
        };
        self.fired = Some(fired);
        fired
    }

    /// Stop the timer. No-op if it already fired or was cancelled.
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Wall-clock time at which the clock fires
    pub fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }
}

impl Drop for RoundClock {
    fn drop(&mut self) {
        self.task.abort();
    }
}
