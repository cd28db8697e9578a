//! Periodic callback scheduler on the tokio runtime.

use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

/// Runs a callback once per interval until stopped or dropped.
///
/// The first invocation happens one full period after `start`. Dropping the
/// scheduler aborts the task, so no callback outlives its owner.
pub struct IntervalScheduler {
    name: &'static str,
    shutdown_tx: Option<broadcast::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl IntervalScheduler {
    /// Create an idle scheduler.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            shutdown_tx: None,
            handle: None,
        }
    }

    /// Get the scheduler name used in logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the timer task is alive.
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Spawn the timer task. Must be called from within a tokio runtime.
    /// Does nothing if already running.
    pub fn start<F>(&mut self, period: Duration, mut callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        if self.is_running() {
            debug!("{} scheduler already running", self.name);
            return;
        }

        let period = period.max(Duration::from_millis(1));
        let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);
        let name = self.name;

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.recv() => {
                        debug!("{} scheduler received shutdown signal", name);
                        break;
                    }
                    _ = ticker.tick() => callback(),
                }
            }
        });

        info!("{} scheduler started ({}ms)", self.name, period.as_millis());
        self.shutdown_tx = Some(shutdown_tx);
        self.handle = Some(handle);
    }

    /// Signal the task and wait for it to exit. No callback runs after this
    /// returns.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
            info!("{} scheduler stopped", self.name);
        }
    }
}

impl Drop for IntervalScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_fires_once_per_period() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();

        let mut scheduler = IntervalScheduler::new("test");
        scheduler.start(Duration::from_millis(1_000), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(scheduler.is_running());

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);

        scheduler.stop().await;
        assert!(!scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_callbacks_after_stop() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();

        let mut scheduler = IntervalScheduler::new("test");
        scheduler.start(Duration::from_millis(100), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(250)).await;
        scheduler.stop().await;
        let seen = count.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(1_000)).await;
        assert_eq!(count.load(Ordering::SeqCst), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_task() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();

        let mut scheduler = IntervalScheduler::new("test");
        scheduler.start(Duration::from_millis(100), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        drop(scheduler);

        tokio::time::sleep(Duration::from_millis(1_000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_twice_keeps_single_task() {
        let count = Arc::new(AtomicUsize::new(0));
        let a = count.clone();
        let b = count.clone();

        let mut scheduler = IntervalScheduler::new("test");
        scheduler.start(Duration::from_millis(1_000), move || {
            a.fetch_add(1, Ordering::SeqCst);
        });
        scheduler.start(Duration::from_millis(1_000), move || {
            b.fetch_add(100, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
        scheduler.stop().await;
    }
}
