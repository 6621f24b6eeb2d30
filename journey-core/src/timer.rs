//! Owned timer handles.
//!
//! Every suspension point in the journey (the mismatch settle delay, the
//! completion celebration, progress sampling, the letter reveal) is a
//! `ScopedTimer`. Dropping or cancelling the handle aborts the underlying
//! tokio task, so a timer never outlives the state that scheduled it.
//!
//! Callbacks should still hold only a `Weak` reference to their state and
//! compare an [`Epoch`] captured when they were scheduled: abort takes effect
//! at the task's next yield, so a callback that was already running when
//! its owner reset must be able to tell that it is stale.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Shortest period a repeating timer runs at.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Whether a repeating timer should keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Continue,
    Stop,
}

/// Monotonic generation counter used to detect stale callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, PartialOrd, Ord)]
pub struct Epoch(u64);

impl Epoch {
    /// Advance to the next generation, invalidating everything scheduled
    /// against the previous one.
    pub fn bump(&mut self) -> Epoch {
        self.0 = self.0.wrapping_add(1);
        *self
    }
}

/// A spawned delay or loop that is aborted when the handle goes away.
///
/// Must be created from within a tokio runtime.
#[derive(Debug)]
pub struct ScopedTimer {
    label: &'static str,
    handle: JoinHandle<()>,
}

impl ScopedTimer {
    /// Run `callback` once after `delay`.
    pub fn after<F>(label: &'static str, delay: Duration, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        });
        Self { label, handle }
    }

    /// Run `callback` every `period` until it returns [`Tick::Stop`].
    ///
    /// The first call happens one full period after scheduling. A period
    /// below [`MIN_PERIOD`] is raised to it.
    pub fn every<F>(label: &'static str, period: Duration, mut callback: F) -> Self
    where
        F: FnMut() -> Tick + Send + 'static,
    {
        let period = period.max(MIN_PERIOD);
        let handle = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if callback() == Tick::Stop {
                    break;
                }
            }
        });
        Self { label, handle }
    }

    /// Whether the task has run to completion (or was aborted).
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancel explicitly. Equivalent to dropping the handle.
    pub fn cancel(self) {}
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            debug!(timer = self.label, "timer: cancelled");
            self.handle.abort();
        }
    }
}

/// Lock a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_after_fires_once() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let timer = ScopedTimer::after("test", Duration::from_millis(100), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(timer.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_delay() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let timer = ScopedTimer::after("test", Duration::from_millis(100), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        drop(timer);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_stops_when_asked() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let timer = ScopedTimer::every("test", Duration::from_millis(10), move || {
            if counter.fetch_add(1, Ordering::SeqCst) + 1 == 3 {
                Tick::Stop
            } else {
                Tick::Continue
            }
        });

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert!(timer.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_loop() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let timer = ScopedTimer::every("test", Duration::from_millis(10), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Tick::Continue
        });

        tokio::time::sleep(Duration::from_millis(35)).await;
        timer.cancel();
        let seen = hits.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(hits.load(Ordering::SeqCst), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_with_zero_period_still_ticks() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let timer = ScopedTimer::every("test", Duration::ZERO, move || {
            if counter.fetch_add(1, Ordering::SeqCst) + 1 == 5 {
                Tick::Stop
            } else {
                Tick::Continue
            }
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 5);
        assert!(timer.is_finished());
    }

    #[test]
    fn test_epoch_bump() {
        let mut epoch = Epoch::default();
        let first = epoch;
        assert_ne!(epoch.bump(), first);
    }
}
