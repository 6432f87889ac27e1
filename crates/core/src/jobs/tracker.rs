//! Outstanding-job accounting used to drain on shutdown.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

use crate::metrics::JOBS_PENDING;

#[derive(Debug, Default)]
struct TrackerInner {
    pending: AtomicUsize,
    started: AtomicU64,
    finished: AtomicU64,
    idle: Notify,
}

/// Counts jobs that were registered but have not finished yet.
///
/// Cheaply cloneable; all clones share one counter.
#[derive(Debug, Clone, Default)]
pub struct JobTracker {
    inner: Arc<TrackerInner>,
}

impl JobTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job. The job counts as pending until the returned guard is dropped.
    #[must_use = "the job is deregistered as soon as the guard is dropped"]
    pub fn register(&self) -> JobGuard {
        self.inner.pending.fetch_add(1, Ordering::SeqCst);
        self.inner.started.fetch_add(1, Ordering::Relaxed);
        JOBS_PENDING.inc();
        JobGuard {
            tracker: self.clone(),
            job: true,
        }
    }

    /// Hold the tracker non-idle without counting a job.
    ///
    /// Keeps a drain from completing while an admission is between its
    /// accepting check and the dispatch.
    #[must_use = "the reservation is released as soon as the guard is dropped"]
    pub fn reserve(&self) -> JobGuard {
        self.inner.pending.fetch_add(1, Ordering::SeqCst);
        JobGuard {
            tracker: self.clone(),
            job: false,
        }
    }

    /// Jobs registered and not yet finished, plus outstanding reservations.
    pub fn pending(&self) -> usize {
        self.inner.pending.load(Ordering::SeqCst)
    }

    /// Jobs registered since creation.
    pub fn started(&self) -> u64 {
        self.inner.started.load(Ordering::Relaxed)
    }

    /// Jobs finished since creation, whatever their outcome.
    pub fn finished(&self) -> u64 {
        self.inner.finished.load(Ordering::Relaxed)
    }

    /// Wait until no job is pending. Returns immediately if none is.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            // Register interest before checking so a wakeup between the check
            // and the await is not missed.
            notified.as_mut().enable();

            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }

    fn release(&self, job: bool) {
        if job {
            self.inner.finished.fetch_add(1, Ordering::Relaxed);
            JOBS_PENDING.dec();
        }
        if self.inner.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.inner.idle.notify_waiters();
        }
    }
}

/// Deregisters its job when dropped, on success, failure or panic alike.
#[derive(Debug)]
pub struct JobGuard {
    tracker: JobTracker,
    job: bool,
}

impl Drop for JobGuard {
    fn drop(&mut self) {
        self.tracker.release(self.job);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_register_and_drop_updates_counts() {
        let tracker = JobTracker::new();
        assert_eq!(tracker.pending(), 0);

        let guard = tracker.register();
        assert_eq!(tracker.pending(), 1);
        assert_eq!(tracker.started(), 1);
        assert_eq!(tracker.finished(), 0);

        drop(guard);
        assert_eq!(tracker.pending(), 0);
        assert_eq!(tracker.finished(), 1);
    }

    #[test]
    fn test_clones_share_counter() {
        let tracker = JobTracker::new();
        let clone = tracker.clone();

        let _guard = clone.register();
        assert_eq!(tracker.pending(), 1);
    }

    #[test]
    fn test_reservation_blocks_idle_but_is_not_a_job() {
        let tracker = JobTracker::new();
        let reservation = tracker.reserve();
        assert_eq!(tracker.pending(), 1);
        assert_eq!(tracker.started(), 0);

        drop(reservation);
        assert_eq!(tracker.pending(), 0);
        assert_eq!(tracker.finished(), 0);
    }

    #[tokio::test]
    async fn test_wait_idle_returns_immediately_when_empty() {
        let tracker = JobTracker::new();
        tokio::time::timeout(Duration::from_millis(100), tracker.wait_idle())
            .await
            .expect("wait_idle should not block with no pending jobs");
    }

    #[tokio::test]
    async fn test_wait_idle_waits_for_all_guards() {
        let tracker = JobTracker::new();
        let first = tracker.register();
        let second = tracker.register();

        let waiter = {
            let tracker = tracker.clone();
            tokio::spawn(async move { tracker.wait_idle().await })
        };

        drop(first);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished(), "one job is still pending");

        drop(second);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should finish once idle")
            .unwrap();
    }

    #[tokio::test]
    async fn test_guard_released_when_task_panics() {
        let tracker = JobTracker::new();
        let guard = tracker.register();

        let handle = tokio::spawn(async move {
            let _guard = guard;
            panic!("job blew up");
        });
        assert!(handle.await.is_err());

        assert_eq!(tracker.pending(), 0);
        tokio::time::timeout(Duration::from_millis(100), tracker.wait_idle())
            .await
            .expect("panicked job must not block drain");
    }
}
