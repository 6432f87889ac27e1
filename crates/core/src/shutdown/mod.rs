//! Graceful shutdown: stop admitting, then drain pending jobs.
//!
//! State machine: `Running` -> `Draining` (on trigger) -> `Terminated`
//! (once no job is pending). Jobs are never cancelled and the drain has no
//! timeout.

use std::future::Future;

use serde::Serialize;
use tokio::sync::watch;
use tracing::info;

use crate::jobs::JobTracker;

/// Lifecycle state of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutdownState {
    Running,
    Draining,
    Terminated,
}

impl ShutdownState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShutdownState::Running => "running",
            ShutdownState::Draining => "draining",
            ShutdownState::Terminated => "terminated",
        }
    }
}

/// Coordinates the transition from serving to a drained, terminated service.
pub struct ShutdownCoordinator {
    state: watch::Sender<ShutdownState>,
    tracker: JobTracker,
}

impl ShutdownCoordinator {
    pub fn new(tracker: JobTracker) -> Self {
        let (state, _) = watch::channel(ShutdownState::Running);
        Self { state, tracker }
    }

    pub fn state(&self) -> ShutdownState {
        *self.state.borrow()
    }

    /// Whether new admissions are accepted.
    pub fn is_accepting(&self) -> bool {
        self.state() == ShutdownState::Running
    }

    /// Request shutdown. Returns `true` only for the call that moved the
    /// service out of `Running`; later calls are no-ops.
    pub fn trigger(&self) -> bool {
        let triggered = self.state.send_if_modified(|state| {
            if *state == ShutdownState::Running {
                *state = ShutdownState::Draining;
                true
            } else {
                false
            }
        });

        if triggered {
            info!(
                "Shutdown requested, {} job(s) pending",
                self.tracker.pending()
            );
        }
        triggered
    }

    /// Future that completes once shutdown has been triggered.
    ///
    /// Used to stop the listener; it does not wait for the drain.
    pub fn signalled(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.state.subscribe();
        async move {
            let _ = rx.wait_for(|state| *state != ShutdownState::Running).await;
        }
    }

    /// Stop admitting (if not already) and wait until every pending job has
    /// finished, then mark the service terminated.
    pub async fn drain(&self) {
        self.trigger();

        let pending = self.tracker.pending();
        if pending > 0 {
            info!("Draining {} pending job(s)", pending);
        }

        self.tracker.wait_idle().await;
        self.state.send_replace(ShutdownState::Terminated);
        info!("Drain complete, {} job(s) finished", self.tracker.finished());
    }
}
