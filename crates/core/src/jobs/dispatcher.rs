//! Spawns delayed hashing jobs and writes their results to the store.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::digest::{Digester, Payload};
use super::tracker::JobTracker;
use crate::metrics::{JOBS_FINISHED, JOB_DURATION};
use crate::store::ResultStore;
use crate::ticket::Ticket;

/// How a single hashing job ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// Digest computed and written to the store.
    Stored,
    /// Digest computation failed; nothing was written.
    DigestFailed,
    /// The store already held a result for this ticket.
    StoreRejected,
}

impl JobOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobOutcome::Stored => "stored",
            JobOutcome::DigestFailed => "digest_failed",
            JobOutcome::StoreRejected => "store_rejected",
        }
    }
}

/// Starts one independent background task per ticket.
///
/// Every job is registered with the [`JobTracker`] before it is spawned and
/// deregistered when it finishes, so a drain never misses a running job.
pub struct JobDispatcher {
    store: Arc<dyn ResultStore>,
    digester: Arc<dyn Digester>,
    tracker: JobTracker,
    delay: Duration,
}

impl JobDispatcher {
    pub fn new(
        store: Arc<dyn ResultStore>,
        digester: Arc<dyn Digester>,
        tracker: JobTracker,
        delay: Duration,
    ) -> Self {
        Self {
            store,
            digester,
            tracker,
            delay,
        }
    }

    /// Configured delay before each job computes its digest.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn tracker(&self) -> &JobTracker {
        &self.tracker
    }

    /// Start the job for `ticket` and return without waiting for it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, ticket: Ticket, payload: Payload) -> JoinHandle<JobOutcome> {
        let guard = self.tracker.register();
        let store = Arc::clone(&self.store);
        let digester = Arc::clone(&self.digester);
        let delay = self.delay;

        debug!("Dispatching hashing job for ticket {}", ticket);

        tokio::spawn(async move {
            let _guard = guard;
            let started = Instant::now();

            tokio::time::sleep(delay).await;
            let outcome = run_job(ticket, &payload, digester.as_ref(), store.as_ref());

            JOBS_FINISHED.with_label_values(&[outcome.as_str()]).inc();
            JOB_DURATION
                .with_label_values(&[outcome.as_str()])
                .observe(started.elapsed().as_secs_f64());
            outcome
        })
    }
}

fn run_job(
    ticket: Ticket,
    payload: &Payload,
    digester: &dyn Digester,
    store: &dyn ResultStore,
) -> JobOutcome {
    let digest = match digester.digest(payload) {
        Ok(digest) => digest,
        Err(e) => {
            error!("Hashing error for ticket {}: {}", ticket, e);
            return JobOutcome::DigestFailed;
        }
    };

    match store.put(ticket, digest) {
        Ok(()) => {
            info!("Password with ticket {} was hashed", ticket);
            JobOutcome::Stored
        }
        Err(e) => {
            warn!("Discarding duplicate result: {}", e);
            JobOutcome::StoreRejected
        }
    }
}
