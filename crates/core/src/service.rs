//! The hashing service context: owns every piece of shared state.

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::warn;

use crate::config::JobsConfig;
use crate::jobs::{Digester, JobDispatcher, JobTracker, Payload, Sha512Digester};
use crate::metrics::{ADMISSIONS_REJECTED, TICKETS_ISSUED};
use crate::shutdown::{ShutdownCoordinator, ShutdownState};
use crate::stats::{StatsAggregator, StatsSnapshot};
use crate::store::{MemoryResultStore, ResultStore};
use crate::ticket::{Ticket, TicketIssuer};

/// Errors from the admission path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdmissionError {
    /// Shutdown has started; no new jobs are accepted.
    #[error("Service is shutting down")]
    ShuttingDown,
}

/// Explicit service context for the deferred hashing pipeline.
///
/// Construct one per process and share it behind an `Arc`.
pub struct HashService {
    issuer: TicketIssuer,
    store: Arc<dyn ResultStore>,
    stats: StatsAggregator,
    dispatcher: JobDispatcher,
    shutdown: ShutdownCoordinator,
}

impl HashService {
    /// Create a service with the in-memory store and the SHA-512 digester.
    pub fn new(config: &JobsConfig) -> Self {
        Self::with_components(
            Arc::new(MemoryResultStore::new()),
            Arc::new(Sha512Digester::new()),
            config.delay(),
        )
    }

    /// Create a service from explicit components.
    pub fn with_components(
        store: Arc<dyn ResultStore>,
        digester: Arc<dyn Digester>,
        delay: Duration,
    ) -> Self {
        let tracker = JobTracker::new();
        let dispatcher = JobDispatcher::new(Arc::clone(&store), digester, tracker.clone(), delay);

        Self {
            issuer: TicketIssuer::new(),
            store,
            stats: StatsAggregator::new(),
            dispatcher,
            shutdown: ShutdownCoordinator::new(tracker),
        }
    }

    /// Issue a ticket and start its hashing job. Never waits for the job.
    ///
    /// Must be called from within a tokio runtime.
    pub fn admit(&self, payload: Payload) -> Result<Ticket, AdmissionError> {
        let _reservation = self.dispatcher.tracker().reserve();

        if !self.shutdown.is_accepting() {
            ADMISSIONS_REJECTED.inc();
            warn!("Rejecting admission: service is shutting down");
            return Err(AdmissionError::ShuttingDown);
        }

        let ticket = self.issuer.next_ticket();
        TICKETS_ISSUED.inc();
        // Detached: the job holds its own tracker registration.
        drop(self.dispatcher.dispatch(ticket, payload));
        Ok(ticket)
    }

    /// [`admit`](Self::admit), recording the elapsed time of successful calls.
    pub fn admit_timed(&self, payload: Payload) -> Result<Ticket, AdmissionError> {
        let start = Instant::now();
        let ticket = self.admit(payload)?;
        self.stats.record(start.elapsed());
        Ok(ticket)
    }

    /// Record the duration of an admission measured by an outer layer.
    pub fn record_admission(&self, elapsed: Duration) {
        self.stats.record(elapsed);
    }

    /// Look up a finished digest. `None` covers both "pending" and "never issued".
    pub fn lookup(&self, ticket: Ticket) -> Option<String> {
        self.store.get(ticket)
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn store(&self) -> &Arc<dyn ResultStore> {
        &self.store
    }

    pub fn issued(&self) -> u64 {
        self.issuer.issued()
    }

    /// Jobs not yet finished, including admissions in progress.
    pub fn pending_jobs(&self) -> usize {
        self.dispatcher.tracker().pending()
    }

    pub fn job_delay(&self) -> Duration {
        self.dispatcher.delay()
    }

    pub fn shutdown(&self) -> &ShutdownCoordinator {
        &self.shutdown
    }

    pub fn state(&self) -> ShutdownState {
        self.shutdown.state()
    }

    /// Stop admitting and wait for every dispatched job to finish.
    pub async fn drain(&self) {
        self.shutdown.drain().await;
    }
}
