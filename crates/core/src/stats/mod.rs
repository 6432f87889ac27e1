//! Latency statistics for the admission path.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use serde::Serialize;

/// Point-in-time view of the admission statistics.
///
/// Elapsed time is accounted in whole microseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub count: u64,
    pub total_elapsed_micros: u64,
}

impl StatsSnapshot {
    /// Truncating average in microseconds; 0 when nothing was recorded.
    pub fn average_micros(&self) -> u64 {
        if self.count == 0 {
            return 0;
        }
        self.total_elapsed_micros / self.count
    }

    pub fn average(&self) -> Duration {
        Duration::from_micros(self.average_micros())
    }

    pub fn total_elapsed(&self) -> Duration {
        Duration::from_micros(self.total_elapsed_micros)
    }
}

/// Accumulates the count and total elapsed time of admission calls.
///
/// Both fields live under one lock so a snapshot never sees a count without
/// its elapsed amount.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    inner: RwLock<StatsSnapshot>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed admission.
    pub fn record(&self, elapsed: Duration) {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.count += 1;
        inner.total_elapsed_micros = inner.total_elapsed_micros.saturating_add(micros);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        *self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }
}
