//! Mock digesters for testing.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::jobs::{DigestError, Digester, Payload, Sha512Digester};

/// Digester that always fails, for exercising the dropped-result path.
#[derive(Debug, Clone, Default)]
pub struct FailingDigester {
    reason: String,
}

impl FailingDigester {
    pub fn new() -> Self {
        Self::with_reason("mock digest failure")
    }

    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Digester for FailingDigester {
    fn name(&self) -> &str {
        "failing"
    }

    fn digest(&self, _payload: &Payload) -> Result<String, DigestError> {
        Err(DigestError::Failed {
            reason: self.reason.clone(),
        })
    }
}

/// SHA-512 digester that counts calls and can be told to fail the next one.
///
/// Clones share state, so a test can keep one clone for assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingDigester {
    calls: Arc<AtomicUsize>,
    fail_next: Arc<AtomicBool>,
}

impl RecordingDigester {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of digest calls so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make the next digest call fail.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

impl Digester for RecordingDigester {
    fn name(&self) -> &str {
        "recording"
    }

    fn digest(&self, payload: &Payload) -> Result<String, DigestError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(DigestError::Failed {
                reason: "injected failure".to_string(),
            });
        }
        Sha512Digester::new().digest(payload)
    }
}
