//! Background hashing jobs.
//!
//! A job waits the configured delay, hashes its payload and stores the
//! encoded digest under its ticket. Jobs are never cancelled; shutdown only
//! waits for them through the [`JobTracker`].

mod digest;
mod dispatcher;
mod tracker;

pub use digest::{DigestError, Digester, Payload, Sha512Digester};
pub use dispatcher::{JobDispatcher, JobOutcome};
pub use tracker::{JobGuard, JobTracker};
