//! Storage for completed digests, keyed by ticket.

mod memory;

pub use memory::MemoryResultStore;

use thiserror::Error;

use crate::ticket::Ticket;

/// Error type for result store operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A result for this ticket was already written; the stored value is kept.
    #[error("Result already present for ticket {0}")]
    AlreadyPresent(Ticket),
}

/// Trait for result storage backends.
///
/// Absence of a key means "not computed yet"; callers cannot tell that apart
/// from a ticket that was never issued.
pub trait ResultStore: Send + Sync {
    /// Insert the result for a ticket. The first write wins.
    fn put(&self, ticket: Ticket, value: String) -> Result<(), StoreError>;

    /// Look up the result for a ticket.
    fn get(&self, ticket: Ticket) -> Option<String>;

    /// Number of stored results.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
