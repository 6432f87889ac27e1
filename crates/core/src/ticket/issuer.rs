use std::sync::{Mutex, PoisonError};

use super::Ticket;

/// Hands out strictly increasing ticket numbers starting at 1.
///
/// The read-increment-write runs under a single lock so concurrent callers
/// never observe duplicates or gaps.
#[derive(Debug, Default)]
pub struct TicketIssuer {
    last: Mutex<u64>,
}

impl TicketIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next ticket.
    pub fn next_ticket(&self) -> Ticket {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        *last += 1;
        Ticket::new(*last)
    }

    /// Number of tickets issued so far.
    pub fn issued(&self) -> u64 {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
