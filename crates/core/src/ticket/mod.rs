//! Ticket numbers handed out on admission.

mod issuer;
mod types;

pub use issuer::TicketIssuer;
pub use types::Ticket;
