//! Port abstraction for ticket persistence.
//!
//! Every method takes the owning user's id. There is intentionally no way to
//! read or modify a ticket without naming its owner, so adapters cannot leak
//! another user's tickets.
use async_trait::async_trait;

use crate::domain::{Ticket, TicketDraft, TicketId, TicketStatus, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by ticket repository adapters.
    pub enum TicketRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "ticket repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "ticket repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Store a new `OPEN` ticket owned by `owner`.
    async fn create(
        &self,
        owner: &UserId,
        draft: &TicketDraft,
    ) -> Result<Ticket, TicketRepositoryError>;

    /// All tickets owned by `owner`, newest first.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Ticket>, TicketRepositoryError>;

    /// Fetch a ticket only if it exists and belongs to `owner`.
    async fn find_for_owner(
        &self,
        owner: &UserId,
        ticket_id: &TicketId,
    ) -> Result<Option<Ticket>, TicketRepositoryError>;

    /// Set the status of a ticket belonging to `owner` in a single conditional
    /// write. Returns the number of rows changed: `0` when the ticket is absent
    /// or owned by someone else.
    async fn update_status_for_owner(
        &self,
        owner: &UserId,
        ticket_id: &TicketId,
        status: TicketStatus,
    ) -> Result<u64, TicketRepositoryError>;
}
