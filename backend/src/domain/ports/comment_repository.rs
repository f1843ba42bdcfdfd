//! Port abstraction for ticket comments.
use async_trait::async_trait;

use crate::domain::{Comment, CommentBody, CommentWithAuthor, TicketId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by comment repository adapters.
    pub enum CommentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comment repository query failed: {message}",
        /// The referenced ticket does not exist.
        TicketMissing { ticket_id: String } => "ticket {ticket_id} does not exist",
    }
}

/// Comment storage.
///
/// Adapters check referential integrity only. Callers must confirm the author
/// owns the ticket before calling [`CommentRepository::create`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(
        &self,
        ticket_id: &TicketId,
        author_id: &UserId,
        body: &CommentBody,
    ) -> Result<Comment, CommentRepositoryError>;

    /// Comments on a ticket with their authors, oldest first.
    async fn list_for_ticket(
        &self,
        ticket_id: &TicketId,
    ) -> Result<Vec<CommentWithAuthor>, CommentRepositoryError>;
}
