//! Driving port for ticket use-cases.
//!
//! Every method takes the caller's [`SessionCredentials`]; the implementation
//! resolves them to a user before touching any store. Ticket ids arrive as the
//! raw path segment: one that is not a UUID names no ticket and yields
//! `not_found`, after the caller has been authenticated.

use async_trait::async_trait;

use crate::domain::{Comment, Error, SessionCredentials, Ticket, TicketDetail};

/// Raw ticket fields as submitted by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTicketRequest {
    pub title: String,
    pub description: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketAccess: Send + Sync {
    /// Fail `unauthorized` unless the credentials name a known user.
    async fn authenticate(&self, credentials: &SessionCredentials) -> Result<(), Error>;

    async fn create_ticket(
        &self,
        credentials: &SessionCredentials,
        request: &CreateTicketRequest,
    ) -> Result<Ticket, Error>;

    async fn list_tickets(&self, credentials: &SessionCredentials) -> Result<Vec<Ticket>, Error>;

    /// Fetch one of the caller's tickets with its comments. Tickets owned by
    /// anyone else are reported as `not_found`.
    async fn get_ticket(
        &self,
        credentials: &SessionCredentials,
        ticket_id: &str,
    ) -> Result<TicketDetail, Error>;

    /// Change the status of one of the caller's tickets. `status` is the raw
    /// wire value and is validated before any write.
    async fn update_ticket_status(
        &self,
        credentials: &SessionCredentials,
        ticket_id: &str,
        status: &str,
    ) -> Result<(), Error>;

    async fn add_comment(
        &self,
        credentials: &SessionCredentials,
        ticket_id: &str,
        body: &str,
    ) -> Result<Comment, Error>;
}
