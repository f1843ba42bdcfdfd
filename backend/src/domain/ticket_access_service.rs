//! Ticket use-cases bound to the calling user.
//!
//! Each operation resolves the caller first and then passes the caller's id
//! into every repository call. Ownership is never checked after a fetch: a
//! ticket that belongs to someone else is simply not returned by the store.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    CommentRepository, CommentRepositoryError, CreateTicketRequest, TicketAccess,
    TicketRepository, TicketRepositoryError, UserRepository,
};
use crate::domain::session_resolver::SessionResolver;
use crate::domain::{
    Comment, CommentBody, Error, SessionCredentials, Ticket, TicketDetail, TicketDraft, TicketId,
    TicketStatus, TicketValidationError,
};

fn map_ticket_repository_error(error: TicketRepositoryError) -> Error {
    match error {
        TicketRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("ticket repository unavailable: {message}"))
        }
        TicketRepositoryError::Query { message } => {
            Error::internal(format!("ticket repository error: {message}"))
        }
    }
}

fn map_comment_repository_error(error: CommentRepositoryError) -> Error {
    match error {
        CommentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("comment repository unavailable: {message}"))
        }
        CommentRepositoryError::Query { message } => {
            Error::internal(format!("comment repository error: {message}"))
        }
        CommentRepositoryError::TicketMissing { .. } => ticket_not_found(),
    }
}

fn map_ticket_validation_error(error: TicketValidationError) -> Error {
    Error::invalid_field(error.field(), error.to_string())
}

fn ticket_not_found() -> Error {
    Error::not_found("ticket not found")
}

fn parse_ticket_id(raw: &str) -> Result<TicketId, Error> {
    TicketId::parse(raw).ok_or_else(ticket_not_found)
}

/// Ticket service implementing [`TicketAccess`].
pub struct TicketAccessService<U, T, C> {
    resolver: SessionResolver<U>,
    tickets: Arc<T>,
    comments: Arc<C>,
}

impl<U, T, C> TicketAccessService<U, T, C>
where
    U: UserRepository,
{
    pub fn new(users: Arc<U>, tickets: Arc<T>, comments: Arc<C>) -> Self {
        Self {
            resolver: SessionResolver::new(users),
            tickets,
            comments,
        }
    }
}

#[async_trait]
impl<U, T, C> TicketAccess for TicketAccessService<U, T, C>
where
    U: UserRepository,
    T: TicketRepository,
    C: CommentRepository,
{
    async fn authenticate(&self, credentials: &SessionCredentials) -> Result<(), Error> {
        self.resolver.resolve(credentials).await.map(drop)
    }

    async fn create_ticket(
        &self,
        credentials: &SessionCredentials,
        request: &CreateTicketRequest,
    ) -> Result<Ticket, Error> {
        let user = self.resolver.resolve(credentials).await?;
        let draft = TicketDraft::try_from_parts(&request.title, &request.description)
            .map_err(map_ticket_validation_error)?;

        let ticket = self
            .tickets
            .create(user.id(), &draft)
            .await
            .map_err(map_ticket_repository_error)?;
        debug!(ticket_id = %ticket.id, owner_id = %user.id(), "ticket created");
        Ok(ticket)
    }

    async fn list_tickets(&self, credentials: &SessionCredentials) -> Result<Vec<Ticket>, Error> {
        let user = self.resolver.resolve(credentials).await?;
        self.tickets
            .list_by_owner(user.id())
            .await
            .map_err(map_ticket_repository_error)
    }

    async fn get_ticket(
        &self,
        credentials: &SessionCredentials,
        ticket_id: &str,
    ) -> Result<TicketDetail, Error> {
        let user = self.resolver.resolve(credentials).await?;
        let ticket_id = parse_ticket_id(ticket_id)?;
        let ticket = self
            .tickets
            .find_for_owner(user.id(), &ticket_id)
            .await
            .map_err(map_ticket_repository_error)?
            .ok_or_else(ticket_not_found)?;

        let comments = self
            .comments
            .list_for_ticket(&ticket.id)
            .await
            .map_err(map_comment_repository_error)?;

        Ok(TicketDetail { ticket, comments })
    }

    async fn update_ticket_status(
        &self,
        credentials: &SessionCredentials,
        ticket_id: &str,
        status: &str,
    ) -> Result<(), Error> {
        let user = self.resolver.resolve(credentials).await?;
        let status: TicketStatus = status.parse().map_err(map_ticket_validation_error)?;
        let ticket_id = parse_ticket_id(ticket_id)?;

        let updated = self
            .tickets
            .update_status_for_owner(user.id(), &ticket_id, status)
            .await
            .map_err(map_ticket_repository_error)?;
        if updated == 0 {
            return Err(ticket_not_found());
        }
        debug!(%ticket_id, %status, "ticket status updated");
        Ok(())
    }

    async fn add_comment(
        &self,
        credentials: &SessionCredentials,
        ticket_id: &str,
        body: &str,
    ) -> Result<Comment, Error> {
        let user = self.resolver.resolve(credentials).await?;
        let body =
            CommentBody::new(body).map_err(|err| Error::invalid_field("body", err.to_string()))?;
        let ticket_id = parse_ticket_id(ticket_id)?;

        let ticket = self
            .tickets
            .find_for_owner(user.id(), &ticket_id)
            .await
            .map_err(map_ticket_repository_error)?
            .ok_or_else(ticket_not_found)?;

        self.comments
            .create(&ticket.id, user.id(), &body)
            .await
            .map_err(map_comment_repository_error)
    }
}

#[cfg(test)]
#[path = "ticket_access_service_tests.rs"]
mod tests;
