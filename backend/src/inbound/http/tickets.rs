//! Ticket API handlers.
//!
//! ```text
//! GET   /api/tickets
//! POST  /api/tickets               {"title":"Printer","description":"Paper jam again"}
//! GET   /api/tickets/{id}
//! PATCH /api/tickets/{id}          {"status":"IN_PROGRESS"}
//! POST  /api/tickets/{id}/comments {"body":"Still broken"}
//! ```
//!
//! Handlers only translate between JSON and the [`TicketAccess`] port. The
//! caller's session is always passed through; the port decides who may see
//! what.
//!
//! [`TicketAccess`]: crate::domain::ports::TicketAccess

use actix_web::{HttpResponse, get, patch, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::CreateTicketRequest;
use crate::domain::{
    Comment, CommentWithAuthor, Error, SessionCredentials, Ticket, TicketDetail, TicketStatus,
};
use crate::inbound::http::{ApiResult, invalid_body};
use crate::inbound::http::accounts::OkResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Ticket as returned to its owner.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[schema(value_type = String, example = "OPEN")]
    pub status: TicketStatus,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<Ticket> for TicketResponse {
    fn from(ticket: Ticket) -> Self {
        Self {
            id: *ticket.id.as_uuid(),
            title: ticket.title,
            description: ticket.description,
            status: ticket.status,
            owner_id: *ticket.owner_id.as_uuid(),
            created_at: ticket.created_at,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: *comment.id.as_uuid(),
            ticket_id: *comment.ticket_id.as_uuid(),
            author_id: *comment.author_id.as_uuid(),
            body: comment.body,
            created_at: comment.created_at,
        }
    }
}

/// Public author fields shown with each comment.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CommentAuthorResponse {
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TicketCommentResponse {
    #[serde(flatten)]
    pub comment: CommentResponse,
    pub author: CommentAuthorResponse,
}

impl From<CommentWithAuthor> for TicketCommentResponse {
    fn from(value: CommentWithAuthor) -> Self {
        Self {
            comment: value.comment.into(),
            author: CommentAuthorResponse {
                email: value.author.email.into(),
                name: value.author.display_name.map(Into::into),
            },
        }
    }
}

/// Ticket with its comments, oldest comment first.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TicketDetailResponse {
    #[serde(flatten)]
    pub ticket: TicketResponse,
    pub comments: Vec<TicketCommentResponse>,
}

impl From<TicketDetail> for TicketDetailResponse {
    fn from(detail: TicketDetail) -> Self {
        Self {
            ticket: detail.ticket.into(),
            comments: detail.comments.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateTicketBody {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdateTicketBody {
    /// One of `OPEN`, `IN_PROGRESS`, `RESOLVED`.
    #[schema(example = "IN_PROGRESS")]
    pub status: String,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AddCommentBody {
    pub body: String,
}

/// Unwraps a JSON body. A body that failed to parse is reported only once
/// the caller is known, so anonymous requests always see `unauthorized`.
async fn authenticated_body<T>(
    state: &HttpState,
    credentials: &SessionCredentials,
    payload: Result<web::Json<T>, actix_web::Error>,
) -> ApiResult<T> {
    match payload {
        Ok(body) => Ok(body.into_inner()),
        Err(err) => {
            state.tickets.authenticate(credentials).await?;
            Err(err.as_error::<Error>().cloned().unwrap_or_else(invalid_body))
        }
    }
}

/// List the caller's tickets, newest first.
#[utoipa::path(
    get,
    path = "/api/tickets",
    responses(
        (status = 200, description = "Tickets owned by the caller", body = [TicketResponse]),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "listTickets"
)]
#[get("/tickets")]
pub async fn list_tickets(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<TicketResponse>>> {
    let tickets = state.tickets.list_tickets(&session.credentials()).await?;
    Ok(web::Json(tickets.into_iter().map(Into::into).collect()))
}

/// Open a new ticket owned by the caller.
#[utoipa::path(
    post,
    path = "/api/tickets",
    request_body = CreateTicketBody,
    responses(
        (status = 201, description = "Ticket created", body = TicketResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "createTicket"
)]
#[post("/tickets")]
pub async fn create_ticket(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: Result<web::Json<CreateTicketBody>, actix_web::Error>,
) -> ApiResult<HttpResponse> {
    let credentials = session.credentials();
    let CreateTicketBody { title, description } =
        authenticated_body(&state, &credentials, payload).await?;
    let ticket = state
        .tickets
        .create_ticket(&credentials, &CreateTicketRequest { title, description })
        .await?;
    Ok(HttpResponse::Created().json(TicketResponse::from(ticket)))
}

/// Fetch one of the caller's tickets with its comments.
#[utoipa::path(
    get,
    path = "/api/tickets/{id}",
    params(("id" = String, Path, description = "Ticket identifier")),
    responses(
        (status = 200, description = "Ticket and comments", body = TicketDetailResponse),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "No such ticket for this caller", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "getTicket"
)]
#[get("/tickets/{id}")]
pub async fn get_ticket(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<TicketDetailResponse>> {
    let detail = state
        .tickets
        .get_ticket(&session.credentials(), &path.into_inner())
        .await?;
    Ok(web::Json(detail.into()))
}

/// Change the status of one of the caller's tickets.
#[utoipa::path(
    patch,
    path = "/api/tickets/{id}",
    params(("id" = String, Path, description = "Ticket identifier")),
    request_body = UpdateTicketBody,
    responses(
        (status = 200, description = "Status updated", body = OkResponse),
        (status = 400, description = "Unknown status", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "No such ticket for this caller", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "updateTicketStatus"
)]
#[patch("/tickets/{id}")]
pub async fn update_ticket(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: Result<web::Json<UpdateTicketBody>, actix_web::Error>,
) -> ApiResult<HttpResponse> {
    let credentials = session.credentials();
    let UpdateTicketBody { status } = authenticated_body(&state, &credentials, payload).await?;
    state
        .tickets
        .update_ticket_status(&credentials, &path.into_inner(), &status)
        .await?;
    Ok(OkResponse::respond())
}

/// Comment on one of the caller's tickets.
#[utoipa::path(
    post,
    path = "/api/tickets/{id}/comments",
    params(("id" = String, Path, description = "Ticket identifier")),
    request_body = AddCommentBody,
    responses(
        (status = 201, description = "Comment added", body = CommentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "No such ticket for this caller", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "addComment"
)]
#[post("/tickets/{id}/comments")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: Result<web::Json<AddCommentBody>, actix_web::Error>,
) -> ApiResult<HttpResponse> {
    let credentials = session.credentials();
    let AddCommentBody { body } = authenticated_body(&state, &credentials, payload).await?;
    let comment = state
        .tickets
        .add_comment(&credentials, &path.into_inner(), &body)
        .await?;
    Ok(HttpResponse::Created().json(CommentResponse::from(comment)))
}

#[cfg(test)]
#[path = "tickets_tests.rs"]
mod tests;
