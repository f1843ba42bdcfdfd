//! OpenAPI document for the REST API.
//!
//! Served at `/api-docs/openapi.json` with Swagger UI at `/docs` in debug
//! builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::accounts::{LoginRequest, OkResponse, RegisterRequest};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::tickets::{
    AddCommentBody, CommentAuthorResponse, CommentResponse, CreateTicketBody,
    TicketCommentResponse, TicketDetailResponse, TicketResponse, UpdateTicketBody,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Signed session cookie issued by POST /api/login.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Ticketdesk API",
        description = "Support tickets scoped to the signed-in user."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::tickets::list_tickets,
        crate::inbound::http::tickets::create_ticket,
        crate::inbound::http::tickets::get_ticket,
        crate::inbound::http::tickets::update_ticket,
        crate::inbound::http::tickets::add_comment,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        OkResponse,
        RegisterRequest,
        LoginRequest,
        TicketResponse,
        TicketDetailResponse,
        TicketCommentResponse,
        CommentResponse,
        CommentAuthorResponse,
        CreateTicketBody,
        UpdateTicketBody,
        AddCommentBody,
    )),
    tags(
        (name = "accounts", description = "Registration and session management"),
        (name = "tickets", description = "Tickets and comments owned by the caller"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
