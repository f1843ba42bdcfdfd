//! Domain model and use-cases.
//!
//! Everything in here is transport and storage agnostic. Adapters in
//! `inbound` and `outbound` talk to the domain only through [`ports`].

pub mod account_service;
pub mod auth;
pub mod comment;
pub mod error;
pub mod ports;
pub mod session_resolver;
pub mod ticket;
pub mod ticket_access_service;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    CredentialsValidationError, LoginCredentials, PASSWORD_MAX, PASSWORD_MIN, Registration,
    SessionCredentials,
};
pub use self::comment::{
    COMMENT_BODY_MAX, Comment, CommentAuthor, CommentBody, CommentId, CommentValidationError,
    CommentWithAuthor,
};
pub use self::error::{Error, ErrorCode, REDACTED_MESSAGE, TRACE_ID_HEADER};
pub use self::session_resolver::SessionResolver;
pub use self::ticket::{
    DESCRIPTION_MAX, DESCRIPTION_MIN, TITLE_MAX, TITLE_MIN, Ticket, TicketDescription,
    TicketDetail, TicketDraft, TicketId, TicketStatus, TicketTitle, TicketValidationError,
};
pub use self::ticket_access_service::TicketAccessService;
pub use self::trace_id::TraceId;
pub use self::user::{
    DisplayName, EmailAddress, NewUser, PasswordHash, User, UserCredentials, UserId,
    UserValidationError,
};
