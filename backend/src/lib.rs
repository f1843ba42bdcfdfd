//! Ticketdesk: a small multi-tenant support-ticket tracker.
//!
//! Users register, sign in with a cookie session, and manage tickets and
//! comments that only they can see. Ownership is enforced by the repository
//! queries themselves: every ticket read or write names the caller's id.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
