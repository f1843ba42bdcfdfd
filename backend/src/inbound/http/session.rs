//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The signed cookie session stores only the authenticated user's email.
//! Handlers turn it into [`SessionCredentials`] and hand those to the domain.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{EmailAddress, Error, SessionCredentials};

pub(crate) const EMAIL_KEY: &str = "email";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Record the authenticated user's email in the session cookie.
    pub fn persist_email(&self, email: &EmailAddress) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(EMAIL_KEY, email.as_ref())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Credentials for the current request. A session that cannot be read is
    /// treated as no session at all.
    pub fn credentials(&self) -> SessionCredentials {
        match self.0.get::<String>(EMAIL_KEY) {
            Ok(Some(email)) => SessionCredentials::for_email(email),
            Ok(None) => SessionCredentials::anonymous(),
            Err(error) => {
                tracing::warn!("unreadable session cookie: {error}");
                SessionCredentials::anonymous()
            }
        }
    }

    /// Drop all session state.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
