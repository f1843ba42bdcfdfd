//! Resolve per-request session credentials to a stored user.

use std::sync::Arc;

use tracing::warn;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, Error, SessionCredentials, User};

pub(crate) fn map_user_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => Error::conflict("email already used"),
    }
}

/// Turns session evidence into the [`User`] it names.
///
/// Both a missing session and a session naming an unknown email fail with
/// `unauthorized`. The resolver never reports `not_found`.
pub struct SessionResolver<U> {
    users: Arc<U>,
}

impl<U> Clone for SessionResolver<U> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
        }
    }
}

impl<U> SessionResolver<U>
where
    U: UserRepository,
{
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    pub async fn resolve(&self, credentials: &SessionCredentials) -> Result<User, Error> {
        let raw = credentials
            .email()
            .ok_or_else(|| Error::unauthorized("login required"))?;
        let email = EmailAddress::parse(raw).map_err(|_| {
            warn!("session carries a malformed email");
            Error::unauthorized("login required")
        })?;

        let found = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_repository_error)?;

        match found {
            Some(credentials) => Ok(credentials.user),
            None => {
                warn!("session names an email with no user record");
                Err(Error::unauthorized("login required"))
            }
        }
    }
}
