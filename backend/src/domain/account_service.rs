//! Account registration and credential checks.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{AccountCommand, PasswordHasher, PasswordHasherError, UserRepository};
use crate::domain::session_resolver::map_user_repository_error;
use crate::domain::{
    EmailAddress, Error, LoginCredentials, NewUser, PasswordHash, Registration, User,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";
/// Hashed once and verified against when no account matches, so unknown
/// emails cost as much as wrong passwords.
const DECOY_SECRET: &str = "decoy-password-never-issued";

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(format!("password hasher error: {error}"))
}

/// Account service implementing [`AccountCommand`].
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    decoy: OnceLock<PasswordHash>,
}

impl<U, H> AccountService<U, H> {
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self {
            users,
            hasher,
            decoy: OnceLock::new(),
        }
    }
}

impl<U, H: PasswordHasher> AccountService<U, H> {
    /// Spend one verification on a hash no password matches.
    async fn verify_decoy(&self, secret: &str) {
        let decoy = match self.decoy.get() {
            Some(hash) => hash.clone(),
            None => match self.hasher.hash(DECOY_SECRET).await {
                Ok(hash) => self.decoy.get_or_init(|| hash).clone(),
                Err(error) => {
                    debug!(%error, "decoy hash unavailable");
                    return;
                }
            },
        };
        if let Err(error) = self.hasher.verify(secret, &decoy).await {
            debug!(%error, "decoy verification failed");
        }
    }
}

#[async_trait]
impl<U, H> AccountCommand for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, registration: &Registration) -> Result<User, Error> {
        // Pre-filter only; the store's unique constraint is authoritative.
        let existing = self
            .users
            .find_by_email(registration.email())
            .await
            .map_err(map_user_repository_error)?;
        if existing.is_some() {
            return Err(Error::conflict("email already used"));
        }

        let password_hash = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(map_hasher_error)?;

        let user = self
            .users
            .create(&NewUser {
                email: registration.email().clone(),
                display_name: registration.display_name().cloned(),
                password_hash,
            })
            .await
            .map_err(map_user_repository_error)?;

        info!(user_id = %user.id(), "registered account");
        Ok(user)
    }

    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let Ok(email) = EmailAddress::parse(credentials.email()) else {
            self.verify_decoy(credentials.password()).await;
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let Some(stored) = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_repository_error)?
        else {
            self.verify_decoy(credentials.password()).await;
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .await
            .map_err(map_hasher_error)?;
        if !matches {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        Ok(stored.user)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
