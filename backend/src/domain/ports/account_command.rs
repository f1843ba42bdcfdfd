//! Driving port for account registration and login.
//!
//! Inbound adapters call it without knowing which stores or hashers back it,
//! which keeps handler tests deterministic.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Registration, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account. Fails with `conflict` when the email is taken.
    async fn register(&self, registration: &Registration) -> Result<User, Error>;

    /// Verify credentials. Unknown emails and wrong passwords fail identically
    /// with `unauthorized`.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;
}
