//! Port for one-way password hashing.
use async_trait::async_trait;

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHasherError {
        /// Hashing or verification could not run.
        Hashing { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plain text secret.
    async fn hash(&self, secret: &str) -> Result<PasswordHash, PasswordHasherError>;

    /// Check a plain text secret against a stored hash.
    async fn verify(&self, secret: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError>;
}

/// Reversible stand-in for tests that should not pay for real hashing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePasswordHasher;

const FIXTURE_PREFIX: &str = "fixture$";

#[async_trait]
impl PasswordHasher for FixturePasswordHasher {
    async fn hash(&self, secret: &str) -> Result<PasswordHash, PasswordHasherError> {
        Ok(PasswordHash::new(format!("{FIXTURE_PREFIX}{secret}")))
    }

    async fn verify(&self, secret: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError> {
        hash.as_str()
            .strip_prefix(FIXTURE_PREFIX)
            .map(|stored| stored == secret)
            .ok_or_else(|| PasswordHasherError::malformed_hash("missing fixture prefix"))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_hasher_verifies_its_own_hashes() {
        let hasher = FixturePasswordHasher;
        let hash = hasher.hash("hunter22").await.expect("hash");

        assert!(hasher.verify("hunter22", &hash).await.expect("verify"));
        assert!(!hasher.verify("hunter23", &hash).await.expect("verify"));
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_hasher_rejects_foreign_hashes() {
        let err = FixturePasswordHasher
            .verify("pw", &PasswordHash::new("$argon2id$..."))
            .await
            .expect_err("foreign hash");
        assert!(matches!(err, PasswordHasherError::MalformedHash { .. }));
    }
}
