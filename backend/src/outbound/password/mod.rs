//! Argon2id adapter for the `PasswordHasher` port.
//!
//! Hashes are PHC strings (`$argon2id$v=19$m=...`), so parameters travel with
//! each hash and can be raised later without invalidating stored ones.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    self, PasswordHash as PhcString, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHasher, PasswordHasherError};

/// Argon2id hasher running on Tokio's blocking pool.
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Argon2PasswordHasher {
    /// Hasher with the crate's default cost (19 MiB, two passes, one lane).
    pub fn new() -> Self {
        Self::default()
    }

    /// Hasher with explicit cost parameters.
    pub fn with_params(params: Params) -> Self {
        Self { params }
    }

    fn engine(params: Params) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    }
}

fn hash_blocking(params: Params, secret: &[u8]) -> Result<PasswordHash, PasswordHasherError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2PasswordHasher::engine(params)
        .hash_password(secret, &salt)
        .map(|phc| PasswordHash::new(phc.to_string()))
        .map_err(|err| PasswordHasherError::hashing(err.to_string()))
}

fn verify_blocking(
    params: Params,
    secret: &[u8],
    encoded: &str,
) -> Result<bool, PasswordHasherError> {
    let parsed = PhcString::new(encoded)
        .map_err(|err| PasswordHasherError::malformed_hash(err.to_string()))?;
    match Argon2PasswordHasher::engine(params).verify_password(secret, &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(err) => Err(PasswordHasherError::hashing(err.to_string())),
    }
}

async fn run_blocking<T, F>(task: F) -> Result<T, PasswordHasherError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, PasswordHasherError> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| PasswordHasherError::hashing(format!("hashing task aborted: {err}")))?
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, secret: &str) -> Result<PasswordHash, PasswordHasherError> {
        let params = self.params.clone();
        let secret = Zeroizing::new(secret.as_bytes().to_vec());
        run_blocking(move || hash_blocking(params, &secret)).await
    }

    async fn verify(&self, secret: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError> {
        let params = self.params.clone();
        let secret = Zeroizing::new(secret.as_bytes().to_vec());
        let encoded = hash.as_str().to_owned();
        run_blocking(move || verify_blocking(params, &secret, &encoded)).await
    }
}
