//! Cookie-session settings sourced from `SESSION_*` environment variables.
//!
//! Release builds reject anything missing or malformed. Debug builds
//! substitute a default and log a warning instead.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

const VAR_COOKIE_SECURE: &str = "SESSION_COOKIE_SECURE";
const VAR_SAME_SITE: &str = "SESSION_SAMESITE";
const VAR_ALLOW_EPHEMERAL: &str = "SESSION_ALLOW_EPHEMERAL";
const VAR_KEY_FILE: &str = "SESSION_KEY_FILE";
const VAR_TTL_HOURS: &str = "SESSION_TTL_HOURS";

const DEFAULT_KEY_FILE: &str = "/var/run/secrets/session_key";
/// Release builds refuse shorter key material.
const MIN_KEY_BYTES: usize = 64;
const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Whether missing settings are tolerated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Resolved cookie-session configuration.
#[derive(Clone)]
pub struct SessionSettings {
    /// Signs and encrypts the session cookie.
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
    pub ttl: Duration,
}

#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("{var} must be set")]
    Missing { var: &'static str },
    #[error("{var}='{value}' is not valid; expected {expected}")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("cannot read session key {path}: {source}")]
    KeyUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key {path} holds {length} bytes; at least {min_len} required")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("SameSite=None cookies must be secure")]
    SameSiteNoneNeedsSecure,
    #[error("ephemeral session keys are not permitted in release builds")]
    EphemeralKeyInRelease,
}

/// Resolves [`SessionSettings`] for the given build mode.
///
/// # Examples
///
/// ```rust
/// use ticketdesk::inbound::http::session_config::{BuildMode, session_settings_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|_| None);
///
/// let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");
/// assert!(settings.cookie_secure);
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let reader = EnvReader { env, mode };

    let cookie_secure = reader.required(VAR_COOKIE_SECURE, "a boolean", true, parse_bool)?;
    let same_site = reader.same_site(cookie_secure)?;
    let allow_ephemeral = reader.required(VAR_ALLOW_EPHEMERAL, "a boolean", false, parse_bool)?;
    if allow_ephemeral && mode == BuildMode::Release {
        return Err(SessionConfigError::EphemeralKeyInRelease);
    }
    let key = reader.key(allow_ephemeral)?;
    let ttl = reader.ttl()?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
        ttl,
    })
}

struct EnvReader<'a, E> {
    env: &'a E,
    mode: BuildMode,
}

impl<E: Env> EnvReader<'_, E> {
    fn required<T: fmt::Debug>(
        &self,
        var: &'static str,
        expected: &'static str,
        debug_default: T,
        parse: fn(&str) -> Option<T>,
    ) -> Result<T, SessionConfigError> {
        let Some(value) = self.env.string(var) else {
            return self.or_default(var, debug_default, || SessionConfigError::Missing { var });
        };
        match parse(&value) {
            Some(parsed) => Ok(parsed),
            None => self.or_default(var, debug_default, || SessionConfigError::Invalid {
                var,
                value,
                expected,
            }),
        }
    }

    fn or_default<T: fmt::Debug>(
        &self,
        var: &'static str,
        default: T,
        error: impl FnOnce() -> SessionConfigError,
    ) -> Result<T, SessionConfigError> {
        match self.mode {
            BuildMode::Debug => {
                warn!(variable = var, default = ?default, "session setting missing or invalid");
                Ok(default)
            }
            BuildMode::Release => Err(error()),
        }
    }

    fn same_site(&self, cookie_secure: bool) -> Result<SameSite, SessionConfigError> {
        let same_site =
            self.required(VAR_SAME_SITE, "Strict|Lax|None", SameSite::Lax, parse_same_site)?;
        if same_site != SameSite::None || cookie_secure {
            return Ok(same_site);
        }
        match self.mode {
            BuildMode::Debug => {
                warn!("SameSite=None on an insecure cookie; browsers may drop it");
                Ok(same_site)
            }
            BuildMode::Release => Err(SessionConfigError::SameSiteNoneNeedsSecure),
        }
    }

    fn key(&self, allow_ephemeral: bool) -> Result<Key, SessionConfigError> {
        let path: PathBuf = self
            .env
            .string(VAR_KEY_FILE)
            .unwrap_or_else(|| DEFAULT_KEY_FILE.to_owned())
            .into();

        let mut bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(source) if self.mode == BuildMode::Debug || allow_ephemeral => {
                warn!(
                    path = %path.display(),
                    error = %source,
                    "generated a throwaway session key; sessions end on restart"
                );
                return Ok(Key::generate());
            }
            Err(source) => return Err(SessionConfigError::KeyUnreadable { path, source }),
        };

        let length = bytes.len();
        let outcome = if self.mode == BuildMode::Release && length < MIN_KEY_BYTES {
            Err(SessionConfigError::KeyTooShort {
                path,
                length,
                min_len: MIN_KEY_BYTES,
            })
        } else {
            Ok(Key::derive_from(&bytes))
        };
        bytes.zeroize();
        outcome
    }

    /// Optional in every build mode.
    fn ttl(&self) -> Result<Duration, SessionConfigError> {
        let Some(value) = self.env.string(VAR_TTL_HOURS) else {
            return Ok(DEFAULT_TTL);
        };
        match value.trim().parse::<u64>() {
            Ok(hours) if hours > 0 => Ok(Duration::from_secs(hours * 60 * 60)),
            _ => self.or_default(VAR_TTL_HOURS, DEFAULT_TTL, || SessionConfigError::Invalid {
                var: VAR_TTL_HOURS,
                value,
                expected: "a positive number of hours",
            }),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

fn parse_same_site(value: &str) -> Option<SameSite> {
    match value.trim().to_ascii_lowercase().as_str() {
        "strict" => Some(SameSite::Strict),
        "lax" => Some(SameSite::Lax),
        "none" => Some(SameSite::None),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
