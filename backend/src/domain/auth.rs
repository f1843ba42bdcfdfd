//! Authentication primitives: registration input, login credentials and the
//! per-request session credentials handed to the ticket service.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{DisplayName, EmailAddress, UserValidationError};

/// Minimum accepted password length.
pub const PASSWORD_MIN: usize = 6;
/// Maximum accepted password length.
pub const PASSWORD_MAX: usize = 100;

/// Domain error returned when registration or login values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Email was blank or malformed.
    Email(UserValidationError),
    /// Display name was outside the accepted bounds.
    Name(UserValidationError),
    /// Password was blank.
    EmptyPassword,
    /// Password shorter than [`PASSWORD_MIN`].
    PasswordTooShort { min: usize },
    /// Password longer than [`PASSWORD_MAX`].
    PasswordTooLong { max: usize },
}

impl CredentialsValidationError {
    /// Name of the request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Email(_) => "email",
            Self::Name(_) => "name",
            Self::EmptyPassword | Self::PasswordTooShort { .. } | Self::PasswordTooLong { .. } => {
                "password"
            }
        }
    }
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(inner) | Self::Name(inner) => inner.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::PasswordTooLong { max } => {
                write!(f, "password must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// Validated account registration.
///
/// ## Invariants
/// - `email` is normalised.
/// - `password` holds between [`PASSWORD_MIN`] and [`PASSWORD_MAX`]
///   characters and is zeroed on drop.
///
/// # Examples
/// ```
/// use ticketdesk::domain::Registration;
///
/// let registration =
///     Registration::try_from_parts(Some("  Ada "), "Ada@Example.com", "hunter22").unwrap();
/// assert_eq!(registration.email().as_ref(), "ada@example.com");
/// assert_eq!(registration.display_name().map(|name| name.as_ref()), Some("Ada"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    email: EmailAddress,
    display_name: Option<DisplayName>,
    password: Zeroizing<String>,
}

impl Registration {
    /// Construct a registration from raw payload fields.
    pub fn try_from_parts(
        name: Option<&str>,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let email = EmailAddress::parse(email).map_err(CredentialsValidationError::Email)?;
        let display_name =
            DisplayName::parse_optional(name).map_err(CredentialsValidationError::Name)?;

        let length = password.chars().count();
        if length < PASSWORD_MIN {
            return Err(CredentialsValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if length > PASSWORD_MAX {
            return Err(CredentialsValidationError::PasswordTooLong { max: PASSWORD_MAX });
        }

        Ok(Self {
            email,
            display_name,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Optional display name.
    pub fn display_name(&self) -> Option<&DisplayName> {
        self.display_name.as_ref()
    }

    /// Plain text password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Login credentials as submitted by the caller.
///
/// The email is only trimmed and lowercased here. Malformed addresses are not
/// a validation failure: they simply match no account, so the caller receives
/// the same answer as for any other unknown email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let normalised = email.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(CredentialsValidationError::Email(
                UserValidationError::EmptyEmail,
            ));
        }
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }

        Ok(Self {
            email: normalised,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email string used for the account lookup.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Identity evidence carried by a single request.
///
/// Built by the inbound adapter from the signed session cookie and passed
/// explicitly into every ticket operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCredentials {
    email: Option<String>,
}

impl SessionCredentials {
    /// Credentials for a request with no session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Credentials naming the email stored in the session.
    pub fn for_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
        }
    }

    /// Email recorded in the session, if any.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}
