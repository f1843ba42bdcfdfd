//! Ticket model and its validation rules.
//!
//! A ticket belongs to exactly one owner for its whole life. The owner is
//! fixed at creation; only the status changes afterwards.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::comment::CommentWithAuthor;
use super::user::UserId;

/// Minimum title length after trimming.
pub const TITLE_MIN: usize = 3;
/// Maximum title length after trimming.
pub const TITLE_MAX: usize = 120;
/// Minimum description length after trimming.
pub const DESCRIPTION_MIN: usize = 5;
/// Maximum description length after trimming.
pub const DESCRIPTION_MAX: usize = 5000;

/// Validation errors for ticket payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketValidationError {
    TitleTooShort { min: usize },
    TitleTooLong { max: usize },
    DescriptionTooShort { min: usize },
    DescriptionTooLong { max: usize },
    InvalidStatus { value: String },
}

impl TicketValidationError {
    /// Name of the request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::TitleTooShort { .. } | Self::TitleTooLong { .. } => "title",
            Self::DescriptionTooShort { .. } | Self::DescriptionTooLong { .. } => "description",
            Self::InvalidStatus { .. } => "status",
        }
    }
}

impl fmt::Display for TicketValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TitleTooShort { min } => write!(f, "title must be at least {min} characters"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::DescriptionTooShort { min } => {
                write!(f, "description must be at least {min} characters")
            }
            Self::DescriptionTooLong { max } => {
                write!(f, "description must be at most {max} characters")
            }
            Self::InvalidStatus { value } => write!(
                f,
                "status must be one of OPEN, IN_PROGRESS or RESOLVED (got {value:?})"
            ),
        }
    }
}

impl std::error::Error for TicketValidationError {}

/// Ticket identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(Uuid);

impl TicketId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse a path segment. Returns `None` when the input is not a UUID,
    /// since such an id can never name a stored ticket.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Workflow status of a ticket.
///
/// Every transition between the three states is permitted, including
/// rewriting the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
}

impl TicketStatus {
    /// Wire and storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
            Self::Resolved => "RESOLVED",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = TicketValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(Self::Open),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "RESOLVED" => Ok(Self::Resolved),
            other => Err(TicketValidationError::InvalidStatus {
                value: other.to_owned(),
            }),
        }
    }
}

fn bounded(raw: &str, min: usize, max: usize) -> Result<String, (bool, usize)> {
    let trimmed = raw.trim();
    let length = trimmed.chars().count();
    if length < min {
        return Err((true, min));
    }
    if length > max {
        return Err((false, max));
    }
    Ok(trimmed.to_owned())
}

/// Trimmed ticket title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketTitle(String);

impl TicketTitle {
    pub fn new(raw: &str) -> Result<Self, TicketValidationError> {
        bounded(raw, TITLE_MIN, TITLE_MAX)
            .map(Self)
            .map_err(|(short, limit)| {
                if short {
                    TicketValidationError::TitleTooShort { min: limit }
                } else {
                    TicketValidationError::TitleTooLong { max: limit }
                }
            })
    }
}

impl AsRef<str> for TicketTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Trimmed ticket description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDescription(String);

impl TicketDescription {
    pub fn new(raw: &str) -> Result<Self, TicketValidationError> {
        bounded(raw, DESCRIPTION_MIN, DESCRIPTION_MAX)
            .map(Self)
            .map_err(|(short, limit)| {
                if short {
                    TicketValidationError::DescriptionTooShort { min: limit }
                } else {
                    TicketValidationError::DescriptionTooLong { max: limit }
                }
            })
    }
}

impl AsRef<str> for TicketDescription {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Validated input for a new ticket.
///
/// # Examples
/// ```
/// use ticketdesk::domain::TicketDraft;
///
/// let draft = TicketDraft::try_from_parts("  Printer  ", "Paper jam again").unwrap();
/// assert_eq!(draft.title.as_ref(), "Printer");
/// assert!(TicketDraft::try_from_parts("ab", "Paper jam again").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDraft {
    pub title: TicketTitle,
    pub description: TicketDescription,
}

impl TicketDraft {
    pub fn try_from_parts(title: &str, description: &str) -> Result<Self, TicketValidationError> {
        Ok(Self {
            title: TicketTitle::new(title)?,
            description: TicketDescription::new(description)?,
        })
    }
}

/// Stored ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: TicketId,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// A ticket together with its comments in chronological order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDetail {
    pub ticket: Ticket,
    pub comments: Vec<CommentWithAuthor>,
}
