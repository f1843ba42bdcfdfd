//! Translation of pool and Diesel failures into repository port errors.
//!
//! Repositories pass constructors for their own `Connection`/`Query`
//! variants; constraint checks let them recognise the violations that carry
//! domain meaning (duplicate email, missing ticket) before falling back.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Unique constraint on `users.email`.
pub(crate) const USERS_EMAIL_KEY: &str = "users_email_key";
/// Foreign key from `comments.ticket_id` to `tickets.id`.
pub(crate) const COMMENTS_TICKET_FKEY: &str = "comments_ticket_id_fkey";

/// Any pool failure means the store is unreachable.
pub(crate) fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    debug!(%error, "connection pool failure");
    connection(error.message().to_owned())
}

/// Map a Diesel failure that carries no domain meaning.
pub(crate) fn map_diesel_error<E>(
    error: DieselError,
    query: impl FnOnce(String) -> E,
    connection: impl FnOnce(String) -> E,
) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection | DatabaseErrorKind::UnableToSendCommand,
            _,
        )
        | DieselError::BrokenTransactionManager => {
            connection("database connection error".to_owned())
        }
        DieselError::NotFound => query("record not found".to_owned()),
        DieselError::DatabaseError(_, _) => query("database error".to_owned()),
        _ => query("database query error".to_owned()),
    }
}

/// Whether `error` is a unique violation of `constraint`.
pub(crate) fn is_unique_violation(error: &DieselError, constraint: &str) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)
            if info.constraint_name() == Some(constraint)
    )
}

/// Whether `error` is a foreign key violation of `constraint`.
pub(crate) fn is_foreign_key_violation(error: &DieselError, constraint: &str) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info)
            if info.constraint_name() == Some(constraint)
    )
}
