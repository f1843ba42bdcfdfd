//! PostgreSQL-backed `UserRepository` adapter.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::Clock;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    DisplayName, EmailAddress, NewUser, PasswordHash, User, UserCredentials, UserId,
};

use super::diesel_error_mapping::{
    USERS_EMAIL_KEY, is_unique_violation, map_diesel_error, map_pool_error,
};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel adapter for the identity store.
///
/// Email uniqueness comes from the `users_email_key` constraint; a violating
/// insert surfaces as [`UserPersistenceError::DuplicateEmail`].
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

fn map_pool(error: PoolError) -> UserPersistenceError {
    map_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn row_to_user(row: &UserRow) -> Result<User, UserPersistenceError> {
    let email = EmailAddress::parse(&row.email)
        .map_err(|err| UserPersistenceError::query(format!("stored email is invalid: {err}")))?;
    let display_name = row
        .display_name
        .as_deref()
        .map(DisplayName::new)
        .transpose()
        .map_err(|err| UserPersistenceError::query(format!("stored name is invalid: {err}")))?;
    Ok(User::new(
        UserId::from_uuid(row.id),
        email,
        display_name,
        row.created_at,
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let email: &str = user.email.as_ref();
        let record = NewUserRow {
            id: *UserId::random().as_uuid(),
            email,
            display_name: user.display_name.as_ref().map(|name| name.as_ref()),
            password_hash: user.password_hash.as_str(),
            created_at: self.clock.utc(),
        };

        let row: UserRow = diesel::insert_into(users::table)
            .values(&record)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err, USERS_EMAIL_KEY) {
                    UserPersistenceError::duplicate_email(email)
                } else {
                    map_diesel(err)
                }
            })?;

        row_to_user(&row)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let email: &str = email.as_ref();
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(|row| {
            Ok(UserCredentials {
                user: row_to_user(&row)?,
                password_hash: PasswordHash::new(row.password_hash),
            })
        })
        .transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row: Option<UserRow> = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.as_ref().map(row_to_user).transpose()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    fn row(email: &str, display_name: Option<&str>) -> UserRow {
        UserRow {
            id: Uuid::nil(),
            email: email.to_owned(),
            display_name: display_name.map(str::to_owned),
            password_hash: "hash".to_owned(),
            created_at: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).single().expect("valid"),
        }
    }

    #[rstest]
    fn stored_row_converts_to_user() {
        let user = row_to_user(&row("ada@example.com", Some("Ada"))).expect("valid row");
        assert_eq!(user.email().as_ref(), "ada@example.com");
        assert_eq!(user.display_name().map(|name| name.as_ref()), Some("Ada"));
        assert_eq!(user.id().as_uuid(), &Uuid::nil());
    }

    #[rstest]
    fn corrupt_stored_email_is_a_query_error() {
        let err = row_to_user(&row("nope", None)).expect_err("invalid email");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }
}
