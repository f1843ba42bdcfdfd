//! PostgreSQL-backed `CommentRepository` adapter.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::Clock;

use crate::domain::ports::{CommentRepository, CommentRepositoryError};
use crate::domain::{
    Comment, CommentAuthor, CommentBody, CommentId, CommentWithAuthor, DisplayName, EmailAddress,
    TicketId, UserId,
};

use super::diesel_error_mapping::{
    COMMENTS_TICKET_FKEY, is_foreign_key_violation, map_diesel_error, map_pool_error,
};
use super::models::{AuthorRow, CommentRow, NewCommentRow};
use super::pool::{DbPool, PoolError};
use super::schema::{comments, users};

/// Diesel adapter for comments.
///
/// A comment naming a ticket that does not exist trips
/// `comments_ticket_id_fkey` and is reported as
/// [`CommentRepositoryError::TicketMissing`].
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselCommentRepository {
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

fn map_pool(error: PoolError) -> CommentRepositoryError {
    map_pool_error(error, CommentRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> CommentRepositoryError {
    map_diesel_error(
        error,
        CommentRepositoryError::query,
        CommentRepositoryError::connection,
    )
}

fn row_to_comment(row: CommentRow) -> Comment {
    Comment {
        id: CommentId::from_uuid(row.id),
        ticket_id: TicketId::from_uuid(row.ticket_id),
        author_id: UserId::from_uuid(row.author_id),
        body: row.body,
        created_at: row.created_at,
    }
}

fn row_to_author(row: AuthorRow) -> Result<CommentAuthor, CommentRepositoryError> {
    let email = EmailAddress::parse(&row.email).map_err(|err| {
        CommentRepositoryError::query(format!("stored author email is invalid: {err}"))
    })?;
    let display_name = row
        .display_name
        .map(DisplayName::new)
        .transpose()
        .map_err(|err| {
            CommentRepositoryError::query(format!("stored author name is invalid: {err}"))
        })?;
    Ok(CommentAuthor {
        email,
        display_name,
    })
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn create(
        &self,
        ticket_id: &TicketId,
        author_id: &UserId,
        body: &CommentBody,
    ) -> Result<Comment, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let record = NewCommentRow {
            id: *CommentId::random().as_uuid(),
            ticket_id: *ticket_id.as_uuid(),
            author_id: *author_id.as_uuid(),
            body: body.as_ref(),
            created_at: self.clock.utc(),
        };

        let row: CommentRow = diesel::insert_into(comments::table)
            .values(&record)
            .returning(CommentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| {
                if is_foreign_key_violation(&err, COMMENTS_TICKET_FKEY) {
                    CommentRepositoryError::ticket_missing(ticket_id.to_string())
                } else {
                    map_diesel(err)
                }
            })?;
        Ok(row_to_comment(row))
    }

    async fn list_for_ticket(
        &self,
        ticket_id: &TicketId,
    ) -> Result<Vec<CommentWithAuthor>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<(CommentRow, AuthorRow)> = comments::table
            .inner_join(users::table)
            .filter(comments::ticket_id.eq(*ticket_id.as_uuid()))
            .order((comments::created_at.asc(), comments::id.asc()))
            .select((CommentRow::as_select(), AuthorRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        rows.into_iter()
            .map(|(comment, author)| {
                Ok(CommentWithAuthor {
                    comment: row_to_comment(comment),
                    author: row_to_author(author)?,
                })
            })
            .collect()
    }
}
