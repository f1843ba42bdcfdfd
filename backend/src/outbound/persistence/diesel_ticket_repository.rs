//! PostgreSQL-backed `TicketRepository` adapter.
//!
//! Every statement filters on `owner_id`, so a caller can only ever see or
//! touch its own rows.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{TicketRepository, TicketRepositoryError};
use crate::domain::{Ticket, TicketDraft, TicketId, TicketStatus, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewTicketRow, TicketRow};
use super::pool::{DbPool, PoolError};
use super::schema::tickets;

#[derive(Clone)]
pub struct DieselTicketRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselTicketRepository {
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

fn map_pool(error: PoolError) -> TicketRepositoryError {
    map_pool_error(error, TicketRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> TicketRepositoryError {
    map_diesel_error(
        error,
        TicketRepositoryError::query,
        TicketRepositoryError::connection,
    )
}

fn row_to_ticket(row: TicketRow) -> Result<Ticket, TicketRepositoryError> {
    let status = row.status.parse::<TicketStatus>().map_err(|err| {
        TicketRepositoryError::query(format!("stored ticket {} is corrupt: {err}", row.id))
    })?;
    Ok(Ticket {
        id: TicketId::from_uuid(row.id),
        title: row.title,
        description: row.description,
        status,
        owner_id: UserId::from_uuid(row.owner_id),
        created_at: row.created_at,
    })
}

#[async_trait]
impl TicketRepository for DieselTicketRepository {
    async fn create(
        &self,
        owner: &UserId,
        draft: &TicketDraft,
    ) -> Result<Ticket, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let record = NewTicketRow {
            id: *TicketId::random().as_uuid(),
            title: draft.title.as_ref(),
            description: draft.description.as_ref(),
            status: TicketStatus::Open.as_str(),
            owner_id: *owner.as_uuid(),
            created_at: self.clock.utc(),
        };

        let row: TicketRow = diesel::insert_into(tickets::table)
            .values(&record)
            .returning(TicketRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;
        row_to_ticket(row)
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Ticket>, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<TicketRow> = tickets::table
            .filter(tickets::owner_id.eq(*owner.as_uuid()))
            .order((tickets::created_at.desc(), tickets::id.desc()))
            .select(TicketRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;
        rows.into_iter().map(row_to_ticket).collect()
    }

    async fn find_for_owner(
        &self,
        owner: &UserId,
        ticket_id: &TicketId,
    ) -> Result<Option<Ticket>, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row: Option<TicketRow> = tickets::table
            .filter(tickets::id.eq(*ticket_id.as_uuid()))
            .filter(tickets::owner_id.eq(*owner.as_uuid()))
            .select(TicketRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;
        row.map(row_to_ticket).transpose()
    }

    async fn update_status_for_owner(
        &self,
        owner: &UserId,
        ticket_id: &TicketId,
        status: TicketStatus,
    ) -> Result<u64, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let target = tickets::table
            .filter(tickets::id.eq(*ticket_id.as_uuid()))
            .filter(tickets::owner_id.eq(*owner.as_uuid()));
        let changed = diesel::update(target)
            .set(tickets::status.eq(status.as_str()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel)?;
        debug!(%ticket_id, changed, "conditional status update");
        u64::try_from(changed).map_err(|err| TicketRepositoryError::query(err.to_string()))
    }
}
