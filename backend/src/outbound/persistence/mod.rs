//! PostgreSQL persistence adapters.
//!
//! Diesel with `diesel-async` and a bb8 pool. Row structs and the table
//! definitions stay private to this module; the repositories hand out
//! domain types only.

mod diesel_comment_repository;
mod diesel_error_mapping;
mod diesel_ticket_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_ticket_repository::DieselTicketRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError, PoolStage};
