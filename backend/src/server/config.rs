//! Inputs needed to start the HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use mockable::Clock;

use crate::inbound::http::session_config::SessionSettings;
use crate::outbound::memory::InMemoryStore;
use crate::outbound::persistence::DbPool;

/// Backing store selected at startup.
#[derive(Clone)]
pub enum Storage {
    Postgres(DbPool),
    Memory(InMemoryStore),
}

impl Storage {
    /// Short label for startup logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }
}

/// Builder-style configuration for [`super::create_server`].
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) storage: Storage,
    pub(crate) clock: Arc<dyn Clock>,
}

impl ServerConfig {
    /// Start from an in-memory store on the given clock.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, clock: Arc<dyn Clock>) -> Self {
        Self {
            session,
            bind_addr,
            storage: Storage::Memory(InMemoryStore::new(clock.clone())),
            clock,
        }
    }

    /// Use PostgreSQL through the given pool.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.storage = Storage::Postgres(pool);
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }
}
