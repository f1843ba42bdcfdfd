//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` so they depend only on
//! driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountCommand, TicketAccess};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub tickets: Arc<dyn TicketAccess>,
}

impl HttpState {
    pub fn new(accounts: Arc<dyn AccountCommand>, tickets: Arc<dyn TicketAccess>) -> Self {
        Self { accounts, tickets }
    }
}
