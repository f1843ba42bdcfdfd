//! Wiring of repositories and services into [`HttpState`].

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{CommentRepository, PasswordHasher, TicketRepository, UserRepository};
use crate::domain::{AccountService, TicketAccessService};
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::{
    DieselCommentRepository, DieselTicketRepository, DieselUserRepository,
};

use super::Storage;

fn assemble<U, T, C, H>(
    users: Arc<U>,
    tickets: Arc<T>,
    comments: Arc<C>,
    hasher: Arc<H>,
) -> HttpState
where
    U: UserRepository + 'static,
    T: TicketRepository + 'static,
    C: CommentRepository + 'static,
    H: PasswordHasher + 'static,
{
    HttpState::new(
        Arc::new(AccountService::new(users.clone(), hasher)),
        Arc::new(TicketAccessService::new(users, tickets, comments)),
    )
}

/// Build handler state over the selected storage.
pub fn build_http_state<H>(storage: &Storage, clock: &Arc<dyn Clock>, hasher: Arc<H>) -> HttpState
where
    H: PasswordHasher + 'static,
{
    match storage {
        Storage::Postgres(pool) => assemble(
            Arc::new(DieselUserRepository::new(pool.clone(), clock.clone())),
            Arc::new(DieselTicketRepository::new(pool.clone(), clock.clone())),
            Arc::new(DieselCommentRepository::new(pool.clone(), clock.clone())),
            hasher,
        ),
        Storage::Memory(store) => {
            let store = Arc::new(store.clone());
            assemble(store.clone(), store.clone(), store, hasher)
        }
    }
}
