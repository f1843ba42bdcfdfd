//! In-process store used when no database is configured.
//!
//! One [`InMemoryStore`] implements all three repository ports over a single
//! mutex, so every operation is atomic with respect to the others in the
//! same way a single SQL statement would be.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;

use crate::domain::ports::{
    CommentRepository, CommentRepositoryError, TicketRepository, TicketRepositoryError,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Comment, CommentAuthor, CommentBody, CommentId, CommentWithAuthor, EmailAddress, NewUser,
    Ticket, TicketDraft, TicketId, TicketStatus, User, UserCredentials, UserId,
};

struct Sequenced<T> {
    seq: u64,
    record: T,
}

#[derive(Default)]
struct State {
    next_seq: u64,
    users: Vec<UserCredentials>,
    tickets: Vec<Sequenced<Ticket>>,
    comments: Vec<Sequenced<Comment>>,
}

impl State {
    fn bump(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn user_by_id(&self, id: &UserId) -> Option<&UserCredentials> {
        self.users.iter().find(|stored| stored.user.id() == id)
    }
}

/// Volatile adapter for the identity, ticket and comment stores.
///
/// Timestamps come from the injected clock; records created within the same
/// instant keep their insertion order.
#[derive(Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let now = self.now();
        let mut state = self.lock();
        if state
            .users
            .iter()
            .any(|stored| stored.user.email() == &user.email)
        {
            return Err(UserPersistenceError::duplicate_email(user.email.as_ref()));
        }
        let created = User::new(
            UserId::random(),
            user.email.clone(),
            user.display_name.clone(),
            now,
        );
        state.users.push(UserCredentials {
            user: created.clone(),
            password_hash: user.password_hash.clone(),
        });
        Ok(created)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserCredentials>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|stored| stored.user.email() == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock().user_by_id(id).map(|stored| stored.user.clone()))
    }
}

#[async_trait]
impl TicketRepository for InMemoryStore {
    async fn create(
        &self,
        owner: &UserId,
        draft: &TicketDraft,
    ) -> Result<Ticket, TicketRepositoryError> {
        let now = self.now();
        let mut state = self.lock();
        if state.user_by_id(owner).is_none() {
            return Err(TicketRepositoryError::query(format!(
                "owner {owner} does not exist"
            )));
        }
        let ticket = Ticket {
            id: TicketId::random(),
            title: draft.title.as_ref().to_owned(),
            description: draft.description.as_ref().to_owned(),
            status: TicketStatus::Open,
            owner_id: *owner,
            created_at: now,
        };
        let seq = state.bump();
        state.tickets.push(Sequenced {
            seq,
            record: ticket.clone(),
        });
        Ok(ticket)
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Ticket>, TicketRepositoryError> {
        let state = self.lock();
        let mut owned: Vec<&Sequenced<Ticket>> = state
            .tickets
            .iter()
            .filter(|entry| entry.record.owner_id == *owner)
            .collect();
        owned.sort_by(|a, b| (b.record.created_at, b.seq).cmp(&(a.record.created_at, a.seq)));
        Ok(owned.into_iter().map(|entry| entry.record.clone()).collect())
    }

    async fn find_for_owner(
        &self,
        owner: &UserId,
        ticket_id: &TicketId,
    ) -> Result<Option<Ticket>, TicketRepositoryError> {
        Ok(self
            .lock()
            .tickets
            .iter()
            .find(|entry| entry.record.id == *ticket_id && entry.record.owner_id == *owner)
            .map(|entry| entry.record.clone()))
    }

    async fn update_status_for_owner(
        &self,
        owner: &UserId,
        ticket_id: &TicketId,
        status: TicketStatus,
    ) -> Result<u64, TicketRepositoryError> {
        let mut state = self.lock();
        let mut changed = 0;
        for entry in state
            .tickets
            .iter_mut()
            .filter(|entry| entry.record.id == *ticket_id && entry.record.owner_id == *owner)
        {
            entry.record.status = status;
            changed += 1;
        }
        Ok(changed)
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn create(
        &self,
        ticket_id: &TicketId,
        author_id: &UserId,
        body: &CommentBody,
    ) -> Result<Comment, CommentRepositoryError> {
        let now = self.now();
        let mut state = self.lock();
        if !state.tickets.iter().any(|entry| entry.record.id == *ticket_id) {
            return Err(CommentRepositoryError::ticket_missing(ticket_id.to_string()));
        }
        if state.user_by_id(author_id).is_none() {
            return Err(CommentRepositoryError::query(format!(
                "author {author_id} does not exist"
            )));
        }
        let comment = Comment {
            id: CommentId::random(),
            ticket_id: *ticket_id,
            author_id: *author_id,
            body: body.as_ref().to_owned(),
            created_at: now,
        };
        let seq = state.bump();
        state.comments.push(Sequenced {
            seq,
            record: comment.clone(),
        });
        Ok(comment)
    }

    async fn list_for_ticket(
        &self,
        ticket_id: &TicketId,
    ) -> Result<Vec<CommentWithAuthor>, CommentRepositoryError> {
        let state = self.lock();
        let mut entries: Vec<&Sequenced<Comment>> = state
            .comments
            .iter()
            .filter(|entry| entry.record.ticket_id == *ticket_id)
            .collect();
        entries.sort_by_key(|entry| (entry.record.created_at, entry.seq));

        entries
            .into_iter()
            .map(|entry| {
                let author = state.user_by_id(&entry.record.author_id).ok_or_else(|| {
                    CommentRepositoryError::query(format!(
                        "author {} does not exist",
                        entry.record.author_id
                    ))
                })?;
                Ok(CommentWithAuthor {
                    comment: entry.record.clone(),
                    author: CommentAuthor {
                        email: author.user.email().clone(),
                        display_name: author.user.display_name().cloned(),
                    },
                })
            })
            .collect()
    }
}
