//! In-memory implementation of `SessionStore`.
//!
//! All sessions are held in a `DashMap` and lost on restart. There is no
//! eviction; the map grows with the number of distinct users.

use dashmap::DashMap;

use joingate_types::error::RepositoryError;
use joingate_types::session::{UserId, UserSession};

use super::session::{SessionFilter, SessionStore};

/// Process-lifetime session store.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<UserId, UserSession>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    async fn get_or_create(&self, user_id: UserId) -> Result<UserSession, RepositoryError> {
        let entry = self
            .sessions
            .entry(user_id)
            .or_insert_with(|| UserSession::new(user_id));
        Ok(entry.value().clone())
    }

    async fn save(&self, session: &UserSession) -> Result<(), RepositoryError> {
        self.sessions.insert(session.user_id, session.clone());
        Ok(())
    }

    async fn get(&self, user_id: UserId) -> Result<Option<UserSession>, RepositoryError> {
        Ok(self.sessions.get(&user_id).map(|s| s.value().clone()))
    }

    async fn list(&self, filter: SessionFilter) -> Result<Vec<UserSession>, RepositoryError> {
        let mut sessions: Vec<UserSession> = self
            .sessions
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        sessions.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then(a.user_id.cmp(&b.user_id))
        });
        if let Some(limit) = filter.limit {
            sessions.truncate(limit as usize);
        }
        Ok(sessions)
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.sessions.len() as u64)
    }
}
