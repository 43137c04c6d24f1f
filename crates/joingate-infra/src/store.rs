//! Runtime-selected session backend.
//!
//! `SessionStore` uses RPITIT and is not object safe, so the backend chosen
//! at startup is carried as an enum that forwards each call.

use joingate_core::repository::{InMemorySessionStore, SessionFilter, SessionStore};
use joingate_types::error::RepositoryError;
use joingate_types::session::{UserId, UserSession};

use crate::sqlite::{DatabasePool, SqliteSessionStore};

pub enum AnySessionStore {
    Memory(InMemorySessionStore),
    Sqlite(SqliteSessionStore),
}

impl AnySessionStore {
    pub fn memory() -> Self {
        AnySessionStore::Memory(InMemorySessionStore::new())
    }

    /// Open the SQLite database at `database_url`, running migrations.
    pub async fn sqlite(database_url: &str) -> Result<Self, RepositoryError> {
        let pool = DatabasePool::new(database_url).await.map_err(|e| {
            tracing::error!(error = %e, "failed to open session database");
            RepositoryError::Connection
        })?;
        Ok(AnySessionStore::Sqlite(SqliteSessionStore::new(pool)))
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            AnySessionStore::Memory(_) => "memory",
            AnySessionStore::Sqlite(_) => "sqlite",
        }
    }
}

impl SessionStore for AnySessionStore {
    async fn get_or_create(&self, user_id: UserId) -> Result<UserSession, RepositoryError> {
        match self {
            AnySessionStore::Memory(s) => s.get_or_create(user_id).await,
            AnySessionStore::Sqlite(s) => s.get_or_create(user_id).await,
        }
    }

    async fn save(&self, session: &UserSession) -> Result<(), RepositoryError> {
        match self {
            AnySessionStore::Memory(s) => s.save(session).await,
            AnySessionStore::Sqlite(s) => s.save(session).await,
        }
    }

    async fn get(&self, user_id: UserId) -> Result<Option<UserSession>, RepositoryError> {
        match self {
            AnySessionStore::Memory(s) => s.get(user_id).await,
            AnySessionStore::Sqlite(s) => s.get(user_id).await,
        }
    }

    async fn list(&self, filter: SessionFilter) -> Result<Vec<UserSession>, RepositoryError> {
        match self {
            AnySessionStore::Memory(s) => s.list(filter).await,
            AnySessionStore::Sqlite(s) => s.list(filter).await,
        }
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        match self {
            AnySessionStore::Memory(s) => s.count().await,
            AnySessionStore::Sqlite(s) => s.count().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_backend_forwards() {
        let store = AnySessionStore::memory();
        assert_eq!(store.backend_name(), "memory");
        store.get_or_create(UserId(1)).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_sqlite_backend_opens() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("any.db").display());
        let store = AnySessionStore::sqlite(&url).await.unwrap();
        assert_eq!(store.backend_name(), "sqlite");
        store.get_or_create(UserId(2)).await.unwrap();
        assert!(store.get(UserId(2)).await.unwrap().is_some());
    }
}
