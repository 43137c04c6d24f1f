//! SQLite session store implementation.
//!
//! Implements `SessionStore` from `joingate-core` using sqlx with split
//! read/write pools. Timestamps are stored as fixed-width RFC 3339 text so
//! that lexical order matches chronological order.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;

use joingate_core::repository::{SessionFilter, SessionStore};
use joingate_types::error::RepositoryError;
use joingate_types::session::{FunnelStatus, UserId, UserSession};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `SessionStore`.
pub struct SqliteSessionStore {
    pool: DatabasePool,
}

impl SqliteSessionStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

struct SessionRow {
    user_id: i64,
    status: String,
    start_count: i64,
    email: Option<String>,
    started_at: String,
    updated_at: String,
}

impl SessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            user_id: row.try_get("user_id")?,
            status: row.try_get("status")?,
            start_count: row.try_get("start_count")?,
            email: row.try_get("email")?,
            started_at: row.try_get("started_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_session(self) -> Result<UserSession, RepositoryError> {
        let status: FunnelStatus = self.status.parse().map_err(RepositoryError::Query)?;
        let start_count = u32::try_from(self.start_count)
            .map_err(|e| RepositoryError::Query(format!("invalid start_count: {e}")))?;

        Ok(UserSession {
            user_id: UserId(self.user_id),
            status,
            start_count,
            started_at: parse_datetime(&self.started_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
            email: self.email,
        })
    }
}

const SELECT_COLUMNS: &str =
    "SELECT user_id, status, start_count, email, started_at, updated_at FROM funnel_sessions";

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn query_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

// ---------------------------------------------------------------------------
// SessionStore implementation
// ---------------------------------------------------------------------------

impl SessionStore for SqliteSessionStore {
    async fn get_or_create(&self, user_id: UserId) -> Result<UserSession, RepositoryError> {
        let fresh = UserSession::new(user_id);
        let now = format_datetime(&fresh.started_at);

        sqlx::query(
            r#"INSERT INTO funnel_sessions (user_id, status, start_count, email, started_at, updated_at)
               VALUES (?, ?, 0, NULL, ?, ?)
               ON CONFLICT (user_id) DO NOTHING"#,
        )
        .bind(user_id.0)
        .bind(fresh.status.as_str())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        // Read back on the writer so the row just inserted is visible.
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE user_id = ?"))
            .bind(user_id.0)
            .fetch_one(&self.pool.writer)
            .await
            .map_err(query_error)?;

        SessionRow::from_row(&row)
            .map_err(query_error)?
            .into_session()
    }

    async fn save(&self, session: &UserSession) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO funnel_sessions (user_id, status, start_count, email, started_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?)
               ON CONFLICT (user_id) DO UPDATE SET
                   status = excluded.status,
                   start_count = excluded.start_count,
                   email = excluded.email,
                   updated_at = excluded.updated_at"#,
        )
        .bind(session.user_id.0)
        .bind(session.status.as_str())
        .bind(i64::from(session.start_count))
        .bind(session.email.as_deref())
        .bind(format_datetime(&session.started_at))
        .bind(format_datetime(&session.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(())
    }

    async fn get(&self, user_id: UserId) -> Result<Option<UserSession>, RepositoryError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE user_id = ?"))
            .bind(user_id.0)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => Ok(Some(
                SessionRow::from_row(&row)
                    .map_err(query_error)?
                    .into_session()?,
            )),
            None => Ok(None),
        }
    }

    async fn list(&self, filter: SessionFilter) -> Result<Vec<UserSession>, RepositoryError> {
        let status = filter.status.map(|s| s.as_str());
        // SQLite treats a negative LIMIT as "no limit".
        let limit = filter.limit.map_or(-1, i64::from);

        let rows = sqlx::query(&format!(
            "{SELECT_COLUMNS} WHERE (? IS NULL OR status = ?) ORDER BY updated_at DESC, user_id ASC LIMIT ?"
        ))
        .bind(status)
        .bind(status)
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter()
            .map(|row| {
                SessionRow::from_row(row)
                    .map_err(query_error)?
                    .into_session()
            })
            .collect()
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM funnel_sessions")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(query_error)?;
        Ok(count.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn test_store() -> (SqliteSessionStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("sessions.db").display());
        let pool = DatabasePool::new(&url).await.unwrap();
        (SqliteSessionStore::new(pool), dir)
    }

    #[tokio::test]
    async fn test_get_or_create_inserts_once() {
        let (store, _dir) = test_store().await;
        assert!(store.get(UserId(1)).await.unwrap().is_none());

        let first = store.get_or_create(UserId(1)).await.unwrap();
        assert_eq!(first.status, FunnelStatus::New);
        assert_eq!(first.start_count, 0);

        let mut modified = first.clone();
        modified.start_count = 3;
        store.save(&modified).await.unwrap();

        let again = store.get_or_create(UserId(1)).await.unwrap();
        assert_eq!(again.start_count, 3);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_save_round_trip_preserves_fields() {
        let (store, _dir) = test_store().await;
        let mut session = UserSession::new(UserId(42));
        session.status = FunnelStatus::Done;
        session.start_count = 2;
        session.email = Some("ada@example.com".to_string());
        store.save(&session).await.unwrap();

        let loaded = store.get(UserId(42)).await.unwrap().unwrap();
        assert_eq!(loaded.status, FunnelStatus::Done);
        assert_eq!(loaded.start_count, 2);
        assert_eq!(loaded.email.as_deref(), Some("ada@example.com"));
        assert_eq!(
            loaded.started_at.timestamp_micros(),
            session.started_at.timestamp_micros()
        );
    }

    #[tokio::test]
    async fn test_reset_clears_email() {
        let (store, _dir) = test_store().await;
        let mut session = UserSession::new(UserId(8));
        session.status = FunnelStatus::Done;
        session.email = Some("x@example.com".to_string());
        store.save(&session).await.unwrap();

        session.reset();
        store.save(&session).await.unwrap();

        let loaded = store.get(UserId(8)).await.unwrap().unwrap();
        assert_eq!(loaded.status, FunnelStatus::New);
        assert!(loaded.email.is_none());
    }

    #[tokio::test]
    async fn test_list_orders_by_updated_at_and_filters() {
        let (store, _dir) = test_store().await;
        let base = Utc::now();
        for id in 1..=4i64 {
            let mut session = UserSession::new(UserId(id));
            session.updated_at = base + Duration::seconds(id);
            if id % 2 == 0 {
                session.status = FunnelStatus::WaitingEmail;
            }
            store.save(&session).await.unwrap();
        }

        let all = store.list(SessionFilter::default()).await.unwrap();
        let ids: Vec<i64> = all.iter().map(|s| s.user_id.0).collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);

        let waiting = store
            .list(SessionFilter {
                status: Some(FunnelStatus::WaitingEmail),
                limit: Some(1),
            })
            .await
            .unwrap();
        assert_eq!(waiting.len(), 1);
        assert_eq!(waiting[0].user_id, UserId(4));
    }

    #[tokio::test]
    async fn test_sessions_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("durable.db").display());

        {
            let store = SqliteSessionStore::new(DatabasePool::new(&url).await.unwrap());
            let mut session = store.get_or_create(UserId(5)).await.unwrap();
            session.status = FunnelStatus::WaitingJoin;
            store.save(&session).await.unwrap();
        }

        let store = SqliteSessionStore::new(DatabasePool::new(&url).await.unwrap());
        let loaded = store.get(UserId(5)).await.unwrap().unwrap();
        assert_eq!(loaded.status, FunnelStatus::WaitingJoin);
    }
}
