//! Session store trait definition.

use joingate_types::error::RepositoryError;
use joingate_types::session::{FunnelStatus, UserId, UserSession};

/// Filter criteria for listing sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    /// Only sessions in this status.
    pub status: Option<FunnelStatus>,
    /// Maximum number of results; `None` means all.
    pub limit: Option<u32>,
}

impl SessionFilter {
    /// Whether `session` passes the status filter.
    pub fn matches(&self, session: &UserSession) -> bool {
        self.status.is_none_or(|status| session.status == status)
    }
}

/// Repository trait for per-user funnel sessions.
///
/// Implementations live in this crate (`InMemorySessionStore`) and in
/// joingate-infra (e.g., `SqliteSessionStore`).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait SessionStore: Send + Sync {
    /// Load the session for `user_id`, creating a `New` one if absent.
    fn get_or_create(
        &self,
        user_id: UserId,
    ) -> impl std::future::Future<Output = Result<UserSession, RepositoryError>> + Send;

    /// Persist a session (upsert, last write wins).
    fn save(
        &self,
        session: &UserSession,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Load a session without creating it.
    fn get(
        &self,
        user_id: UserId,
    ) -> impl std::future::Future<Output = Result<Option<UserSession>, RepositoryError>> + Send;

    /// List sessions, most recently updated first.
    fn list(
        &self,
        filter: SessionFilter,
    ) -> impl std::future::Future<Output = Result<Vec<UserSession>, RepositoryError>> + Send;

    /// Total number of stored sessions.
    fn count(&self) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
