use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Messaging-platform user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// Position of a user within the funnel.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (status IN ('new', 'waiting_join', 'waiting_email', 'done'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStatus {
    New,
    WaitingJoin,
    WaitingEmail,
    Done,
}

impl FunnelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FunnelStatus::New => "new",
            FunnelStatus::WaitingJoin => "waiting_join",
            FunnelStatus::WaitingEmail => "waiting_email",
            FunnelStatus::Done => "done",
        }
    }
}

impl fmt::Display for FunnelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FunnelStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "new" => Ok(FunnelStatus::New),
            "waiting_join" => Ok(FunnelStatus::WaitingJoin),
            "waiting_email" => Ok(FunnelStatus::WaitingEmail),
            "done" => Ok(FunnelStatus::Done),
            other => Err(format!("invalid funnel status: '{other}'")),
        }
    }
}

impl Default for FunnelStatus {
    fn default() -> Self {
        FunnelStatus::New
    }
}

/// Per-user funnel session.
///
/// Created lazily on the first update from a user. The status only moves
/// forward, except for the explicit restart which resets it to `New`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub user_id: UserId,
    pub status: FunnelStatus,
    /// Number of times the user has (re)started the funnel.
    pub start_count: u32,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Email captured at the `WaitingEmail` step.
    pub email: Option<String>,
}

impl UserSession {
    /// A fresh session in the `New` state.
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            status: FunnelStatus::New,
            start_count: 0,
            started_at: now,
            updated_at: now,
            email: None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == FunnelStatus::Done
    }

    /// Reset to `New`, keeping the start counter and first-seen timestamp.
    pub fn reset(&mut self) {
        self.status = FunnelStatus::New;
        self.email = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_funnel_status_roundtrip() {
        for status in [
            FunnelStatus::New,
            FunnelStatus::WaitingJoin,
            FunnelStatus::WaitingEmail,
            FunnelStatus::Done,
        ] {
            let parsed: FunnelStatus = status.to_string().parse().unwrap();
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn test_funnel_status_serde() {
        let json = serde_json::to_string(&FunnelStatus::WaitingJoin).unwrap();
        assert_eq!(json, "\"waiting_join\"");
        let parsed: FunnelStatus = serde_json::from_str("\"done\"").unwrap();
        assert_eq!(parsed, FunnelStatus::Done);
    }

    #[test]
    fn test_funnel_status_rejects_unknown() {
        assert!("finished".parse::<FunnelStatus>().is_err());
    }

    #[test]
    fn test_funnel_status_order_is_forward() {
        assert!(FunnelStatus::New < FunnelStatus::WaitingJoin);
        assert!(FunnelStatus::WaitingJoin < FunnelStatus::WaitingEmail);
        assert!(FunnelStatus::WaitingEmail < FunnelStatus::Done);
    }

    #[test]
    fn test_new_session_defaults() {
        let session = UserSession::new(UserId(42));
        assert_eq!(session.status, FunnelStatus::New);
        assert_eq!(session.start_count, 0);
        assert!(session.email.is_none());
        assert!(!session.is_done());
    }

    #[test]
    fn test_reset_keeps_counter() {
        let mut session = UserSession::new(UserId(7));
        session.status = FunnelStatus::Done;
        session.start_count = 3;
        session.email = Some("a@b.co".to_string());

        session.reset();

        assert_eq!(session.status, FunnelStatus::New);
        assert_eq!(session.start_count, 3);
        assert!(session.email.is_none());
    }

    #[test]
    fn test_user_id_parse() {
        assert_eq!(" 123 ".parse::<UserId>().unwrap(), UserId(123));
        assert!("abc".parse::<UserId>().is_err());
    }
}
