//! Sender metadata attached to every inbound update.

use serde::{Deserialize, Serialize};

use crate::session::UserId;

/// Who sent an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UserProfile {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            username: None,
            first_name: None,
            last_name: None,
        }
    }

    /// `@username`, or `(no username)` when the account has none.
    pub fn display_username(&self) -> String {
        match self.username.as_deref() {
            Some(name) if !name.is_empty() => format!("@{name}"),
            _ => "(no username)".to_string(),
        }
    }

    /// First and last name joined, or `(no name)`.
    pub fn full_name(&self) -> String {
        let joined = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        );
        let trimmed = joined.trim();
        if trimmed.is_empty() {
            "(no name)".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_username() {
        let mut profile = UserProfile::new(UserId(1));
        assert_eq!(profile.display_username(), "(no username)");
        profile.username = Some("luna".to_string());
        assert_eq!(profile.display_username(), "@luna");
    }

    #[test]
    fn test_full_name_variants() {
        let mut profile = UserProfile::new(UserId(1));
        assert_eq!(profile.full_name(), "(no name)");

        profile.first_name = Some("Ada".to_string());
        assert_eq!(profile.full_name(), "Ada");

        profile.last_name = Some("Lovelace".to_string());
        assert_eq!(profile.full_name(), "Ada Lovelace");

        profile.first_name = None;
        assert_eq!(profile.full_name(), "Lovelace");
    }
}
