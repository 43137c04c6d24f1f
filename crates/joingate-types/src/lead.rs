//! Lead records posted to the external lead webhook.

use serde::{Deserialize, Serialize};

use crate::profile::UserProfile;
use crate::session::UserId;

/// JSON body of the lead webhook: `{user_id, username, full_name, email}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub user_id: UserId,
    pub username: String,
    pub full_name: String,
    pub email: Option<String>,
}

impl LeadRecord {
    pub fn from_profile(profile: &UserProfile, email: Option<String>) -> Self {
        Self {
            user_id: profile.id,
            username: profile.display_username(),
            full_name: profile.full_name(),
            email,
        }
    }
}
