//! Funnel configuration types.
//!
//! `FunnelConfig` holds the copy, links, and feature switches of the funnel.
//! It can be read from `joingate.toml` and is overlaid with environment
//! variables by the infra layer. All fields have literal defaults.

use serde::{Deserialize, Serialize};

use crate::reply::ChatRef;

pub const DEFAULT_BRAND_NAME: &str = "Elitez Club";
pub const DEFAULT_JOIN_URL: &str = "https://elitez.club/join";
pub const DEFAULT_COMMUNITY_URL: &str = "https://t.me/elitez_club_community";
pub const DEFAULT_SUPPORT_USER: &str = "elitez_club";

/// Funnel settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelConfig {
    /// Name used in the welcome, help, and info copy.
    #[serde(default = "default_brand_name")]
    pub brand_name: String,

    /// Staff chat id or `@channel` receiving lead notifications.
    #[serde(default)]
    pub admin_chat: Option<ChatRef>,

    /// Community group used for join verification. When unset the join
    /// step is skipped.
    #[serde(default)]
    pub group_id: Option<ChatRef>,

    /// The "free access" link unlocked at the end of the funnel.
    #[serde(default = "default_join_url")]
    pub join_url: String,

    /// Public link to the community.
    #[serde(default = "default_community_url")]
    pub community_url: String,

    /// Support account handle, without `@`.
    #[serde(default = "default_support_user")]
    pub support_user: String,

    /// Lead webhook. When unset leads are not recorded.
    #[serde(default)]
    pub lead_webhook_url: Option<String>,

    /// Ask for an email address after verification.
    #[serde(default = "default_true")]
    pub collect_email: bool,

    /// Forward messages from finished users to the admin chat.
    #[serde(default)]
    pub forward_done_messages: bool,

    /// Notify the admin chat on every repeated `/start`, not only the first.
    #[serde(default = "default_true")]
    pub notify_repeat_starts: bool,
}

fn default_brand_name() -> String {
    DEFAULT_BRAND_NAME.to_string()
}

fn default_join_url() -> String {
    DEFAULT_JOIN_URL.to_string()
}

fn default_community_url() -> String {
    DEFAULT_COMMUNITY_URL.to_string()
}

fn default_support_user() -> String {
    DEFAULT_SUPPORT_USER.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for FunnelConfig {
    fn default() -> Self {
        Self {
            brand_name: default_brand_name(),
            admin_chat: None,
            group_id: None,
            join_url: default_join_url(),
            community_url: default_community_url(),
            support_user: default_support_user(),
            lead_webhook_url: None,
            collect_email: true,
            forward_done_messages: false,
            notify_repeat_starts: true,
        }
    }
}

impl FunnelConfig {
    /// Whether the join step is verified against a group.
    pub fn verifies_membership(&self) -> bool {
        self.group_id.is_some()
    }
}
