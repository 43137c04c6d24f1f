//! User-facing copy and inline keyboards.

use chrono::{DateTime, Utc};
use url::Url;

use joingate_types::config::FunnelConfig;
use joingate_types::event::CallbackAction;
use joingate_types::profile::UserProfile;
use joingate_types::reply::{InlineButton, InlineKeyboard, OutboundMessage};

/// Example shown when an email is rejected.
pub const EMAIL_EXAMPLE: &str = "name@example.com";

// ---------------------------------------------------------------------------
// Keyboards
// ---------------------------------------------------------------------------

/// "Join the Community" link plus the "I Joined" confirmation.
pub fn join_gate_keyboard(config: &FunnelConfig) -> InlineKeyboard {
    InlineKeyboard::single_column(vec![
        InlineButton::url("👥 Join the Community", &config.community_url),
        InlineButton::callback("✅ I Joined", CallbackAction::JoinedCommunity),
    ])
}

/// Final access, support, and community links.
pub fn access_keyboard(config: &FunnelConfig, profile: &UserProfile) -> InlineKeyboard {
    InlineKeyboard::single_column(vec![
        InlineButton::url("🚪 Claim Free Access", &config.join_url),
        InlineButton::url("💬 Contact Support", support_link(config, profile)),
        InlineButton::url("👥 Community", &config.community_url),
    ])
}

fn start_keyboard() -> InlineKeyboard {
    InlineKeyboard::single_column(vec![InlineButton::callback(
        "🚀 Start",
        CallbackAction::RestartFlow,
    )])
}

/// Deep link to the support account with a prefilled message.
pub fn support_link(config: &FunnelConfig, profile: &UserProfile) -> String {
    let base = format!("https://t.me/{}", config.support_user.trim_start_matches('@'));
    let text = format!(
        "Hi, I need help with {} free access.\nName: {}",
        config.brand_name,
        profile.full_name()
    );
    match Url::parse_with_params(&base, &[("text", text.as_str())]) {
        Ok(url) => url.into(),
        Err(_) => base,
    }
}

// ---------------------------------------------------------------------------
// Funnel steps
// ---------------------------------------------------------------------------

pub fn welcome_join_gate(config: &FunnelConfig) -> OutboundMessage {
    let last_step = if config.collect_email {
        "Step 2: Tap ✅ I Joined, then share your email to unlock the free access link."
    } else {
        "Step 2: Tap ✅ I Joined to unlock the free access link."
    };
    OutboundMessage::with_keyboard(
        format!(
            "Welcome to {} 👑\n\nStep 1: Join the community.\n{last_step}",
            config.brand_name
        ),
        join_gate_keyboard(config),
    )
}

/// Welcome used when no verification group is configured.
pub fn welcome_open(config: &FunnelConfig) -> OutboundMessage {
    OutboundMessage::text(format!("Welcome to {} 👑", config.brand_name))
}

pub fn join_first(config: &FunnelConfig) -> OutboundMessage {
    OutboundMessage::with_keyboard(
        "Join the community first, then tap ✅ I Joined.",
        join_gate_keyboard(config),
    )
}

pub fn join_not_confirmed(config: &FunnelConfig) -> OutboundMessage {
    OutboundMessage::with_keyboard(
        "❌ I can't confirm your join yet.\n\nJoin the community first, then tap ✅ I Joined again.",
        join_gate_keyboard(config),
    )
}

pub fn verify_unavailable(config: &FunnelConfig) -> OutboundMessage {
    OutboundMessage::with_keyboard(
        "⚠️ I couldn't verify right now.\n\nTry again in a minute.",
        join_gate_keyboard(config),
    )
}

pub fn email_prompt(headline: &str) -> OutboundMessage {
    OutboundMessage::text(format!(
        "{headline}\n\nLast step: send your email address to unlock the free access link."
    ))
}

pub fn email_invalid() -> OutboundMessage {
    OutboundMessage::text(format!(
        "That doesn't look like an email address.\n\nPlease send it like this: {EMAIL_EXAMPLE}"
    ))
}

pub fn access(config: &FunnelConfig, profile: &UserProfile, headline: &str) -> OutboundMessage {
    OutboundMessage::with_keyboard(
        format!("{headline}\n\nFree access is live for a limited time:"),
        access_keyboard(config, profile),
    )
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

pub fn help(config: &FunnelConfig) -> OutboundMessage {
    let mut steps = vec!["• Join the community", "• Verify"];
    if config.collect_email {
        steps.push("• Share your email");
    }
    steps.push("• Get free access link");
    OutboundMessage::with_keyboard(
        format!(
            "{} Bot 👑\n\n{}\n\nTap below to begin:",
            config.brand_name,
            steps.join("\n")
        ),
        start_keyboard(),
    )
}

pub fn info(config: &FunnelConfig) -> OutboundMessage {
    OutboundMessage::text(format!(
        "{brand} 👑\n\nMembers of the {brand} community get free access for a limited time.\n\n\
         Community: {community}\nSupport: @{support}",
        brand = config.brand_name,
        community = config.community_url,
        support = config.support_user.trim_start_matches('@'),
    ))
}

pub fn trial(config: &FunnelConfig) -> OutboundMessage {
    OutboundMessage::with_keyboard(
        format!(
            "🎁 {} free trial\n\nComplete the quick steps and the free access link is yours.\n\nTap below to begin:",
            config.brand_name
        ),
        start_keyboard(),
    )
}

pub fn restarted() -> OutboundMessage {
    OutboundMessage::text("🔄 Restarted.")
}

pub fn unknown_command() -> OutboundMessage {
    OutboundMessage::text("I don't know that command. Tap /start to begin or /help for more.")
}

// ---------------------------------------------------------------------------
// Admin notices
// ---------------------------------------------------------------------------

fn identity_block(profile: &UserProfile) -> String {
    format!(
        "👤 Name: {}\n📛 User: {}\n🆔 ID: {}",
        profile.full_name(),
        profile.display_username(),
        profile.id
    )
}

pub fn admin_start(profile: &UserProfile, start_count: u32, now: DateTime<Utc>) -> String {
    let label = if start_count <= 1 {
        "🟢 New lead (START)".to_string()
    } else {
        format!("🟡 START again (x{start_count})")
    };
    format!(
        "{label}\n\n{}\n🕒 Time: {}",
        identity_block(profile),
        now.to_rfc3339()
    )
}

pub fn admin_verified(profile: &UserProfile, awaiting_email: bool) -> String {
    let what = if awaiting_email {
        "✅ Verified community join, waiting for email"
    } else {
        "✅ Verified community join + unlocked access"
    };
    format!("{what}\n\n{}", identity_block(profile))
}

pub fn admin_unverified_unlock(profile: &UserProfile) -> String {
    format!(
        "🟣 Unlocked without verification (GROUP_ID missing)\n\n{}",
        identity_block(profile)
    )
}

pub fn admin_email_captured(profile: &UserProfile, email: &str) -> String {
    format!(
        "📧 Email captured + unlocked access\n\n{}\n✉️ Email: {email}",
        identity_block(profile)
    )
}

pub fn admin_forward(profile: &UserProfile, text: &str) -> String {
    format!("💬 Message from finished lead\n\n{}\n\n{text}", identity_block(profile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use joingate_types::session::UserId;

    fn profile() -> UserProfile {
        UserProfile {
            id: UserId(7),
            username: Some("ada".to_string()),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
        }
    }

    #[test]
    fn test_support_link_prefills_name() {
        let link = support_link(&FunnelConfig::default(), &profile());
        assert!(link.starts_with("https://t.me/elitez_club?text="));
        assert!(link.contains("Ada"));
        assert!(!link.contains(' '));
    }

    #[test]
    fn test_support_link_strips_at_sign() {
        let config = FunnelConfig {
            support_user: "@helpdesk".to_string(),
            ..FunnelConfig::default()
        };
        assert!(support_link(&config, &profile()).starts_with("https://t.me/helpdesk?"));
    }

    #[test]
    fn test_access_keyboard_links() {
        let config = FunnelConfig::default();
        let kb = access_keyboard(&config, &profile());
        let urls: Vec<&str> = kb
            .buttons()
            .filter_map(|b| match b {
                InlineButton::Url { url, .. } => Some(url.as_str()),
                InlineButton::Callback { .. } => None,
            })
            .collect();
        assert_eq!(urls.len(), 3);
        assert_eq!(urls[0], config.join_url);
        assert_eq!(urls[2], config.community_url);
    }

    #[test]
    fn test_admin_start_labels() {
        let now = Utc::now();
        assert!(admin_start(&profile(), 1, now).starts_with("🟢 New lead"));
        assert!(admin_start(&profile(), 3, now).starts_with("🟡 START again (x3)"));
    }

    #[test]
    fn test_help_mentions_email_only_when_collected() {
        let mut config = FunnelConfig::default();
        assert!(help(&config).text.contains("email"));
        config.collect_email = false;
        assert!(!help(&config).text.contains("email"));
    }
}
