//! Funnel configuration loader.
//!
//! Reads an optional `joingate.toml` into [`FunnelConfig`], falling back to
//! defaults when the file is missing or malformed, then overlays environment
//! variables. Environment always wins over the file.

use std::path::Path;

use secrecy::SecretString;
use url::Url;

use joingate_types::config::FunnelConfig;
use joingate_types::error::ConfigError;
use joingate_types::reply::ChatRef;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "joingate.toml";

/// Load funnel settings from `path`.
///
/// - Missing file: [`FunnelConfig::default()`], logged at debug.
/// - Unreadable or unparsable file: defaults, logged as a warning.
pub async fn load_funnel_config(path: &Path) -> FunnelConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return FunnelConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return FunnelConfig::default();
        }
    };

    match toml::from_str::<FunnelConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            FunnelConfig::default()
        }
    }
}

/// Read a process environment variable, treating empty or non-Unicode
/// values as unset.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Overlay environment variables on `config`.
///
/// `lookup` resolves a variable name; pass [`process_env`] in production.
/// Blank values count as unset. A malformed value is logged and skipped, so
/// the file or default value stays in effect.
pub fn apply_env_overrides(
    mut config: FunnelConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> FunnelConfig {
    let get = |key: &str| {
        lookup(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    if let Some(value) = get("BRAND_NAME") {
        config.brand_name = value;
    }
    if let Some(value) = get("ADMIN_CHAT") {
        set_or_warn(&mut config.admin_chat, parse_chat("ADMIN_CHAT", &value).map(Some));
    }
    if let Some(value) = get("GROUP_ID") {
        set_or_warn(&mut config.group_id, parse_chat("GROUP_ID", &value).map(Some));
    }
    if let Some(value) = get("JOIN_URL") {
        set_or_warn(&mut config.join_url, parse_url("JOIN_URL", &value));
    }
    if let Some(value) = get("COMMUNITY_URL") {
        set_or_warn(&mut config.community_url, parse_url("COMMUNITY_URL", &value));
    }
    if let Some(value) = get("SUPPORT_USER") {
        config.support_user = value.trim_start_matches('@').to_string();
    }
    if let Some(value) = get("LEAD_WEBHOOK_URL") {
        set_or_warn(
            &mut config.lead_webhook_url,
            parse_url("LEAD_WEBHOOK_URL", &value).map(Some),
        );
    }
    if let Some(value) = get("COLLECT_EMAIL") {
        set_or_warn(&mut config.collect_email, parse_bool("COLLECT_EMAIL", &value));
    }
    if let Some(value) = get("FORWARD_DONE_MESSAGES") {
        set_or_warn(
            &mut config.forward_done_messages,
            parse_bool("FORWARD_DONE_MESSAGES", &value),
        );
    }
    if let Some(value) = get("NOTIFY_REPEAT_STARTS") {
        set_or_warn(
            &mut config.notify_repeat_starts,
            parse_bool("NOTIFY_REPEAT_STARTS", &value),
        );
    }

    config
}

fn set_or_warn<T>(slot: &mut T, parsed: Result<T, ConfigError>) {
    match parsed {
        Ok(value) => *slot = value,
        Err(e) => tracing::warn!(error = %e, "invalid value, using default"),
    }
}

/// Wrap the bot token, failing when it is absent or blank.
pub fn require_token(token: Option<String>) -> Result<SecretString, ConfigError> {
    match token {
        Some(token) if !token.trim().is_empty() => Ok(SecretString::from(token.trim().to_string())),
        _ => Err(ConfigError::MissingToken),
    }
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.into(),
    }
}

fn parse_chat(key: &str, value: &str) -> Result<ChatRef, ConfigError> {
    value.parse().map_err(|e: String| invalid(key, e))
}

fn parse_url(key: &str, value: &str) -> Result<String, ConfigError> {
    let url = Url::parse(value).map_err(|e| invalid(key, e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(value.to_string()),
        other => Err(invalid(key, format!("unsupported scheme '{other}'"))),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(invalid(key, format!("expected true/false, got '{other}'"))),
    }
}
