//! Application wiring.
//!
//! `FunnelService` is generic over its ports; the binary pins it to the
//! Telegram client, the runtime-selected session store, and the webhook
//! lead sink.

use std::path::Path;
use std::sync::Arc;

use secrecy::SecretString;

use joingate_core::service::FunnelService;
use joingate_infra::config::{apply_env_overrides, load_funnel_config, process_env};
use joingate_infra::lead::WebhookLeadSink;
use joingate_infra::sqlite::default_database_url;
use joingate_infra::store::AnySessionStore;
use joingate_infra::telegram::TelegramClient;
use joingate_types::config::FunnelConfig;

use crate::cli::{Cli, StoreKind};

pub type ConcreteFunnelService = FunnelService<AnySessionStore, TelegramClient, WebhookLeadSink>;

/// Shared state for the webhook receiver.
#[derive(Clone)]
pub struct AppState {
    pub funnel: Arc<ConcreteFunnelService>,
    /// Expected `X-Telegram-Bot-Api-Secret-Token`; `None` disables the check.
    pub webhook_secret: Option<Arc<str>>,
}

impl AppState {
    pub fn new(funnel: Arc<ConcreteFunnelService>, webhook_secret: Option<String>) -> Self {
        Self {
            funnel,
            webhook_secret: webhook_secret
                .filter(|s| !s.is_empty())
                .map(Arc::from),
        }
    }
}

/// File settings overlaid with the process environment.
pub async fn load_config(path: &Path) -> FunnelConfig {
    let file_config = load_funnel_config(path).await;
    apply_env_overrides(file_config, process_env)
}

/// Open the session store selected on the command line.
pub async fn open_store(cli: &Cli) -> anyhow::Result<AnySessionStore> {
    match cli.store {
        StoreKind::Memory => Ok(AnySessionStore::memory()),
        StoreKind::Sqlite => {
            let url = cli
                .database_url
                .clone()
                .unwrap_or_else(default_database_url);
            ensure_parent_dir(&url).await?;
            Ok(AnySessionStore::sqlite(&url).await?)
        }
    }
}

/// SQLite creates the file but not its directory.
async fn ensure_parent_dir(database_url: &str) -> anyhow::Result<()> {
    let Some(rest) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path == ":memory:" {
        return Ok(());
    }
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    Ok(())
}

/// Build the funnel service: config, store, Telegram client, and lead sink.
pub async fn build_funnel(
    cli: &Cli,
    token: SecretString,
    poll_timeout_secs: u64,
) -> anyhow::Result<ConcreteFunnelService> {
    let config = load_config(&cli.config).await;
    let store = open_store(cli).await?;
    let messenger = TelegramClient::new(token, poll_timeout_secs)?;
    let leads = config
        .lead_webhook_url
        .as_deref()
        .map(WebhookLeadSink::new)
        .transpose()?;

    if config.group_id.is_none() {
        tracing::warn!("GROUP_ID not set; users are unlocked without join verification");
    }
    if config.admin_chat.is_none() {
        tracing::info!("ADMIN_CHAT not set; admin notifications disabled");
    }
    if leads.is_none() {
        tracing::info!("LEAD_WEBHOOK_URL not set; leads are not recorded");
    }
    tracing::info!(
        brand = %config.brand_name,
        store = store.backend_name(),
        collect_email = config.collect_email,
        "funnel configured"
    );

    Ok(FunnelService::new(store, messenger, leads, config))
}
