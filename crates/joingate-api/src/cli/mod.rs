//! CLI command definitions for the `joingate` binary.
//!
//! Uses clap derive macros. Every runtime setting has an environment
//! variable fallback so the bot can be configured entirely from the
//! environment in container deployments.

pub mod sessions;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use joingate_infra::config::CONFIG_FILE_NAME;

/// Telegram join-gated lead funnel bot.
#[derive(Parser)]
#[command(name = "joingate", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true, env = "JOINGATE_LOG_JSON")]
    pub log_json: bool,

    /// Export spans to stdout via OpenTelemetry.
    #[arg(long, global = true, env = "JOINGATE_OTEL")]
    pub otel: bool,

    /// Funnel settings file (TOML). Missing file means defaults.
    #[arg(long, global = true, env = "JOINGATE_CONFIG", default_value = CONFIG_FILE_NAME)]
    pub config: PathBuf,

    /// Session storage backend.
    #[arg(long, global = true, env = "SESSION_STORE", value_enum, default_value_t = StoreKind::Memory)]
    pub store: StoreKind,

    /// SQLite database URL (sqlite store only). Defaults to ~/.joingate/joingate.db.
    #[arg(long, global = true, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Defaults to `poll` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// Process memory; sessions are lost on restart.
    Memory,
    /// SQLite file; sessions survive restarts.
    Sqlite,
}

/// Default long-poll wait in seconds.
pub const DEFAULT_POLL_TIMEOUT: u64 = 30;

/// Settings shared by the commands that talk to Telegram.
#[derive(Args)]
pub struct BotArgs {
    /// Bot token from BotFather.
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot with long polling.
    Poll {
        #[command(flatten)]
        bot: BotArgs,

        /// Seconds each getUpdates call waits for new updates.
        #[arg(long, env = "POLL_TIMEOUT", default_value_t = DEFAULT_POLL_TIMEOUT)]
        poll_timeout: u64,
    },

    /// Run the bot as a webhook receiver.
    Serve {
        #[command(flatten)]
        bot: BotArgs,

        /// Port to listen on.
        #[arg(long, short, env = "PORT", default_value_t = 8080)]
        port: u16,

        /// Host to bind to.
        #[arg(long, env = "HOST", default_value = "127.0.0.1")]
        host: String,

        /// Public base URL; when set, the webhook is registered with Telegram
        /// at `{public_url}/telegram/webhook`.
        #[arg(long, env = "PUBLIC_URL")]
        public_url: Option<String>,

        /// Shared secret Telegram echoes in `X-Telegram-Bot-Api-Secret-Token`.
        #[arg(long, env = "WEBHOOK_SECRET", hide_env_values = true)]
        webhook_secret: Option<String>,
    },

    /// Inspect and reset stored funnel sessions.
    Sessions {
        #[command(subcommand)]
        action: SessionsCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum SessionsCommand {
    /// List sessions, most recently updated first.
    #[command(alias = "ls")]
    List {
        /// Only sessions in this status (new, waiting_join, waiting_email, done).
        #[arg(long)]
        status: Option<String>,

        /// Maximum number of sessions to show.
        #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u32).range(1..))]
        limit: u32,
    },

    /// Show one session.
    Show {
        /// Telegram user id.
        user_id: String,
    },

    /// Put a user back at the start of the funnel.
    Reset {
        /// Telegram user id.
        user_id: String,
    },
}
