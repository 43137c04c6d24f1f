//! joingate entry point.
//!
//! Binary name: `joingate`
//!
//! Parses CLI arguments, sets up tracing, wires the funnel service, then
//! runs the long-polling loop, the webhook receiver, or a session
//! inspection command.

mod cli;
mod http;
mod runner;
mod state;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use clap_complete::generate;
use tokio_util::sync::CancellationToken;

use joingate_infra::config::{process_env, require_token};
use joingate_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};

use cli::{Cli, Commands, DEFAULT_POLL_TIMEOUT, SessionsCommand, StoreKind};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need tracing or state
    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "joingate", &mut std::io::stdout());
        return Ok(());
    }

    let default_filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "info,joingate=debug,joingate_core=debug,joingate_infra=debug",
        _ => "trace",
    };
    init_tracing(&TracingOptions {
        default_filter: default_filter.to_string(),
        json: cli.log_json,
        otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(&cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let Some(command) = &cli.command else {
        let poll_timeout = process_env("POLL_TIMEOUT")
            .map(|v| v.parse::<u64>())
            .transpose()
            .context("POLL_TIMEOUT must be a number of seconds")?
            .unwrap_or(DEFAULT_POLL_TIMEOUT);
        return poll(cli, process_env("BOT_TOKEN"), poll_timeout).await;
    };

    match command {
        Commands::Poll { bot, poll_timeout } => {
            poll(cli, bot.token.clone(), *poll_timeout).await?;
        }

        Commands::Serve {
            bot,
            port,
            host,
            public_url,
            webhook_secret,
        } => {
            let token = require_token(bot.token.clone())?;
            let funnel = Arc::new(state::build_funnel(cli, token, 0).await?);

            if let Some(public_url) = public_url {
                let url = format!(
                    "{}{}",
                    public_url.trim_end_matches('/'),
                    http::router::WEBHOOK_PATH
                );
                funnel
                    .messenger()
                    .set_webhook(&url, webhook_secret.as_deref())
                    .await
                    .with_context(|| format!("failed to register webhook at {url}"))?;
                tracing::info!(url = %url, "webhook registered");
            }

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;

            if !cli.quiet {
                println!(
                    "  {} joingate listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let state = AppState::new(funnel, webhook_secret.clone());
            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Sessions { action } => {
            if cli.store == StoreKind::Memory && !cli.quiet {
                eprintln!(
                    "  {} memory store selected; pass --store sqlite to inspect persisted sessions",
                    console::style("!").yellow().bold()
                );
            }
            let store = state::open_store(cli).await?;

            match action {
                SessionsCommand::List { status, limit } => {
                    cli::sessions::list_sessions(&store, status.as_deref(), *limit, cli.json)
                        .await?;
                }
                SessionsCommand::Show { user_id } => {
                    cli::sessions::show_session(&store, user_id, cli.json).await?;
                }
                SessionsCommand::Reset { user_id } => {
                    cli::sessions::reset_session(&store, user_id, cli.json).await?;
                }
            }
        }

        Commands::Completions { .. } => unreachable!("handled in main"),
    }

    Ok(())
}

/// Run the long-polling bot until Ctrl+C or SIGTERM.
async fn poll(cli: &Cli, token: Option<String>, poll_timeout: u64) -> anyhow::Result<()> {
    let token = require_token(token)?;
    let funnel = state::build_funnel(cli, token, poll_timeout).await?;

    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("shutdown requested");
        trigger.cancel();
    });

    runner::run_polling(&funnel, shutdown).await
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
