//! Update processing: the long-polling loop and the shared dispatch step
//! used by both polling and the webhook receiver.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use joingate_core::repository::SessionStore;
use joingate_core::service::{FunnelService, LeadSink};
use joingate_infra::telegram::{TelegramClient, Update, to_inbound};
use joingate_types::error::MessengerError;

/// Pause after a failed `getUpdates` call before polling again.
const ERROR_PAUSE: Duration = Duration::from_secs(3);

/// Map one raw update and run it through the funnel.
///
/// Ignored updates and storage failures are logged; nothing is propagated.
pub async fn dispatch_update<S, L>(funnel: &FunnelService<S, TelegramClient, L>, update: Update)
where
    S: SessionStore,
    L: LeadSink,
{
    let update_id = update.update_id;
    let Some(inbound) = to_inbound(update) else {
        tracing::debug!(update_id, "ignoring update");
        return;
    };

    match funnel.handle(&inbound).await {
        Ok(session) => {
            tracing::debug!(
                update_id,
                user_id = %session.user_id,
                status = %session.status,
                "update handled"
            );
        }
        Err(e) => {
            tracing::error!(update_id, user_id = %inbound.sender.id, error = %e, "failed to handle update");
        }
    }
}

/// Long-poll Telegram until `shutdown` is cancelled.
///
/// Updates are handled one at a time in arrival order. Fails fast only when
/// the token is rejected.
pub async fn run_polling<S, L>(
    funnel: &FunnelService<S, TelegramClient, L>,
    shutdown: CancellationToken,
) -> anyhow::Result<()>
where
    S: SessionStore,
    L: LeadSink,
{
    let telegram = funnel.messenger();

    match telegram.get_me().await {
        Ok(me) => tracing::info!(
            bot = me.username.as_deref().unwrap_or("(unknown)"),
            "connected to Telegram"
        ),
        Err(MessengerError::Unauthorized) => return Err(MessengerError::Unauthorized.into()),
        Err(e) => tracing::warn!(error = %e, "getMe failed, continuing"),
    }

    // getUpdates is refused while a webhook is registered.
    if let Err(e) = telegram.delete_webhook().await {
        tracing::warn!(error = %e, "failed to delete webhook");
    }

    let mut offset: Option<i64> = None;
    tracing::info!(timeout_secs = telegram.poll_timeout_secs(), "polling for updates");

    loop {
        let batch = tokio::select! {
            _ = shutdown.cancelled() => break,
            batch = telegram.get_updates(offset) => batch,
        };

        match batch {
            Ok(updates) => {
                for update in updates {
                    offset = Some(update.update_id + 1);
                    dispatch_update(funnel, update).await;
                }
            }
            Err(MessengerError::Unauthorized) => {
                return Err(MessengerError::Unauthorized.into());
            }
            Err(e) => {
                tracing::warn!(error = %e, "getUpdates failed");
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = tokio::time::sleep(ERROR_PAUSE) => {}
                }
            }
        }
    }

    tracing::info!("polling stopped");
    Ok(())
}
