//! Request handlers.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use tracing::Instrument;
use uuid::Uuid;

use joingate_core::repository::SessionStore;
use joingate_infra::telegram::Update;

use crate::http::error::AppError;
use crate::runner::dispatch_update;
use crate::state::AppState;

/// Header Telegram uses to echo the secret given to `setWebhook`.
pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// POST /telegram/webhook - receive one update.
///
/// Handling runs inline so Telegram sees the response only after the funnel
/// has stored the new state. Funnel failures are logged and still answered
/// with 200; Telegram would otherwise redeliver the same update.
pub async fn telegram_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    if let Some(expected) = state.webhook_secret.as_deref() {
        let provided = headers
            .get(SECRET_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing webhook secret".to_string()))?;
        if !constant_time_eq(expected.as_bytes(), provided.as_bytes()) {
            tracing::warn!("rejected webhook call with wrong secret");
            return Err(AppError::Unauthorized("invalid webhook secret".to_string()));
        }
    }

    let update: Update = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("invalid update payload: {e}")))?;

    let request_id = Uuid::now_v7();
    let span = tracing::info_span!("webhook", %request_id, update_id = update.update_id);
    dispatch_update(state.funnel.as_ref(), update)
        .instrument(span)
        .await;

    Ok(Json(serde_json::json!({ "ok": true })))
}

/// GET /health - liveness plus a session count.
pub async fn health(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let store = state.funnel.store();
    let sessions = store.count().await?;
    Ok(Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "store": store.backend_name(),
        "sessions": sessions,
    })))
}

/// Constant-time byte comparison (XOR-based).
///
/// Time taken is independent of how many bytes match.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use secrecy::SecretString;

    use joingate_core::service::FunnelService;
    use joingate_infra::lead::WebhookLeadSink;
    use joingate_infra::store::AnySessionStore;
    use joingate_infra::telegram::TelegramClient;
    use joingate_types::config::FunnelConfig;
    use joingate_types::session::{FunnelStatus, UserId};

    use crate::http::router::{WEBHOOK_PATH, build_router};

    /// Serve the router with a Telegram client that points at a closed
    /// port, so outbound calls fail fast and are swallowed.
    async fn spawn_app(secret: Option<&str>) -> (String, AppState) {
        let telegram = TelegramClient::new(SecretString::from("1:test".to_string()), 1)
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        let funnel = FunnelService::new(
            AnySessionStore::memory(),
            telegram,
            None::<WebhookLeadSink>,
            FunnelConfig::default(),
        );
        let state = AppState::new(Arc::new(funnel), secret.map(str::to_string));

        let app = build_router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), state)
    }

    fn start_update(user_id: i64) -> serde_json::Value {
        serde_json::json!({
            "update_id": 900,
            "message": {
                "message_id": 1,
                "from": {"id": user_id, "is_bot": false, "first_name": "Ada"},
                "chat": {"id": user_id, "type": "private"},
                "text": "/start",
                "entities": [{"type": "bot_command", "offset": 0, "length": 6}]
            }
        })
    }

    #[tokio::test]
    async fn webhook_without_secret_processes_update() {
        let (base, state) = spawn_app(None).await;
        let resp = reqwest::Client::new()
            .post(format!("{base}{WEBHOOK_PATH}"))
            .json(&start_update(31))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);

        let session = state.funnel.store().get(UserId(31)).await.unwrap().unwrap();
        // No group configured: the welcome skips the join step.
        assert_eq!(session.status, FunnelStatus::WaitingEmail);
        assert_eq!(session.start_count, 1);
    }

    #[tokio::test]
    async fn webhook_rejects_missing_or_wrong_secret() {
        let (base, state) = spawn_app(Some("s3cret")).await;
        let client = reqwest::Client::new();

        let missing = client
            .post(format!("{base}{WEBHOOK_PATH}"))
            .json(&start_update(32))
            .send()
            .await
            .unwrap();
        assert_eq!(missing.status(), 401);

        let wrong = client
            .post(format!("{base}{WEBHOOK_PATH}"))
            .header(SECRET_HEADER, "guess")
            .json(&start_update(32))
            .send()
            .await
            .unwrap();
        assert_eq!(wrong.status(), 401);
        assert!(state.funnel.store().get(UserId(32)).await.unwrap().is_none());

        let right = client
            .post(format!("{base}{WEBHOOK_PATH}"))
            .header(SECRET_HEADER, "s3cret")
            .json(&start_update(32))
            .send()
            .await
            .unwrap();
        assert_eq!(right.status(), 200);
        assert!(state.funnel.store().get(UserId(32)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn webhook_rejects_malformed_payload() {
        let (base, _) = spawn_app(None).await;
        let resp = reqwest::Client::new()
            .post(format!("{base}{WEBHOOK_PATH}"))
            .body("{not json")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn health_reports_session_count() {
        let (base, state) = spawn_app(None).await;
        state.funnel.store().get_or_create(UserId(1)).await.unwrap();

        let body: serde_json::Value = reqwest::get(format!("{base}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["store"], "memory");
        assert_eq!(body["sessions"], 1);
    }

    #[test]
    fn constant_time_eq_behaviour() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
    }
}
