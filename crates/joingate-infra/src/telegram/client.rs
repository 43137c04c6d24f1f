//! TelegramClient -- concrete [`Messenger`] implementation over the Bot API.
//!
//! Every method is a JSON `POST` to `{base_url}/bot{token}/{method}`. The bot
//! token is wrapped in [`secrecy::SecretString`]; it is only exposed when
//! building the request URL and is stripped from transport errors before they
//! are surfaced.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;

use joingate_core::service::Messenger;
use joingate_types::error::MessengerError;
use joingate_types::membership::MemberStatus;
use joingate_types::reply::{ChatRef, OutboundMessage};
use joingate_types::session::UserId;

use super::types::{
    ALLOWED_UPDATES, AnswerCallbackQueryRequest, ApiResponse, ChatMember, DeleteWebhookRequest,
    GetChatMemberRequest, GetUpdatesRequest, InlineKeyboardMarkup, SendMessageRequest,
    SetWebhookRequest, Update, User,
};

/// Default Bot API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Headroom added on top of the long-poll timeout for the HTTP request itself.
const REQUEST_SLACK_SECS: u64 = 15;

/// Telegram Bot API client.
///
/// The HTTP timeout is derived from the long-poll timeout so that a
/// `getUpdates` call that legitimately waits the full interval is not cut
/// short by the client.
pub struct TelegramClient {
    client: reqwest::Client,
    token: SecretString,
    base_url: String,
    poll_timeout_secs: u64,
}

impl TelegramClient {
    /// Create a new client.
    ///
    /// * `token` - bot token from BotFather
    /// * `poll_timeout_secs` - long-poll wait used by [`get_updates`](Self::get_updates)
    pub fn new(token: SecretString, poll_timeout_secs: u64) -> Result<Self, MessengerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(poll_timeout_secs + REQUEST_SLACK_SECS))
            .build()
            .map_err(|e| MessengerError::Transport(e.without_url().to_string()))?;

        Ok(Self {
            client,
            token,
            base_url: DEFAULT_API_BASE.to_string(),
            poll_timeout_secs,
        })
    }

    /// Override the base URL (useful for testing or a local Bot API server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn poll_timeout_secs(&self) -> u64 {
        self.poll_timeout_secs
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token.expose_secret(), method)
    }

    /// Call a Bot API method and unwrap the response envelope.
    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, MessengerError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| MessengerError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(MessengerError::Unauthorized);
        }

        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| MessengerError::Deserialization(e.without_url().to_string()))?;

        if !envelope.ok {
            return Err(MessengerError::Api {
                code: envelope.error_code.unwrap_or(i64::from(status.as_u16())),
                description: envelope
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            });
        }

        envelope.result.ok_or_else(|| {
            MessengerError::Deserialization(format!("{method}: ok response without result"))
        })
    }

    /// Long-poll for updates newer than `offset`.
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, MessengerError> {
        let request = GetUpdatesRequest {
            offset,
            timeout: self.poll_timeout_secs,
            allowed_updates: ALLOWED_UPDATES,
        };
        self.call("getUpdates", &request).await
    }

    /// Identify the bot (token sanity check).
    pub async fn get_me(&self) -> Result<User, MessengerError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Register `url` as the webhook endpoint.
    pub async fn set_webhook(
        &self,
        url: &str,
        secret_token: Option<&str>,
    ) -> Result<(), MessengerError> {
        let request = SetWebhookRequest {
            url,
            secret_token,
            allowed_updates: ALLOWED_UPDATES,
        };
        let _: bool = self.call("setWebhook", &request).await?;
        Ok(())
    }

    /// Remove any registered webhook. Long polling fails while one is set.
    pub async fn delete_webhook(&self) -> Result<(), MessengerError> {
        let request = DeleteWebhookRequest {
            drop_pending_updates: false,
        };
        let _: bool = self.call("deleteWebhook", &request).await?;
        Ok(())
    }
}

impl Messenger for TelegramClient {
    async fn send_message(
        &self,
        chat: &ChatRef,
        message: &OutboundMessage,
    ) -> Result<(), MessengerError> {
        let request = SendMessageRequest {
            chat_id: chat,
            text: &message.text,
            reply_markup: message.keyboard.as_ref().map(InlineKeyboardMarkup::from),
        };
        let _: serde_json::Value = self.call("sendMessage", &request).await?;
        Ok(())
    }

    async fn member_status(
        &self,
        group: &ChatRef,
        user: UserId,
    ) -> Result<MemberStatus, MessengerError> {
        let request = GetChatMemberRequest {
            chat_id: group,
            user_id: user.0,
        };
        let member: ChatMember = self.call("getChatMember", &request).await?;
        Ok(member.status)
    }

    async fn answer_callback(&self, query_id: &str) -> Result<(), MessengerError> {
        let request = AnswerCallbackQueryRequest {
            callback_query_id: query_id,
        };
        let _: bool = self.call("answerCallbackQuery", &request).await?;
        Ok(())
    }
}
