//! Telegram Bot API types.
//!
//! These are the Telegram-specific request/response structures used for
//! HTTP communication with the Bot API. Only the fields the funnel reads are
//! modelled; unknown fields are ignored on deserialization.

use serde::{Deserialize, Serialize};

use joingate_types::membership::MemberStatus;
use joingate_types::reply::{ChatRef, InlineButton, InlineKeyboard};

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

/// Every Bot API method answers with this envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

// ---------------------------------------------------------------------------
// Updates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<MessageEntity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    /// "private", "group", "supergroup", or "channel".
    #[serde(rename = "type")]
    pub kind: String,
}

impl Chat {
    pub fn is_private(&self) -> bool {
        self.kind == "private"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEntity {
    /// e.g. "bot_command", "url", "mention".
    #[serde(rename = "type")]
    pub kind: String,
    pub offset: i64,
    pub length: i64,
}

impl MessageEntity {
    pub fn is_bot_command(&self) -> bool {
        self.kind == "bot_command"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    /// The message carrying the button. May be an "inaccessible message",
    /// which still has `chat`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<CallbackMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackMessage {
    pub chat: Chat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatMember {
    pub status: MemberStatus,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct GetUpdatesRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    pub timeout: u64,
    pub allowed_updates: &'a [&'a str],
}

#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: &'a ChatRef,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
pub struct GetChatMemberRequest<'a> {
    pub chat_id: &'a ChatRef,
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
pub struct AnswerCallbackQueryRequest<'a> {
    pub callback_query_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SetWebhookRequest<'a> {
    pub url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_token: Option<&'a str>,
    pub allowed_updates: &'a [&'a str],
}

#[derive(Debug, Serialize)]
pub struct DeleteWebhookRequest {
    pub drop_pending_updates: bool,
}

/// Update kinds the bot subscribes to.
pub const ALLOWED_UPDATES: &[&str] = &["message", "callback_query"];

// ---------------------------------------------------------------------------
// Inline keyboards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
}

impl From<&InlineButton> for InlineKeyboardButton {
    fn from(button: &InlineButton) -> Self {
        match button {
            InlineButton::Url { label, url } => Self {
                text: label.clone(),
                url: Some(url.clone()),
                callback_data: None,
            },
            InlineButton::Callback { label, action } => Self {
                text: label.clone(),
                url: None,
                callback_data: Some(action.as_str().to_string()),
            },
        }
    }
}

impl From<&InlineKeyboard> for InlineKeyboardMarkup {
    fn from(keyboard: &InlineKeyboard) -> Self {
        Self {
            inline_keyboard: keyboard
                .rows
                .iter()
                .map(|row| row.iter().map(InlineKeyboardButton::from).collect())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use joingate_types::event::CallbackAction;

    #[test]
    fn test_deserialize_command_update() {
        let json = r#"{
            "update_id": 10,
            "message": {
                "message_id": 1,
                "date": 1700000000,
                "from": {"id": 77, "is_bot": false, "first_name": "Ada", "language_code": "en"},
                "chat": {"id": 77, "type": "private", "first_name": "Ada"},
                "text": "/start",
                "entities": [{"type": "bot_command", "offset": 0, "length": 6}]
            }
        }"#;
        let update: Update = serde_json::from_str(json).unwrap();
        let message = update.message.unwrap();
        assert_eq!(message.from.unwrap().id, 77);
        assert!(message.chat.is_private());
        assert!(message.entities[0].is_bot_command());
    }

    #[test]
    fn test_deserialize_error_envelope() {
        let json = r#"{"ok": false, "error_code": 400, "description": "Bad Request: chat not found"}"#;
        let resp: ApiResponse<ChatMember> = serde_json::from_str(json).unwrap();
        assert!(!resp.ok);
        assert!(resp.result.is_none());
        assert_eq!(resp.error_code, Some(400));
    }

    #[test]
    fn test_deserialize_chat_member() {
        let json = r#"{"ok": true, "result": {"status": "creator", "user": {"id": 1, "is_bot": false, "first_name": "A"}, "is_anonymous": false}}"#;
        let resp: ApiResponse<ChatMember> = serde_json::from_str(json).unwrap();
        assert_eq!(resp.result.unwrap().status, MemberStatus::Creator);
    }

    #[test]
    fn test_keyboard_markup_serialization() {
        let keyboard = InlineKeyboard::single_column(vec![
            InlineButton::url("Join", "https://t.me/x"),
            InlineButton::callback("I Joined", CallbackAction::JoinedCommunity),
        ]);
        let markup = InlineKeyboardMarkup::from(&keyboard);
        let json = serde_json::to_value(&markup).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "inline_keyboard": [
                    [{"text": "Join", "url": "https://t.me/x"}],
                    [{"text": "I Joined", "callback_data": "joined_community"}]
                ]
            })
        );
    }

    #[test]
    fn test_send_message_request_uses_chat_ref() {
        let chat = ChatRef::Username("@staff".to_string());
        let req = SendMessageRequest {
            chat_id: &chat,
            text: "hi",
            reply_markup: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"chat_id": "@staff", "text": "hi"}));
    }
}
