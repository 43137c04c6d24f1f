//! Inbound events, mapped from platform updates at the transport boundary.
//!
//! The transport layer converts raw platform payloads into [`InboundUpdate`]
//! so the funnel never sees SDK-specific shapes.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::profile::UserProfile;

/// Callback actions carried by inline buttons.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallbackAction {
    /// "I Joined" on the join gate.
    JoinedCommunity,
    /// "Start" on the help/trial screens.
    RestartFlow,
}

impl CallbackAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallbackAction::JoinedCommunity => "joined_community",
            CallbackAction::RestartFlow => "restart_flow",
        }
    }
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CallbackAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "joined_community" => Ok(CallbackAction::JoinedCommunity),
            "restart_flow" => Ok(CallbackAction::RestartFlow),
            other => Err(format!("unknown callback action: '{other}'")),
        }
    }
}

/// A bot command, e.g. `/start` or `/help@my_bot arg`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotCommand {
    /// Lowercased command name without the leading slash or `@bot` suffix.
    pub name: String,
    /// Remainder of the message after the command, trimmed.
    pub args: String,
}

impl BotCommand {
    /// Parse a message whose text starts with a command.
    ///
    /// Returns `None` when the text does not start with `/` or the name is empty.
    pub fn parse(text: &str) -> Option<Self> {
        let rest = text.trim_start().strip_prefix('/')?;
        let (head, args) = match rest.split_once(char::is_whitespace) {
            Some((head, args)) => (head, args.trim()),
            None => (rest, ""),
        };
        let name = head.split('@').next().unwrap_or_default().to_lowercase();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name,
            args: args.to_string(),
        })
    }
}

/// What the user did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InboundEvent {
    Command(BotCommand),
    Text { text: String },
    Callback { query_id: String, data: String },
}

/// One inbound update, normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundUpdate {
    pub update_id: i64,
    /// Chat the reply goes to (the private chat with the user).
    pub chat_id: i64,
    pub sender: UserProfile,
    pub event: InboundEvent,
}

impl InboundUpdate {
    /// Callback query id, if this update is a button press.
    pub fn callback_query_id(&self) -> Option<&str> {
        match &self.event {
            InboundEvent::Callback { query_id, .. } => Some(query_id),
            _ => None,
        }
    }
}
