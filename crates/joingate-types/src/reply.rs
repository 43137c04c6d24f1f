//! Outbound messages and inline keyboards.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::event::CallbackAction;

/// Target chat for an outbound message: numeric id or `@channel` handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatRef {
    Id(i64),
    Username(String),
}

impl fmt::Display for ChatRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatRef::Id(id) => write!(f, "{id}"),
            ChatRef::Username(name) => f.write_str(name),
        }
    }
}

impl FromStr for ChatRef {
    type Err = String;

    /// Numeric strings become [`ChatRef::Id`]; anything else is a handle and
    /// gets a leading `@` if missing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("chat reference cannot be empty".to_string());
        }
        if let Ok(id) = s.parse::<i64>() {
            return Ok(ChatRef::Id(id));
        }
        if s.chars().any(char::is_whitespace) {
            return Err(format!("invalid chat reference: '{s}'"));
        }
        if s.starts_with('@') {
            Ok(ChatRef::Username(s.to_string()))
        } else {
            Ok(ChatRef::Username(format!("@{s}")))
        }
    }
}

/// One inline button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InlineButton {
    Url { label: String, url: String },
    Callback { label: String, action: CallbackAction },
}

impl InlineButton {
    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Self {
        InlineButton::Url {
            label: label.into(),
            url: url.into(),
        }
    }

    pub fn callback(label: impl Into<String>, action: CallbackAction) -> Self {
        InlineButton::Callback {
            label: label.into(),
            action,
        }
    }
}

/// Rows of inline buttons attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    /// One button per row.
    pub fn single_column(buttons: Vec<InlineButton>) -> Self {
        Self {
            rows: buttons.into_iter().map(|b| vec![b]).collect(),
        }
    }

    pub fn buttons(&self) -> impl Iterator<Item = &InlineButton> {
        self.rows.iter().flatten()
    }
}

/// A message the bot sends back to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub text: String,
    pub keyboard: Option<InlineKeyboard>,
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: InlineKeyboard) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_ref_parse() {
        assert_eq!(
            "-1001234567890".parse::<ChatRef>().unwrap(),
            ChatRef::Id(-1001234567890)
        );
        assert_eq!(
            "@elitez_staff".parse::<ChatRef>().unwrap(),
            ChatRef::Username("@elitez_staff".to_string())
        );
        assert_eq!(
            "elitez_staff".parse::<ChatRef>().unwrap(),
            ChatRef::Username("@elitez_staff".to_string())
        );
        assert!("".parse::<ChatRef>().is_err());
        assert!("two words".parse::<ChatRef>().is_err());
    }

    #[test]
    fn test_chat_ref_serializes_untagged() {
        assert_eq!(serde_json::to_string(&ChatRef::Id(5)).unwrap(), "5");
        assert_eq!(
            serde_json::to_string(&ChatRef::Username("@x".to_string())).unwrap(),
            "\"@x\""
        );
    }

    #[test]
    fn test_single_column_keyboard() {
        let kb = InlineKeyboard::single_column(vec![
            InlineButton::url("Join", "https://example.com"),
            InlineButton::callback("I Joined", CallbackAction::JoinedCommunity),
        ]);
        assert_eq!(kb.rows.len(), 2);
        assert_eq!(kb.buttons().count(), 2);
    }
}
