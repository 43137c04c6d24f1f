//! Raw Telegram updates to [`InboundUpdate`].
//!
//! Only private-chat traffic from human users reaches the funnel. Group
//! messages, bot senders, edits, and non-text messages map to `None`.

use joingate_types::event::{BotCommand, InboundEvent, InboundUpdate};
use joingate_types::profile::UserProfile;
use joingate_types::session::UserId;

use super::types::{Message, Update, User};

/// Normalize a raw update. Returns `None` for anything the funnel ignores.
pub fn to_inbound(update: Update) -> Option<InboundUpdate> {
    let update_id = update.update_id;

    if let Some(query) = update.callback_query {
        if query.from.is_bot {
            return None;
        }
        let chat_id = match &query.message {
            Some(message) if !message.chat.is_private() => return None,
            Some(message) => message.chat.id,
            None => query.from.id,
        };
        return Some(InboundUpdate {
            update_id,
            chat_id,
            sender: profile(&query.from),
            event: InboundEvent::Callback {
                query_id: query.id,
                data: query.data.unwrap_or_default(),
            },
        });
    }

    let message = update.message?;
    if !message.chat.is_private() {
        return None;
    }
    let from = message.from.as_ref().filter(|u| !u.is_bot)?;
    let event = message_event(&message)?;

    Some(InboundUpdate {
        update_id,
        chat_id: message.chat.id,
        sender: profile(from),
        event,
    })
}

fn message_event(message: &Message) -> Option<InboundEvent> {
    let text = message.text.as_deref()?;
    let mut commands = message.entities.iter().filter(|e| e.is_bot_command());
    match commands.next() {
        Some(entity) if entity.offset == 0 => {
            return BotCommand::parse(text).map(InboundEvent::Command);
        }
        // Commands mid-message are neither commands nor funnel text.
        Some(_) => return None,
        None => {}
    }
    Some(InboundEvent::Text {
        text: text.to_string(),
    })
}

fn profile(user: &User) -> UserProfile {
    UserProfile {
        id: UserId(user.id),
        username: user.username.clone(),
        first_name: Some(user.first_name.clone()).filter(|s| !s.is_empty()),
        last_name: user.last_name.clone(),
    }
}
