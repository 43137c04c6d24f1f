//! Events that drive funnel transitions.

use joingate_types::event::{CallbackAction, InboundEvent};
use joingate_types::membership::MemberStatus;

/// All events the funnel reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunnelEvent {
    /// `/start`.
    Start,
    /// `/help`.
    Help,
    /// `/info`.
    Info,
    /// `/trial`.
    Trial,
    /// "Start" button: reset to `New` and run the start flow again.
    Restart,
    /// "I Joined" button.
    JoinConfirmed,
    /// Result of a membership lookup requested by `Effect::CheckMembership`.
    /// `Err` carries the failure description.
    MembershipChecked(Result<MemberStatus, String>),
    /// Free text that is not a command.
    Text(String),
    /// A command the bot does not know.
    UnknownCommand(String),
    /// Callback data the bot does not know (stale or forged buttons).
    UnknownAction(String),
}

impl From<&InboundEvent> for FunnelEvent {
    fn from(event: &InboundEvent) -> Self {
        match event {
            InboundEvent::Command(cmd) => match cmd.name.as_str() {
                "start" => FunnelEvent::Start,
                "help" => FunnelEvent::Help,
                "info" => FunnelEvent::Info,
                "trial" => FunnelEvent::Trial,
                other => FunnelEvent::UnknownCommand(other.to_string()),
            },
            InboundEvent::Text { text } => FunnelEvent::Text(text.clone()),
            InboundEvent::Callback { data, .. } => match data.parse::<CallbackAction>() {
                Ok(CallbackAction::JoinedCommunity) => FunnelEvent::JoinConfirmed,
                Ok(CallbackAction::RestartFlow) => FunnelEvent::Restart,
                Err(_) => FunnelEvent::UnknownAction(data.clone()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use joingate_types::event::BotCommand;

    fn command(name: &str) -> InboundEvent {
        InboundEvent::Command(BotCommand {
            name: name.to_string(),
            args: String::new(),
        })
    }

    #[test]
    fn test_commands_map_to_events() {
        assert_eq!(FunnelEvent::from(&command("start")), FunnelEvent::Start);
        assert_eq!(FunnelEvent::from(&command("help")), FunnelEvent::Help);
        assert_eq!(FunnelEvent::from(&command("info")), FunnelEvent::Info);
        assert_eq!(FunnelEvent::from(&command("trial")), FunnelEvent::Trial);
        assert_eq!(
            FunnelEvent::from(&command("settings")),
            FunnelEvent::UnknownCommand("settings".to_string())
        );
    }

    #[test]
    fn test_callbacks_map_to_events() {
        let joined = InboundEvent::Callback {
            query_id: "q1".to_string(),
            data: "joined_community".to_string(),
        };
        let restart = InboundEvent::Callback {
            query_id: "q2".to_string(),
            data: "restart_flow".to_string(),
        };
        let stale = InboundEvent::Callback {
            query_id: "q3".to_string(),
            data: "claim_bonus".to_string(),
        };
        assert_eq!(FunnelEvent::from(&joined), FunnelEvent::JoinConfirmed);
        assert_eq!(FunnelEvent::from(&restart), FunnelEvent::Restart);
        assert_eq!(
            FunnelEvent::from(&stale),
            FunnelEvent::UnknownAction("claim_bonus".to_string())
        );
    }
}
