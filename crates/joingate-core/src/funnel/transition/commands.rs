//! Fixed-text commands and the restart action.

use joingate_types::reply::OutboundMessage;
use joingate_types::session::UserSession;

use super::{FunnelContext, TransitionResult, start};
use crate::funnel::copy;
use crate::funnel::effect::Effect;

/// Reply with fixed text; the session is untouched.
pub fn reply(session: UserSession, message: OutboundMessage) -> TransitionResult {
    TransitionResult::new(session, vec![Effect::Reply(message)])
}

/// Reset to `New` and re-dispatch the start flow.
pub fn restart(mut session: UserSession, ctx: &FunnelContext<'_>) -> TransitionResult {
    session.reset();
    let mut effects = vec![Effect::Reply(copy::restarted())];
    let started = start::handle(session, ctx);
    effects.extend(started.effects);
    TransitionResult::new(started.session, effects)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::funnel::event::FunnelEvent;
    use joingate_types::session::FunnelStatus;

    #[test]
    fn test_restart_resets_from_any_status() {
        for status in [
            FunnelStatus::New,
            FunnelStatus::WaitingJoin,
            FunnelStatus::WaitingEmail,
            FunnelStatus::Done,
        ] {
            let mut session = session_in(status);
            session.email = Some("old@example.com".to_string());
            let result = run(session, FunnelEvent::Restart, &gated_config());

            assert_eq!(result.session.status, FunnelStatus::WaitingJoin);
            assert!(result.session.email.is_none());
            let replies = replies(&result);
            assert_eq!(replies[0].text, "🔄 Restarted.");
            assert!(replies[1].text.starts_with("Welcome to"));
        }
    }

    #[test]
    fn test_help_info_trial_do_not_change_status() {
        for event in [FunnelEvent::Help, FunnelEvent::Info, FunnelEvent::Trial] {
            let result = run(session_in(FunnelStatus::WaitingJoin), event, &gated_config());
            assert_eq!(result.session.status, FunnelStatus::WaitingJoin);
            assert_eq!(replies(&result).len(), 1);
            assert!(admin_notices(&result).is_empty());
        }
    }

    #[test]
    fn test_help_offers_start_button() {
        let result = run(session_in(FunnelStatus::New), FunnelEvent::Help, &gated_config());
        let keyboard = replies(&result)[0].keyboard.as_ref().unwrap();
        assert_eq!(keyboard.buttons().count(), 1);
    }

    #[test]
    fn test_unknown_command_hints_start() {
        let result = run(
            session_in(FunnelStatus::Done),
            FunnelEvent::UnknownCommand("settings".to_string()),
            &gated_config(),
        );
        assert!(replies(&result)[0].text.contains("/start"));
        assert_eq!(result.session.status, FunnelStatus::Done);
    }
}
