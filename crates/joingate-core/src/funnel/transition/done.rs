//! Done state transitions.

use joingate_types::session::UserSession;

use super::{FunnelContext, TransitionResult};
use crate::funnel::copy;
use crate::funnel::effect::Effect;
use crate::funnel::event::FunnelEvent;

/// Done is a resting state: every input gets the same access links.
pub fn handle(session: UserSession, event: FunnelEvent, ctx: &FunnelContext<'_>) -> TransitionResult {
    match event {
        FunnelEvent::Text(text) => {
            let mut effects = vec![Effect::Reply(copy::access(
                ctx.config,
                ctx.profile,
                "✅ You're all set.",
            ))];
            if ctx.config.forward_done_messages {
                effects.push(Effect::NotifyAdmin(copy::admin_forward(ctx.profile, &text)));
            }
            TransitionResult::new(session, effects)
        }
        FunnelEvent::JoinConfirmed => TransitionResult::new(
            session,
            vec![Effect::Reply(copy::access(
                ctx.config,
                ctx.profile,
                "✅ You're already verified.",
            ))],
        ),
        _ => TransitionResult::no_change(session),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::funnel::event::FunnelEvent;
    use joingate_types::config::FunnelConfig;
    use joingate_types::session::FunnelStatus;

    #[test]
    fn test_done_is_idempotent_for_text() {
        let config = gated_config();
        let mut session = session_in(FunnelStatus::Done);
        let mut seen = Vec::new();
        for input in ["hello", "a@b.co", "/nope", "??"] {
            let result = run(session, FunnelEvent::Text(input.to_string()), &config);
            assert_eq!(result.session.status, FunnelStatus::Done);
            assert!(leads(&result).is_empty());
            seen.push(replies(&result)[0].clone());
            session = result.session;
        }
        assert!(seen.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_forwarding_to_admin_is_optional() {
        let quiet = run(
            session_in(FunnelStatus::Done),
            FunnelEvent::Text("question".to_string()),
            &gated_config(),
        );
        assert!(admin_notices(&quiet).is_empty());

        let config = FunnelConfig {
            forward_done_messages: true,
            ..gated_config()
        };
        let forwarded = run(
            session_in(FunnelStatus::Done),
            FunnelEvent::Text("question".to_string()),
            &config,
        );
        let notices = admin_notices(&forwarded);
        assert_eq!(notices.len(), 1);
        assert!(notices[0].ends_with("question"));
    }
}
