//! WaitingEmail state transitions.

use joingate_types::session::UserSession;

use super::{FunnelContext, TransitionResult, complete};
use crate::funnel::copy;
use crate::funnel::effect::Effect;
use crate::funnel::event::FunnelEvent;
use crate::funnel::validate::is_valid_email;

/// Handle input while waiting for the user's email address.
pub fn handle(mut session: UserSession, event: FunnelEvent, ctx: &FunnelContext<'_>) -> TransitionResult {
    match event {
        FunnelEvent::Text(text) => {
            let email = text.trim();
            if !is_valid_email(email) {
                return TransitionResult::new(session, vec![Effect::Reply(copy::email_invalid())]);
            }

            session.email = Some(email.to_string());
            let mut effects = complete(&mut session, ctx, "✅ Thanks, you're in.");
            effects.push(Effect::NotifyAdmin(copy::admin_email_captured(ctx.profile, email)));
            TransitionResult::new(session, effects)
        }
        FunnelEvent::JoinConfirmed => TransitionResult::new(
            session,
            vec![Effect::Reply(copy::email_prompt("✅ You're already verified."))],
        ),
        _ => TransitionResult::no_change(session),
    }
}
