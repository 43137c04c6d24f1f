//! WaitingJoin state transitions.

use joingate_types::session::UserSession;

use super::{FunnelContext, TransitionResult, advance_past_join};
use crate::funnel::copy;
use crate::funnel::effect::Effect;
use crate::funnel::event::FunnelEvent;

/// Handle input while the user is asked to join the community.
pub fn handle(mut session: UserSession, event: FunnelEvent, ctx: &FunnelContext<'_>) -> TransitionResult {
    match event {
        FunnelEvent::JoinConfirmed if ctx.config.verifies_membership() => {
            TransitionResult::new(session, vec![Effect::CheckMembership])
        }

        // Nothing to verify against: unlock and let staff know.
        FunnelEvent::JoinConfirmed => {
            let mut effects = advance_past_join(&mut session, ctx, "✅ Access unlocked.");
            effects.push(Effect::NotifyAdmin(copy::admin_unverified_unlock(ctx.profile)));
            TransitionResult::new(session, effects)
        }

        FunnelEvent::MembershipChecked(Ok(status)) if status.is_member() => {
            let mut effects = advance_past_join(&mut session, ctx, "✅ Verified.");
            effects.push(Effect::NotifyAdmin(copy::admin_verified(
                ctx.profile,
                ctx.config.collect_email,
            )));
            TransitionResult::new(session, effects)
        }

        FunnelEvent::MembershipChecked(Ok(_)) => TransitionResult::new(
            session,
            vec![Effect::Reply(copy::join_not_confirmed(ctx.config))],
        ),

        FunnelEvent::MembershipChecked(Err(_)) => TransitionResult::new(
            session,
            vec![Effect::Reply(copy::verify_unavailable(ctx.config))],
        ),

        _ => TransitionResult::new(session, vec![Effect::Reply(copy::join_first(ctx.config))]),
    }
}
