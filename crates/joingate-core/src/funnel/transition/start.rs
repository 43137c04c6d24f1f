//! The `/start` flow.

use joingate_types::session::{FunnelStatus, UserSession};

use super::{FunnelContext, TransitionResult, advance_past_join};
use crate::funnel::copy;
use crate::funnel::effect::Effect;

/// Handle `/start` (and everything that re-dispatches to it).
///
/// Counts the start, notifies the admin chat, and shows the step the user is
/// on. Never moves the session backward.
pub fn handle(mut session: UserSession, ctx: &FunnelContext<'_>) -> TransitionResult {
    session.start_count += 1;
    let mut effects = Vec::new();

    match session.status {
        FunnelStatus::New | FunnelStatus::WaitingJoin => {
            if ctx.config.verifies_membership() {
                session.status = FunnelStatus::WaitingJoin;
                effects.push(Effect::Reply(copy::welcome_join_gate(ctx.config)));
            } else {
                effects.push(Effect::Reply(copy::welcome_open(ctx.config)));
                effects.extend(advance_past_join(&mut session, ctx, "✅ Access unlocked."));
                effects.push(Effect::NotifyAdmin(copy::admin_unverified_unlock(ctx.profile)));
            }
        }
        FunnelStatus::WaitingEmail => {
            effects.push(Effect::Reply(copy::email_prompt("✅ You're already verified.")));
        }
        FunnelStatus::Done => {
            effects.push(Effect::Reply(copy::access(
                ctx.config,
                ctx.profile,
                "✅ You're already verified.",
            )));
        }
    }

    if session.start_count == 1 || ctx.config.notify_repeat_starts {
        effects.push(Effect::NotifyAdmin(copy::admin_start(
            ctx.profile,
            session.start_count,
            ctx.now,
        )));
    }

    TransitionResult::new(session, effects)
}
