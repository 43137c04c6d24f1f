//! New state transitions.

use joingate_types::session::UserSession;

use super::{FunnelContext, TransitionResult, start};
use crate::funnel::event::FunnelEvent;

/// Any input from a user we have not welcomed yet runs the start flow,
/// except stale membership results, which are dropped.
pub fn handle(session: UserSession, event: FunnelEvent, ctx: &FunnelContext<'_>) -> TransitionResult {
    match event {
        FunnelEvent::MembershipChecked(_) => TransitionResult::no_change(session),
        _ => start::handle(session, ctx),
    }
}
