//! Pure funnel transition function.
//!
//! Takes the current session and an event, returns the new session and the
//! effects to execute. This function has NO side effects.
//!
//! Each status has its own handler module:
//! - `start`: the `/start` flow shared by several entry points
//! - `commands`: fixed-text commands and restart
//! - `new`, `waiting_join`, `waiting_email`, `done`: per-status input handling

mod commands;
mod done;
mod new;
mod start;
mod waiting_email;
mod waiting_join;

use chrono::{DateTime, Utc};

use joingate_types::config::FunnelConfig;
use joingate_types::lead::LeadRecord;
use joingate_types::profile::UserProfile;
use joingate_types::session::{FunnelStatus, UserSession};

use super::copy;
use super::effect::Effect;
use super::event::FunnelEvent;

/// Inputs to a transition besides the session and event.
#[derive(Debug, Clone, Copy)]
pub struct FunnelContext<'a> {
    pub config: &'a FunnelConfig,
    pub profile: &'a UserProfile,
    pub now: DateTime<Utc>,
}

/// Result of a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The session after the transition.
    pub session: UserSession,
    /// Effects to execute, in order.
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(session: UserSession, effects: Vec<Effect>) -> Self {
        Self { session, effects }
    }

    pub fn no_change(session: UserSession) -> Self {
        Self {
            session,
            effects: vec![],
        }
    }
}

/// Pure transition function.
pub fn transition(
    mut session: UserSession,
    event: FunnelEvent,
    ctx: &FunnelContext<'_>,
) -> TransitionResult {
    session.updated_at = ctx.now;

    match event {
        FunnelEvent::Start => start::handle(session, ctx),
        FunnelEvent::Restart => commands::restart(session, ctx),
        FunnelEvent::Help => commands::reply(session, copy::help(ctx.config)),
        FunnelEvent::Info => commands::reply(session, copy::info(ctx.config)),
        FunnelEvent::Trial => commands::reply(session, copy::trial(ctx.config)),
        FunnelEvent::UnknownCommand(_) => commands::reply(session, copy::unknown_command()),
        FunnelEvent::UnknownAction(_) => TransitionResult::no_change(session),
        event @ (FunnelEvent::JoinConfirmed
        | FunnelEvent::MembershipChecked(_)
        | FunnelEvent::Text(_)) => match session.status {
            FunnelStatus::New => new::handle(session, event, ctx),
            FunnelStatus::WaitingJoin => waiting_join::handle(session, event, ctx),
            FunnelStatus::WaitingEmail => waiting_email::handle(session, event, ctx),
            FunnelStatus::Done => done::handle(session, event, ctx),
        },
    }
}

/// Move past the join step: to `WaitingEmail` when emails are collected,
/// otherwise straight to `Done`.
///
/// Returns the effects for the user-facing step; admin notices are the
/// caller's business.
fn advance_past_join(session: &mut UserSession, ctx: &FunnelContext<'_>, headline: &str) -> Vec<Effect> {
    if ctx.config.collect_email {
        session.status = FunnelStatus::WaitingEmail;
        vec![Effect::Reply(copy::email_prompt(headline))]
    } else {
        complete(session, ctx, headline)
    }
}

/// Finish the funnel: `Done`, lead record, access links.
fn complete(session: &mut UserSession, ctx: &FunnelContext<'_>, headline: &str) -> Vec<Effect> {
    session.status = FunnelStatus::Done;
    vec![
        Effect::RecordLead(LeadRecord::from_profile(ctx.profile, session.email.clone())),
        Effect::Reply(copy::access(ctx.config, ctx.profile, headline)),
    ]
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_first_contact_by_start_waits_for_join() {
        let result = run(session_in(FunnelStatus::New), FunnelEvent::Start, &gated_config());
        assert_eq!(result.session.status, FunnelStatus::WaitingJoin);
        assert!(replies(&result)[0].text.starts_with("Welcome to"));
    }

    #[test]
    fn test_first_contact_by_text_waits_for_join() {
        let result = run(
            session_in(FunnelStatus::New),
            FunnelEvent::Text("hi".to_string()),
            &gated_config(),
        );
        assert_eq!(result.session.status, FunnelStatus::WaitingJoin);
        assert!(replies(&result)[0].text.starts_with("Welcome to"));
    }

    #[test]
    fn test_full_gated_flow_with_email() {
        let config = gated_config();
        let r1 = run(session_in(FunnelStatus::New), FunnelEvent::Start, &config);
        let r2 = run(r1.session, FunnelEvent::JoinConfirmed, &config);
        assert_eq!(r2.effects, vec![Effect::CheckMembership]);

        let r3 = run(
            r2.session,
            FunnelEvent::MembershipChecked(Ok(joingate_types::membership::MemberStatus::Member)),
            &config,
        );
        assert_eq!(r3.session.status, FunnelStatus::WaitingEmail);

        let r4 = run(r3.session, FunnelEvent::Text("luna@example.com".to_string()), &config);
        assert_eq!(r4.session.status, FunnelStatus::Done);
        assert_eq!(r4.session.email.as_deref(), Some("luna@example.com"));
        assert_eq!(leads(&r4).len(), 1);
    }

    #[test]
    fn test_ungated_flow_without_email_finishes_on_start() {
        let config = FunnelConfig {
            collect_email: false,
            ..FunnelConfig::default()
        };
        let result = run(session_in(FunnelStatus::New), FunnelEvent::Start, &config);
        assert_eq!(result.session.status, FunnelStatus::Done);
        assert!(replies(&result)[0].text.starts_with("Welcome to"));
        assert_eq!(leads(&result).len(), 1);
        assert!(leads(&result)[0].email.is_none());
    }

    #[test]
    fn test_unknown_action_is_a_no_op() {
        let session = session_in(FunnelStatus::WaitingJoin);
        let result = run(
            session.clone(),
            FunnelEvent::UnknownAction("claim_bonus".to_string()),
            &gated_config(),
        );
        assert_eq!(result.session.status, session.status);
        assert!(result.effects.is_empty());
    }

    #[test]
    fn test_transition_stamps_updated_at() {
        let mut session = session_in(FunnelStatus::Done);
        session.updated_at = chrono::DateTime::<Utc>::MIN_UTC;
        let result = run(session, FunnelEvent::Help, &gated_config());
        assert!(result.session.updated_at > chrono::DateTime::<Utc>::MIN_UTC);
    }
}
