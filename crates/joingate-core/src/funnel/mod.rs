//! Funnel state machine.
//!
//! The design separates:
//! - **State**: the user's `UserSession`
//! - **Events**: what the user did (`FunnelEvent`)
//! - **Effects**: what to do about it (`Effect`)
//! - **Transition**: pure function `(UserSession, FunnelEvent) -> (UserSession, Vec<Effect>)`
//!
//! `FunnelService` executes the effects against the real platform and feeds
//! result events (membership lookups) back into the transition.

pub mod copy;
pub mod effect;
pub mod event;
pub mod transition;
pub mod validate;

pub use effect::Effect;
pub use event::FunnelEvent;
pub use transition::{FunnelContext, TransitionResult, transition};
