//! Effects (side effects as data).
//!
//! Effects describe what should happen as a result of a transition. They are
//! pure data; `FunnelService` executes them. Admin notifications and lead
//! records are best-effort and never affect the user-visible path.

use joingate_types::lead::LeadRecord;
use joingate_types::reply::OutboundMessage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send a message to the user's chat.
    Reply(OutboundMessage),
    /// Send a plain-text notice to the admin chat, if one is configured.
    NotifyAdmin(String),
    /// Look up the user's membership in the verification group and feed the
    /// result back as `FunnelEvent::MembershipChecked`.
    CheckMembership,
    /// Post a lead to the lead sink, if one is configured.
    RecordLead(LeadRecord),
}

impl Effect {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Effect::Reply(_) => "reply",
            Effect::NotifyAdmin(_) => "notify_admin",
            Effect::CheckMembership => "check_membership",
            Effect::RecordLead(_) => "record_lead",
        }
    }
}
