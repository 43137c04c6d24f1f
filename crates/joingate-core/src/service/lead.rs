//! Lead sink trait.

use joingate_types::error::LeadSinkError;
use joingate_types::lead::LeadRecord;

/// Destination for captured leads (sheet webhook, CRM, ...).
///
/// Recording is best-effort: the funnel logs failures and carries on.
pub trait LeadSink: Send + Sync {
    fn record_lead(
        &self,
        lead: &LeadRecord,
    ) -> impl std::future::Future<Output = Result<(), LeadSinkError>> + Send;
}
