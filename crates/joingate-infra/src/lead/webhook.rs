//! WebhookLeadSink -- posts each lead as JSON to an HTTP endpoint.
//!
//! Typically a spreadsheet script or CRM intake URL. Any 2xx response counts
//! as accepted.

use std::time::Duration;

use joingate_core::service::LeadSink;
use joingate_types::error::LeadSinkError;
use joingate_types::lead::LeadRecord;

const LEAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest response body kept in a [`LeadSinkError::Rejected`].
const MAX_ERROR_BODY: usize = 512;

pub struct WebhookLeadSink {
    client: reqwest::Client,
    url: String,
}

impl WebhookLeadSink {
    pub fn new(url: impl Into<String>) -> Result<Self, LeadSinkError> {
        let client = reqwest::Client::builder()
            .timeout(LEAD_TIMEOUT)
            .build()
            .map_err(|e| LeadSinkError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl LeadSink for WebhookLeadSink {
    async fn record_lead(&self, lead: &LeadRecord) -> Result<(), LeadSinkError> {
        let response = self
            .client
            .post(&self.url)
            .json(lead)
            .send()
            .await
            .map_err(|e| LeadSinkError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(user_id = %lead.user_id, "lead accepted");
            return Ok(());
        }

        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let cut = (0..=MAX_ERROR_BODY)
                .rev()
                .find(|i| body.is_char_boundary(*i))
                .unwrap_or(0);
            body.truncate(cut);
        }
        Err(LeadSinkError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
