//! Lead sinks.

pub mod webhook;

pub use webhook::WebhookLeadSink;
