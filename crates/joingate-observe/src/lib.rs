//! Observability setup for joingate: tracing subscriber and optional
//! OpenTelemetry span export.

pub mod tracing_setup;
