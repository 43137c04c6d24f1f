use thiserror::Error;

/// Errors from session store operations (used by trait definitions in joingate-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}

/// Errors from the messaging platform.
#[derive(Debug, Error)]
pub enum MessengerError {
    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("platform rejected request ({code}): {description}")]
    Api { code: i64, description: String },

    #[error("bot token rejected")]
    Unauthorized,

    #[error("failed to parse platform response: {0}")]
    Deserialization(String),
}

/// Errors from posting a lead to the external sink.
#[derive(Debug, Error)]
pub enum LeadSinkError {
    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("lead webhook returned HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Errors while assembling runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BOT_TOKEN missing")]
    MissingToken,

    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors surfaced by the funnel service.
///
/// Only storage failures abort handling. Platform and lead failures are
/// logged and swallowed inside the service.
#[derive(Debug, Error)]
pub enum FunnelError {
    #[error("session storage error: {0}")]
    Storage(#[from] RepositoryError),
}
