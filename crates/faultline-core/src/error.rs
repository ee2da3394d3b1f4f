//! Port-level error types.

use thiserror::Error;

/// Configuration store failures.
#[derive(Debug, Error)]
pub enum ConfigStoreError {
    #[error("Configuration store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Webhook delivery failures.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Webhook request failed: {0}")]
    Transport(String),

    #[error("Webhook request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Webhook returned {status}: {body}")]
    Status { status: u16, body: String },
}
