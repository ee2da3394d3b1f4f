use std::time::Duration;

use async_trait::async_trait;
use faultline_shared::WebhookPayload;

use crate::error::WebhookError;

/// Upper bound for establishing the connection to the webhook endpoint.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Upper bound for the whole webhook call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Webhook client - posts a JSON payload to a URL.
///
/// Implementations send `Content-Type: application/json`, honour
/// [`CONNECT_TIMEOUT`] and [`REQUEST_TIMEOUT`], and report any non-2xx
/// response as [`WebhookError::Status`]. They never retry.
#[async_trait]
pub trait WebhookClient: Send + Sync {
    async fn post(&self, url: &str, payload: &WebhookPayload) -> Result<(), WebhookError>;
}
