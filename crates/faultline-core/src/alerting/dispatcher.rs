//! Dispatcher - best-effort delivery of a formatted alert.

use std::sync::Arc;

use faultline_shared::WebhookPayload;

use crate::ports::WebhookClient;

/// Posts alert text to a webhook, swallowing every failure.
#[derive(Clone)]
pub struct Dispatcher {
    client: Arc<dyn WebhookClient>,
}

impl Dispatcher {
    pub fn new(client: Arc<dyn WebhookClient>) -> Self {
        Self { client }
    }

    /// Send `text` to `webhook_url`.
    ///
    /// Returns `true` when the endpoint accepted the message. Failures are
    /// logged once and never surface to the caller. No retry.
    pub async fn dispatch(&self, text: &str, webhook_url: &str) -> bool {
        let payload = WebhookPayload::text(text);

        match self.client.post(webhook_url, &payload).await {
            Ok(()) => {
                tracing::debug!(chars = text.chars().count(), "Alert delivered");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, error_detail = ?e, "Failed to deliver alert to webhook");
                false
            }
        }
    }
}
