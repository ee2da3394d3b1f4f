//! Console webhook client - logs alerts instead of sending them
//! (for development and dry runs).

use async_trait::async_trait;

use faultline_core::WebhookError;
use faultline_core::ports::WebhookClient;
use faultline_shared::WebhookPayload;

pub struct ConsoleWebhookClient;

#[async_trait]
impl WebhookClient for ConsoleWebhookClient {
    async fn post(&self, url: &str, payload: &WebhookPayload) -> Result<(), WebhookError> {
        tracing::info!(url = %url, "Alert (dry run)\n{}", payload.text);
        Ok(())
    }
}
