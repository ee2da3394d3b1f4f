//! Recording webhook client - keeps every delivery in memory.

use std::sync::Mutex;

use async_trait::async_trait;

use faultline_core::WebhookError;
use faultline_core::ports::WebhookClient;
use faultline_shared::WebhookPayload;

/// One recorded webhook call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub url: String,
    pub payload: WebhookPayload,
}

/// Webhook client that records deliveries instead of sending them.
///
/// Note: Deliveries accumulate until [`RecordingWebhookClient::take`] is called.
#[derive(Default)]
pub struct RecordingWebhookClient {
    deliveries: Mutex<Vec<Delivery>>,
}

impl RecordingWebhookClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    /// Drain recorded deliveries.
    pub fn take(&self) -> Vec<Delivery> {
        self.deliveries
            .lock()
            .map(|mut d| std::mem::take(&mut *d))
            .unwrap_or_default()
    }
}

#[async_trait]
impl WebhookClient for RecordingWebhookClient {
    async fn post(&self, url: &str, payload: &WebhookPayload) -> Result<(), WebhookError> {
        let mut deliveries = self
            .deliveries
            .lock()
            .map_err(|e| WebhookError::Transport(e.to_string()))?;

        deliveries.push(Delivery {
            url: url.to_string(),
            payload: payload.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_and_drains() {
        let client = RecordingWebhookClient::new();
        client
            .post("https://hooks.example/abc", &WebhookPayload::text("boom"))
            .await
            .unwrap();

        assert_eq!(client.deliveries().len(), 1);
        assert_eq!(client.take()[0].payload.text, "boom");
        assert!(client.deliveries().is_empty());
    }
}
