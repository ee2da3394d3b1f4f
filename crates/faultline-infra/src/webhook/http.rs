//! HTTP webhook client - posts alerts to Slack-compatible incoming webhooks.

use std::time::Duration;

use async_trait::async_trait;

use faultline_core::WebhookError;
use faultline_core::ports::{CONNECT_TIMEOUT, REQUEST_TIMEOUT, WebhookClient};
use faultline_shared::WebhookPayload;

/// Webhook client backed by `reqwest`.
///
/// One instance is meant to be shared; the underlying connection pool is
/// reused across alerts.
#[derive(Clone)]
pub struct HttpWebhookClient {
    client: reqwest::Client,
    request_timeout: Duration,
}

impl HttpWebhookClient {
    /// Client with the standard 15 s connect and total timeouts.
    pub fn new() -> Result<Self, WebhookError> {
        Self::with_timeouts(CONNECT_TIMEOUT, REQUEST_TIMEOUT)
    }

    pub fn with_timeouts(
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, WebhookError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|e| WebhookError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            request_timeout,
        })
    }
}

#[async_trait]
impl WebhookClient for HttpWebhookClient {
    async fn post(&self, url: &str, payload: &WebhookPayload) -> Result<(), WebhookError> {
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    WebhookError::Timeout(self.request_timeout)
                } else {
                    WebhookError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WebhookError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(status = status.as_u16(), "Webhook accepted alert");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faultline_core::alerting::Dispatcher;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Collects formatted log output for assertions.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn test_posts_json_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/services/T000/B000"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({
                "text": " <ops> GET request to /checkout",
                "unfurl_links": false,
                "unfurl_media": false,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpWebhookClient::new().unwrap();
        let url = format!("{}/services/T000/B000", server.uri());

        client
            .post(&url, &WebhookPayload::text(" <ops> GET request to /checkout"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no_service"))
            .mount(&server)
            .await;

        let client = HttpWebhookClient::new().unwrap();
        let err = client
            .post(&server.uri(), &WebhookPayload::text("boom"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WebhookError::Status { status: 404, ref body } if body == "no_service"
        ));
    }

    #[tokio::test]
    async fn test_slow_endpoint_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let client =
            HttpWebhookClient::with_timeouts(Duration::from_secs(1), Duration::from_millis(100))
                .unwrap();
        let err = client
            .post(&server.uri(), &WebhookPayload::text("boom"))
            .await
            .unwrap_err();

        assert!(matches!(err, WebhookError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_refused_connection_logs_once_and_returns() {
        // Bind then drop a listener to get a port nobody is listening on.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let url = format!("http://127.0.0.1:{port}/hook");

        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(tracing::Level::ERROR)
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let dispatcher = Dispatcher::new(Arc::new(HttpWebhookClient::new().unwrap()));
        let delivered = dispatcher.dispatch("boom", &url).await;

        assert!(!delivered);
        let output = logs.contents();
        assert_eq!(output.matches("Failed to deliver alert to webhook").count(), 1);
        assert!(output.contains("Webhook request failed"));
    }
}
