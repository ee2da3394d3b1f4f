//! Data Transfer Objects - payloads sent to external services.

use serde::{Deserialize, Serialize};

/// Body of a Slack-compatible incoming webhook call.
///
/// Link and media unfurling are always disabled so that request URIs quoted
/// in the alert text do not expand into previews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub text: String,
    pub unfurl_links: bool,
    pub unfurl_media: bool,
}

impl WebhookPayload {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            unfurl_links: false,
            unfurl_media: false,
        }
    }
}
