//! Webhook clients - HTTP delivery plus console and recording stand-ins.

mod console;
mod http;
mod memory;

pub use console::ConsoleWebhookClient;
pub use http::HttpWebhookClient;
pub use memory::{Delivery, RecordingWebhookClient};
