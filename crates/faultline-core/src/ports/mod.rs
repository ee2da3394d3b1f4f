//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod config_store;
mod webhook;

pub use config_store::{ConfigStore, parse_bool};
pub use webhook::{CONNECT_TIMEOUT, REQUEST_TIMEOUT, WebhookClient};
