//! # Faultline Infrastructure
//!
//! Concrete implementations of the ports defined in `faultline-core`:
//! configuration stores and webhook clients.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external configuration backends, in-memory and env only
//! - `redis` - Redis-backed configuration store

pub mod config_store;
pub mod webhook;

// Re-exports - In-Memory / process
pub use config_store::{EnvConfigStore, InMemoryConfigStore};
pub use webhook::{ConsoleWebhookClient, HttpWebhookClient, RecordingWebhookClient};

// Re-exports - Redis
#[cfg(feature = "redis")]
pub use config_store::{RedisConfig, RedisConfigStore};
