//! # Faultline Shared
//!
//! Wire types shared between the alerting core, its infrastructure adapters
//! and the HTTP server.

pub mod dto;
pub mod response;

pub use dto::WebhookPayload;
pub use response::ErrorResponse;
