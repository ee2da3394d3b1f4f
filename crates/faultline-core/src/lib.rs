//! # Faultline Core
//!
//! The alerting engine for unhandled request errors.
//! Pure decision and formatting logic plus the ports it talks through;
//! this crate has zero infrastructure dependencies.

pub mod alerting;
pub mod domain;
pub mod error;
pub mod ports;

pub use alerting::{AlertOutcome, ExceptionAlerter};
pub use error::{ConfigStoreError, WebhookError};
