//! Observability module - unhandled error alerting.

mod exception_alert;

pub use exception_alert::{ExceptionAlertMiddleware, FRAMEWORK_ERROR, Reportable};
