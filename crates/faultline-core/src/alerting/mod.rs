//! Alerting pipeline: filter → formatter → dispatcher.

mod alerter;
mod dispatcher;
pub mod filter;
pub mod formatter;
mod settings;

pub use alerter::{AlertOutcome, DEFAULT_ENVIRONMENT_VAR, ExceptionAlerter};
pub use dispatcher::Dispatcher;
pub use filter::{FilterDecision, SuppressionReason, evaluate, should_alert};
pub use formatter::format;
pub use settings::{SettingKeys, load_configuration};
