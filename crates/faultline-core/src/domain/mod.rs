//! Domain types - the values the alerting engine reasons about.

mod config;
mod exception;
mod taxonomy;

pub use config::{AlertConfiguration, MAX_MESSAGE_CHARS, compile_patterns, split_list};
pub use exception::{ExceptionContext, SourceLocation, StackFrame};
pub use taxonomy::TypeHierarchy;
