use regex::{Regex, RegexBuilder};

/// Hard size limit of a chat message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 3000;

/// One snapshot of the alerting settings.
///
/// Built fresh for every evaluation and used for the whole decision, so a
/// single decision never mixes values from two configuration states.
#[derive(Debug, Clone, Default)]
pub struct AlertConfiguration {
    pub enabled: bool,
    pub webhook_url: String,
    pub mention_handles: Vec<String>,
    pub ignore_bots: bool,
    /// Case-insensitive user agent patterns.
    pub bot_user_agent_patterns: Vec<Regex>,
    /// Whether errors carrying a sub-500 status may alert at all.
    pub client_error_alerting_enabled: bool,
    pub ignored_exception_types: Vec<String>,
    /// Types suppressed only when the request had no referer.
    pub refererless_ignored_exception_types: Vec<String>,
    /// Case-insensitive referer patterns.
    pub ignored_referer_patterns: Vec<Regex>,
    pub suppress_outside_production: bool,
    pub include_stack_trace: bool,
    /// Deployment environment name, e.g. `production`.
    pub environment: Option<String>,
    /// Prefix stripped from file paths in the trace block.
    pub application_root: Option<String>,
}

impl AlertConfiguration {
    /// `prod` and `production` count as production, in any case.
    pub fn is_production(&self) -> bool {
        self.environment
            .as_deref()
            .map(str::trim)
            .is_some_and(|env| env.eq_ignore_ascii_case("production") || env.eq_ignore_ascii_case("prod"))
    }

    /// Alerting is switched on and has somewhere to go.
    pub fn is_deliverable(&self) -> bool {
        self.enabled && !self.webhook_url.trim().is_empty()
    }
}

/// Split a newline- or semicolon-delimited setting into trimmed, non-empty
/// entries.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(['\n', ';'])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(String::from)
        .collect()
}

/// Compile case-insensitive patterns, skipping (and logging) invalid ones.
pub fn compile_patterns(setting: &str, entries: &[String]) -> Vec<Regex> {
    entries
        .iter()
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            match RegexBuilder::new(entry).case_insensitive(true).build() {
                Ok(regex) => Some(regex),
                Err(e) => {
                    tracing::warn!(
                        setting = %setting,
                        pattern = %entry,
                        error = %e,
                        "Skipping invalid suppression pattern"
                    );
                    None
                }
            }
        })
        .collect()
}
