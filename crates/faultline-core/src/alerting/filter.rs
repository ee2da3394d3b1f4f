//! Alert filter - decides whether an unhandled error is worth a message.
//!
//! The gates run in a fixed order. The global and severity gates end the
//! evaluation as soon as they suppress; rule-based suppression and the bot
//! gate are both evaluated so that every applicable reason is reported.

use std::fmt;

use regex::Regex;

use crate::domain::{AlertConfiguration, ExceptionContext};

/// Why an error was not alerted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressionReason {
    /// Alerting is switched off or has no webhook URL.
    Disabled,
    /// Non-production suppression is on and this is not production.
    NonProduction,
    /// Sub-500 status while client error alerting is off.
    ClientError,
    /// Type (or an ancestor) is on the ignore list.
    IgnoredType,
    /// Type is ignored for requests without a referer, and there was none.
    RefererlessIgnoredType,
    /// Referer matches an ignored referer pattern.
    IgnoredReferer,
    /// User agent matches a bot pattern.
    Bot,
}

impl fmt::Display for SuppressionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SuppressionReason::Disabled => "disabled",
            SuppressionReason::NonProduction => "non_production",
            SuppressionReason::ClientError => "client_error",
            SuppressionReason::IgnoredType => "ignored_type",
            SuppressionReason::RefererlessIgnoredType => "refererless_ignored_type",
            SuppressionReason::IgnoredReferer => "ignored_referer",
            SuppressionReason::Bot => "bot",
        };
        f.write_str(name)
    }
}

/// Outcome of the filter: alert when no suppression reason applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterDecision {
    pub reasons: Vec<SuppressionReason>,
}

impl FilterDecision {
    pub fn should_alert(&self) -> bool {
        self.reasons.is_empty()
    }

    fn suppressed(reason: SuppressionReason) -> Self {
        Self {
            reasons: vec![reason],
        }
    }
}

/// `true` when the error should be sent to the webhook.
pub fn should_alert(ctx: &ExceptionContext, cfg: &AlertConfiguration) -> bool {
    evaluate(ctx, cfg).should_alert()
}

/// Run every gate and collect the reasons that suppress the alert.
pub fn evaluate(ctx: &ExceptionContext, cfg: &AlertConfiguration) -> FilterDecision {
    // Global gate
    if !cfg.is_deliverable() {
        return FilterDecision::suppressed(SuppressionReason::Disabled);
    }
    if cfg.suppress_outside_production && !cfg.is_production() {
        return FilterDecision::suppressed(SuppressionReason::NonProduction);
    }

    // Severity gate
    let is_client_error = ctx.status_code.is_some_and(|status| status < 500);
    if is_client_error && !cfg.client_error_alerting_enabled {
        return FilterDecision::suppressed(SuppressionReason::ClientError);
    }

    let mut reasons = Vec::new();

    // Rule-based suppression
    if matches_any_type(ctx, &cfg.ignored_exception_types) {
        reasons.push(SuppressionReason::IgnoredType);
    }
    match ctx.referer() {
        None => {
            if matches_any_type(ctx, &cfg.refererless_ignored_exception_types) {
                reasons.push(SuppressionReason::RefererlessIgnoredType);
            }
        }
        Some(referer) => {
            if matches_any_pattern(referer, &cfg.ignored_referer_patterns) {
                reasons.push(SuppressionReason::IgnoredReferer);
            }
        }
    }

    // Bot gate
    if cfg.ignore_bots {
        if let Some(user_agent) = ctx.user_agent() {
            if matches_any_pattern(user_agent, &cfg.bot_user_agent_patterns) {
                reasons.push(SuppressionReason::Bot);
            }
        }
    }

    FilterDecision { reasons }
}

fn matches_any_type(ctx: &ExceptionContext, type_names: &[String]) -> bool {
    type_names.iter().any(|name| ctx.is_a(name.trim()))
}

fn matches_any_pattern(value: &str, patterns: &[Regex]) -> bool {
    patterns
        .iter()
        .filter(|pattern| !pattern.as_str().is_empty())
        .any(|pattern| pattern.is_match(value))
}
