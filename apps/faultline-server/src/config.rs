//! Application configuration loaded from environment variables.

use std::env;

use faultline_core::alerting::DEFAULT_ENVIRONMENT_VAR;

/// Where alert settings are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigStoreKind {
    Env,
    Redis,
}

impl ConfigStoreKind {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "redis" => ConfigStoreKind::Redis,
            "env" | "" => ConfigStoreKind::Env,
            other => {
                tracing::warn!(value = %other, "Unknown CONFIG_STORE, using env");
                ConfigStoreKind::Env
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigStoreKind::Env => "env",
            ConfigStoreKind::Redis => "redis",
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Settings are read under `<namespace>.config.*`.
    pub alert_namespace: String,
    /// Process variable naming the deployment environment.
    pub environment_var: String,
    pub config_store: ConfigStoreKind,
    /// Log alerts instead of posting them.
    pub dry_run: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            alert_namespace: env::var("ALERT_NAMESPACE")
                .ok()
                .filter(|ns| !ns.trim().is_empty())
                .unwrap_or_else(|| "Error".to_string()),
            environment_var: env::var("ALERT_ENV_VAR")
                .ok()
                .filter(|var| !var.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ENVIRONMENT_VAR.to_string()),
            config_store: ConfigStoreKind::parse(
                &env::var("CONFIG_STORE").unwrap_or_default(),
            ),
            dry_run: env::var("ALERT_DRY_RUN")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }
}
