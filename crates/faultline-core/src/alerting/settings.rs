//! Reads an [`AlertConfiguration`] snapshot from a [`ConfigStore`].

use crate::domain::{AlertConfiguration, compile_patterns, split_list};
use crate::error::ConfigStoreError;
use crate::ports::ConfigStore;

/// Namespaced setting keys, e.g. `Error.config.webhookurl`.
#[derive(Debug, Clone)]
pub struct SettingKeys {
    prefix: String,
}

impl SettingKeys {
    pub const ENABLED: &'static str = "enabled";
    pub const WEBHOOK_URL: &'static str = "webhookurl";
    pub const MENTIONS: &'static str = "mentions";
    pub const IGNORE_BOTS: &'static str = "ignorebots";
    pub const IGNORED_BOTS: &'static str = "ignoredbots";
    pub const ERRORS_ENABLED: &'static str = "errorsenabled";
    pub const IGNORED_ERRORS: &'static str = "ignorederrors";
    pub const IGNORED_REFERER_ERRORS: &'static str = "ignoredreferererrors";
    pub const IGNORED_REFERERS: &'static str = "ignoredreferers";
    pub const SEND_TRACE: &'static str = "sendtrace";
    pub const IGNORE_DEV: &'static str = "ignoredev";
    pub const APP_ROOT: &'static str = "approot";

    pub fn new(namespace: &str) -> Self {
        Self {
            prefix: format!("{namespace}.config."),
        }
    }

    pub fn key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }
}

impl Default for SettingKeys {
    fn default() -> Self {
        Self::new("Error")
    }
}

/// Load one configuration snapshot.
///
/// A store failure degrades to a disabled configuration; alerting problems
/// must never reach the request path.
pub async fn load_configuration(
    store: &dyn ConfigStore,
    keys: &SettingKeys,
    environment: Option<String>,
) -> AlertConfiguration {
    match read_configuration(store, keys, environment).await {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!(error = %e, "Alert configuration unreadable, alerting disabled");
            AlertConfiguration::default()
        }
    }
}

async fn read_configuration(
    store: &dyn ConfigStore,
    keys: &SettingKeys,
    environment: Option<String>,
) -> Result<AlertConfiguration, ConfigStoreError> {
    let enabled = store.get_bool(&keys.key(SettingKeys::ENABLED)).await?;
    let webhook_url = store
        .get_string(&keys.key(SettingKeys::WEBHOOK_URL))
        .await?
        .trim()
        .to_string();

    // Nothing else matters when alerting is off.
    if !enabled || webhook_url.is_empty() {
        return Ok(AlertConfiguration {
            enabled,
            webhook_url,
            environment,
            ..Default::default()
        });
    }

    let list = |name: &'static str| async move {
        store
            .get_string(&keys.key(name))
            .await
            .map(|raw| split_list(&raw))
    };

    let bot_patterns = list(SettingKeys::IGNORED_BOTS).await?;
    let referer_patterns = list(SettingKeys::IGNORED_REFERERS).await?;
    let application_root = store.get_string(&keys.key(SettingKeys::APP_ROOT)).await?;

    Ok(AlertConfiguration {
        enabled,
        webhook_url,
        mention_handles: list(SettingKeys::MENTIONS).await?,
        ignore_bots: store.get_bool(&keys.key(SettingKeys::IGNORE_BOTS)).await?,
        bot_user_agent_patterns: compile_patterns(SettingKeys::IGNORED_BOTS, &bot_patterns),
        client_error_alerting_enabled: store
            .get_bool(&keys.key(SettingKeys::ERRORS_ENABLED))
            .await?,
        ignored_exception_types: list(SettingKeys::IGNORED_ERRORS).await?,
        refererless_ignored_exception_types: list(SettingKeys::IGNORED_REFERER_ERRORS).await?,
        ignored_referer_patterns: compile_patterns(SettingKeys::IGNORED_REFERERS, &referer_patterns),
        suppress_outside_production: store.get_bool(&keys.key(SettingKeys::IGNORE_DEV)).await?,
        include_stack_trace: store.get_bool(&keys.key(SettingKeys::SEND_TRACE)).await?,
        environment,
        application_root: Some(application_root.trim().to_string()).filter(|root| !root.is_empty()),
    })
}
