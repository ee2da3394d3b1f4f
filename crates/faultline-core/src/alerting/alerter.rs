//! Entry point the host calls for every unhandled request error.

use std::sync::Arc;

use crate::domain::ExceptionContext;
use crate::ports::{ConfigStore, WebhookClient};

use super::dispatcher::Dispatcher;
use super::filter::{self, SuppressionReason};
use super::formatter;
use super::settings::{SettingKeys, load_configuration};

/// Default process environment variable naming the deployment environment.
pub const DEFAULT_ENVIRONMENT_VAR: &str = "APP_ENV";

/// What happened to one unhandled error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertOutcome {
    Suppressed(Vec<SuppressionReason>),
    Dispatched,
    /// The alert was composed but the webhook did not accept it.
    DeliveryFailed,
}

/// Filters, formats and dispatches alerts for unhandled errors.
///
/// Holds no configuration of its own: every call reads a fresh snapshot
/// from the store, so settings changed at runtime apply to the next error.
#[derive(Clone)]
pub struct ExceptionAlerter {
    store: Arc<dyn ConfigStore>,
    dispatcher: Dispatcher,
    keys: SettingKeys,
    environment_var: String,
}

impl ExceptionAlerter {
    pub fn new(store: Arc<dyn ConfigStore>, client: Arc<dyn WebhookClient>) -> Self {
        Self {
            store,
            dispatcher: Dispatcher::new(client),
            keys: SettingKeys::default(),
            environment_var: DEFAULT_ENVIRONMENT_VAR.to_string(),
        }
    }

    /// Read settings under `<namespace>.config.*` instead of `Error.config.*`.
    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.keys = SettingKeys::new(namespace);
        self
    }

    /// Read the deployment environment from `var` instead of `APP_ENV`.
    pub fn with_environment_var(mut self, var: impl Into<String>) -> Self {
        self.environment_var = var.into();
        self
    }

    /// Handle one unhandled error. Never fails.
    pub async fn on_unhandled_exception(&self, ctx: &ExceptionContext) -> AlertOutcome {
        let environment = std::env::var(&self.environment_var).ok();
        let cfg = load_configuration(self.store.as_ref(), &self.keys, environment).await;

        let decision = filter::evaluate(ctx, &cfg);
        if !decision.should_alert() {
            tracing::debug!(
                exception_type = %ctx.exception_type,
                status = ?ctx.status_code,
                reasons = ?decision.reasons,
                "Alert suppressed"
            );
            return AlertOutcome::Suppressed(decision.reasons);
        }

        let text = formatter::format(ctx, &cfg);
        tracing::info!(
            exception_type = %ctx.exception_type,
            method = %ctx.http_method,
            uri = %ctx.request_uri,
            "Dispatching error alert"
        );

        if self.dispatcher.dispatch(&text, &cfg.webhook_url).await {
            AlertOutcome::Dispatched
        } else {
            AlertOutcome::DeliveryFailed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SourceLocation, TypeHierarchy};
    use crate::error::{ConfigStoreError, WebhookError};
    use crate::ports::parse_bool;
    use async_trait::async_trait;
    use faultline_shared::WebhookPayload;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct SettingsStore(Mutex<HashMap<String, String>>);

    impl SettingsStore {
        fn with(entries: &[(&str, &str)]) -> Arc<Self> {
            let store = Self::default();
            for (k, v) in entries {
                store.set(k, v);
            }
            Arc::new(store)
        }

        fn set(&self, name: &str, value: &str) {
            self.0
                .lock()
                .unwrap()
                .insert(format!("Error.config.{name}"), value.to_string());
        }
    }

    #[async_trait]
    impl ConfigStore for SettingsStore {
        async fn get_bool(&self, key: &str) -> Result<bool, ConfigStoreError> {
            let raw = self.0.lock().unwrap().get(key).cloned().unwrap_or_default();
            parse_bool(key, &raw)
        }

        async fn get_string(&self, key: &str) -> Result<String, ConfigStoreError> {
            Ok(self.0.lock().unwrap().get(key).cloned().unwrap_or_default())
        }
    }

    #[derive(Default)]
    struct Outbox {
        posts: Mutex<Vec<(String, WebhookPayload)>>,
        refuse: bool,
    }

    #[async_trait]
    impl WebhookClient for Outbox {
        async fn post(&self, url: &str, payload: &WebhookPayload) -> Result<(), WebhookError> {
            if self.refuse {
                return Err(WebhookError::Transport("connection refused".to_string()));
            }
            self.posts
                .lock()
                .unwrap()
                .push((url.to_string(), payload.clone()));
            Ok(())
        }
    }

    fn checkout_failure() -> ExceptionContext {
        let hierarchy = TypeHierarchy::new().with_type("RuntimeFailure", "AppError");

        ExceptionContext::new(
            "RuntimeFailure",
            "payment gateway unreachable",
            SourceLocation::new("src/checkout.rs", 42),
        )
        .with_lineage(hierarchy.lineage("RuntimeFailure"))
        .with_request("GET", "/checkout")
        .with_user_agent(Some("Mozilla/5.0 (X11; Linux x86_64)".to_string()))
    }

    fn scenario_settings() -> Vec<(&'static str, &'static str)> {
        vec![
            ("enabled", "true"),
            ("webhookurl", "https://hooks.example/abc"),
            ("mentions", "ops"),
            ("ignorebots", "false"),
            ("errorsenabled", "true"),
            ("ignorederrors", ""),
            ("sendtrace", "false"),
        ]
    }

    #[tokio::test]
    async fn test_unhandled_error_is_posted_once() {
        let outbox = Arc::new(Outbox::default());
        let alerter = ExceptionAlerter::new(SettingsStore::with(&scenario_settings()), outbox.clone());

        let outcome = alerter.on_unhandled_exception(&checkout_failure()).await;
        assert_eq!(outcome, AlertOutcome::Dispatched);

        let posts = outbox.posts.lock().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].0, "https://hooks.example/abc");
        assert_eq!(
            posts[0].1.text,
            " <ops>\nGET request to /checkout\n\
             \twith user agent: Mozilla/5.0 (X11; Linux x86_64)\n\
             \tthrew\n\nRuntimeFailure\n\n\
             \"payment gateway unreachable\" at src/checkout.rs line 42"
        );
        assert!(!posts[0].1.unfurl_links);
        assert!(!posts[0].1.unfurl_media);
    }

    #[tokio::test]
    async fn test_ignored_error_is_not_posted() {
        let mut settings = scenario_settings();
        settings.push(("ignorederrors", "RuntimeFailure"));
        let outbox = Arc::new(Outbox::default());
        let alerter = ExceptionAlerter::new(SettingsStore::with(&settings), outbox.clone());

        let outcome = alerter.on_unhandled_exception(&checkout_failure()).await;

        assert_eq!(
            outcome,
            AlertOutcome::Suppressed(vec![SuppressionReason::IgnoredType])
        );
        assert!(outbox.posts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_settings_are_read_per_error() {
        let store = SettingsStore::with(&scenario_settings());
        let outbox = Arc::new(Outbox::default());
        let alerter = ExceptionAlerter::new(store.clone(), outbox.clone());

        assert_eq!(
            alerter.on_unhandled_exception(&checkout_failure()).await,
            AlertOutcome::Dispatched
        );

        store.set("enabled", "false");
        assert_eq!(
            alerter.on_unhandled_exception(&checkout_failure()).await,
            AlertOutcome::Suppressed(vec![SuppressionReason::Disabled])
        );
        assert_eq!(outbox.posts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_custom_namespace() {
        let store = Arc::new(SettingsStore::default());
        {
            let mut map = store.0.lock().unwrap();
            map.insert("Shop.config.enabled".to_string(), "true".to_string());
            map.insert(
                "Shop.config.webhookurl".to_string(),
                "https://hooks.example/shop".to_string(),
            );
        }
        let outbox = Arc::new(Outbox::default());
        let alerter = ExceptionAlerter::new(store, outbox.clone()).with_namespace("Shop");

        alerter.on_unhandled_exception(&checkout_failure()).await;

        assert_eq!(outbox.posts.lock().unwrap()[0].0, "https://hooks.example/shop");
    }

    #[tokio::test]
    async fn test_non_production_environment_is_suppressed() {
        let mut settings = scenario_settings();
        settings.push(("ignoredev", "true"));
        let alerter = ExceptionAlerter::new(
            SettingsStore::with(&settings),
            Arc::new(Outbox::default()),
        )
        .with_environment_var("FAULTLINE_TEST_ENV_NEVER_SET");

        assert_eq!(
            alerter.on_unhandled_exception(&checkout_failure()).await,
            AlertOutcome::Suppressed(vec![SuppressionReason::NonProduction])
        );
    }

    #[tokio::test]
    async fn test_delivery_failure_does_not_escape() {
        let outbox = Arc::new(Outbox {
            refuse: true,
            ..Default::default()
        });
        let alerter = ExceptionAlerter::new(SettingsStore::with(&scenario_settings()), outbox);

        assert_eq!(
            alerter.on_unhandled_exception(&checkout_failure()).await,
            AlertOutcome::DeliveryFailed
        );
    }
}
