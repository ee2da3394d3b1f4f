//! Application state - shared across all handlers.

use std::sync::Arc;

use faultline_core::ExceptionAlerter;
use faultline_core::domain::TypeHierarchy;
use faultline_core::ports::{ConfigStore, WebhookClient};
use faultline_infra::{ConsoleWebhookClient, EnvConfigStore, HttpWebhookClient};

#[cfg(feature = "redis")]
use faultline_infra::RedisConfigStore;

use crate::config::{AppConfig, ConfigStoreKind};
use crate::middleware::error::AppError;
use crate::observability::FRAMEWORK_ERROR;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub alerter: Arc<ExceptionAlerter>,
    pub hierarchy: Arc<TypeHierarchy>,
    /// Backend actually serving alert settings.
    pub config_store: &'static str,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let (store, store_name) = Self::config_store(config.config_store).await;
        let client = Self::webhook_client(config.dry_run);

        let alerter = ExceptionAlerter::new(store, client)
            .with_namespace(&config.alert_namespace)
            .with_environment_var(config.environment_var.clone());

        Self {
            alerter: Arc::new(alerter),
            hierarchy: Arc::new(Self::type_hierarchy()),
            config_store: store_name,
        }
    }

    /// Every error type the host can raise, with its parents.
    pub fn type_hierarchy() -> TypeHierarchy {
        let mut hierarchy = TypeHierarchy::new();
        AppError::register_types(&mut hierarchy);
        hierarchy.register(FRAMEWORK_ERROR, crate::middleware::error::HTTP_ERROR);
        hierarchy
    }

    async fn config_store(kind: ConfigStoreKind) -> (Arc<dyn ConfigStore>, &'static str) {
        match kind {
            ConfigStoreKind::Env => (Arc::new(EnvConfigStore::new()), "env"),
            #[cfg(feature = "redis")]
            ConfigStoreKind::Redis => match RedisConfigStore::from_env().await {
                Ok(store) => (Arc::new(store), "redis"),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to Redis: {}. Reading alert settings from env.",
                        e
                    );
                    (Arc::new(EnvConfigStore::new()), "env")
                }
            },
            #[cfg(not(feature = "redis"))]
            ConfigStoreKind::Redis => {
                tracing::warn!("Built without redis support. Reading alert settings from env.");
                (Arc::new(EnvConfigStore::new()), "env")
            }
        }
    }

    fn webhook_client(dry_run: bool) -> Arc<dyn WebhookClient> {
        if dry_run {
            tracing::info!("ALERT_DRY_RUN set. Alerts are logged, not posted.");
            return Arc::new(ConsoleWebhookClient);
        }

        match HttpWebhookClient::new() {
            Ok(client) => Arc::new(client),
            Err(e) => {
                tracing::error!("Failed to build webhook client: {}. Logging alerts instead.", e);
                Arc::new(ConsoleWebhookClient)
            }
        }
    }
}
