//! Process environment configuration store.
//!
//! `Error.config.webhookurl` is read from `ERROR_CONFIG_WEBHOOKURL`. The
//! environment is consulted on every read, never cached.

use async_trait::async_trait;

use faultline_core::ConfigStoreError;
use faultline_core::ports::{ConfigStore, parse_bool};

/// Configuration store backed by environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvConfigStore;

impl EnvConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Environment variable holding a dotted setting key.
    pub fn variable_name(key: &str) -> String {
        key.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    }

    fn read(key: &str) -> Result<String, ConfigStoreError> {
        match std::env::var(Self::variable_name(key)) {
            Ok(value) => Ok(value),
            Err(std::env::VarError::NotPresent) => Ok(String::new()),
            Err(std::env::VarError::NotUnicode(_)) => Err(ConfigStoreError::InvalidValue {
                key: key.to_string(),
                reason: "value is not valid unicode".to_string(),
            }),
        }
    }
}

#[async_trait]
impl ConfigStore for EnvConfigStore {
    async fn get_bool(&self, key: &str) -> Result<bool, ConfigStoreError> {
        parse_bool(key, &Self::read(key)?)
    }

    async fn get_string(&self, key: &str) -> Result<String, ConfigStoreError> {
        Self::read(key)
    }
}
