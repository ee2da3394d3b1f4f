//! In-memory configuration store - settings that can be changed at runtime
//! from inside the process.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use faultline_core::ConfigStoreError;
use faultline_core::ports::{ConfigStore, parse_bool};

/// In-memory configuration store using a HashMap with async RwLock.
///
/// Note: Settings are lost on process restart.
pub struct InMemoryConfigStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
        }
    }

    /// Seed the store with `(key, value)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: RwLock::new(
                pairs
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    pub async fn set(&self, key: &str, value: &str) {
        let mut values = self.values.write().await;
        values.insert(key.to_string(), value.to_string());
    }

    pub async fn remove(&self, key: &str) {
        let mut values = self.values.write().await;
        values.remove(key);
    }
}

impl Default for InMemoryConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn get_bool(&self, key: &str) -> Result<bool, ConfigStoreError> {
        let values = self.values.read().await;
        parse_bool(key, values.get(key).map(String::as_str).unwrap_or_default())
    }

    async fn get_string(&self, key: &str) -> Result<String, ConfigStoreError> {
        let values = self.values.read().await;
        Ok(values.get(key).cloned().unwrap_or_default())
    }
}
