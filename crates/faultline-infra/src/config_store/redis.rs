//! Redis configuration store - settings shared by every instance of the
//! application and editable without a restart.

use std::time::Duration;

use async_trait::async_trait;
use ::redis::aio::ConnectionManager;
use ::redis::{AsyncCommands, Client};

use faultline_core::ConfigStoreError;
use faultline_core::ports::{ConfigStore, parse_bool};

/// Redis connection configuration.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis URL (e.g., redis://localhost:6379)
    pub url: String,
    /// Connection timeout
    pub connect_timeout: Duration,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl RedisConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            connect_timeout: Duration::from_secs(
                std::env::var("REDIS_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
        }
    }
}

/// Redis-backed configuration store. Each setting is a plain string key.
///
/// Uses connection manager for automatic reconnection.
pub struct RedisConfigStore {
    conn: ConnectionManager,
}

impl RedisConfigStore {
    pub async fn new(config: RedisConfig) -> Result<Self, ConfigStoreError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| ConfigStoreError::Unavailable(e.to_string()))?;

        // Use timeout to prevent hanging if Redis is unreachable
        let conn = tokio::time::timeout(config.connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| ConfigStoreError::Unavailable("Connection timed out".to_string()))?
            .map_err(|e| ConfigStoreError::Unavailable(e.to_string()))?;

        tracing::info!(url = %config.url, "Connected to Redis configuration store");

        Ok(Self { conn })
    }

    /// Create from environment configuration.
    pub async fn from_env() -> Result<Self, ConfigStoreError> {
        Self::new(RedisConfig::from_env()).await
    }

    async fn read(&self, key: &str) -> Result<String, ConfigStoreError> {
        let mut conn = self.conn.clone();
        conn.get::<_, Option<String>>(key)
            .await
            .map(Option::unwrap_or_default)
            .map_err(|e| {
                tracing::warn!(key = %key, error = %e, "Redis GET failed");
                ConfigStoreError::Unavailable(e.to_string())
            })
    }
}

#[async_trait]
impl ConfigStore for RedisConfigStore {
    async fn get_bool(&self, key: &str) -> Result<bool, ConfigStoreError> {
        parse_bool(key, &self.read(key).await?)
    }

    async fn get_string(&self, key: &str) -> Result<String, ConfigStoreError> {
        self.read(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn get_test_store() -> Option<(RedisConfigStore, ConnectionManager)> {
        let config = RedisConfig {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6389".to_string()),
            connect_timeout: Duration::from_secs(1),
        };

        let store = RedisConfigStore::new(config).await.ok()?;
        let conn = store.conn.clone();
        Some((store, conn))
    }

    #[tokio::test]
    async fn test_redis_store_reads_settings() {
        let (store, mut conn) = match get_test_store().await {
            Some(s) => s,
            None => {
                tracing::warn!("Redis not available, skipping test");
                return;
            }
        };

        let key = "FaultlineTest.config.webhookurl";
        conn.set::<_, _, ()>(key, "https://hooks.example/redis")
            .await
            .unwrap();
        assert_eq!(
            store.get_string(key).await.unwrap(),
            "https://hooks.example/redis"
        );

        conn.del::<_, ()>(key).await.unwrap();
        assert_eq!(store.get_string(key).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_redis_store_flags() {
        let (store, mut conn) = match get_test_store().await {
            Some(s) => s,
            None => return,
        };

        let key = "FaultlineTest.config.enabled";
        conn.set::<_, _, ()>(key, "true").await.unwrap();
        assert!(store.get_bool(key).await.unwrap());

        conn.del::<_, ()>(key).await.unwrap();
        assert!(!store.get_bool(key).await.unwrap());
    }
}
