use async_trait::async_trait;

use crate::error::ConfigStoreError;

/// Configuration store - read access to namespaced settings
/// (e.g. `Error.config.webhookurl`).
///
/// Implementations must treat a missing key as "unset": `false` for flags,
/// an empty string for text values.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Read a boolean flag.
    async fn get_bool(&self, key: &str) -> Result<bool, ConfigStoreError>;

    /// Read a string value.
    async fn get_string(&self, key: &str) -> Result<String, ConfigStoreError>;
}

/// Parse a flag stored as text, for stores that only hold strings.
pub fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigStoreError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        other => Err(ConfigStoreError::InvalidValue {
            key: key.to_string(),
            reason: format!("expected a boolean, got {other:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_accepts_common_spellings() {
        assert!(parse_bool("k", "true").unwrap());
        assert!(parse_bool("k", " YES ").unwrap());
        assert!(parse_bool("k", "1").unwrap());
        assert!(!parse_bool("k", "").unwrap());
        assert!(!parse_bool("k", "Off").unwrap());
    }

    #[test]
    fn test_parse_bool_rejects_garbage() {
        let err = parse_bool("Error.config.enabled", "maybe").unwrap_err();
        assert!(matches!(err, ConfigStoreError::InvalidValue { ref key, .. } if key == "Error.config.enabled"));
    }
}
