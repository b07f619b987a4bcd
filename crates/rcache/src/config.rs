use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, CacheResult};

/// Configuration for a [`Cache`](crate::Cache).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Prefix confining this cache's keys on a shared backend. Construction
    /// then clears only this namespace instead of the whole backend.
    pub namespace: Option<String>,
    /// Expiry used by [`Cache::set_expiring`](crate::Cache::set_expiring).
    pub default_expiry_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            default_expiry_secs: 10,
        }
    }
}

impl CacheConfig {
    /// A configuration confined to `namespace`.
    pub fn namespaced(namespace: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            ..Default::default()
        }
    }

    /// Parse from TOML. Missing fields take their defaults.
    pub fn from_toml_str(s: &str) -> CacheResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| CacheError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CacheResult<()> {
        if let Some(namespace) = &self.namespace {
            if namespace.trim().is_empty() {
                return Err(CacheError::Config("namespace must not be blank".into()));
            }
            if namespace.contains(':') {
                return Err(CacheError::Config(format!(
                    "namespace {namespace:?} must not contain ':'"
                )));
            }
        }
        if self.default_expiry_secs == 0 {
            return Err(CacheError::Config(
                "default_expiry_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn default_expiry(&self) -> Duration {
        Duration::from_secs(self.default_expiry_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = CacheConfig::default();
        assert!(c.namespace.is_none());
        assert_eq!(c.default_expiry(), Duration::from_secs(10));
        c.validate().unwrap();
    }

    #[test]
    fn namespaced_keeps_other_defaults() {
        let c = CacheConfig::namespaced("pages");
        assert_eq!(c.namespace.as_deref(), Some("pages"));
        assert_eq!(c.default_expiry_secs, 10);
    }

    #[test]
    fn parses_toml() {
        let c = CacheConfig::from_toml_str(
            r#"
            namespace = "web"
            default_expiry_secs = 30
            "#,
        )
        .unwrap();
        assert_eq!(c.namespace.as_deref(), Some("web"));
        assert_eq!(c.default_expiry(), Duration::from_secs(30));
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(CacheConfig::from_toml_str("").unwrap(), CacheConfig::default());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            CacheConfig::from_toml_str("namespace = \"  \""),
            Err(CacheError::Config(_))
        ));
        assert!(matches!(
            CacheConfig::from_toml_str("namespace = \"a:b\""),
            Err(CacheError::Config(_))
        ));
        assert!(matches!(
            CacheConfig::from_toml_str("default_expiry_secs = 0"),
            Err(CacheError::Config(_))
        ));
        assert!(matches!(
            CacheConfig::from_toml_str("default_expiry_secs = \"ten\""),
            Err(CacheError::Config(_))
        ));
    }
}
