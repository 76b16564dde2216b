use std::time::Duration;

use serde::Deserialize;

use crate::domain::cache::KeyBuilder;
use crate::infrastructure::cache::{CacheConfig, CacheType};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub cache: CacheSettings,
    pub logging: LoggingConfig,
}

/// Cache tier settings as read from files and `APP__CACHE__*` variables
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Put a bounded in-process tier in front of the remote tier
    pub memory: bool,
    pub max_capacity: u64,
    /// Store default TTL in seconds, 0 for none
    pub default_ttl_secs: u64,
    pub remote: CacheType,
    pub redis_url: Option<String>,
    /// Prefix applied by the Redis tier to every stored key
    pub key_prefix: Option<String>,
    /// Namespace prepended by the key builder to every derived key
    pub key_namespace: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            memory: false,
            max_capacity: 100,
            default_ttl_secs: 0,
            remote: CacheType::default(),
            redis_url: None,
            key_prefix: None,
            key_namespace: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl CacheSettings {
    /// Factory configuration for these settings
    pub fn to_cache_config(&self) -> CacheConfig {
        let mut config = CacheConfig {
            remote: self.remote,
            redis_url: self.redis_url.clone(),
            ..Default::default()
        }
        .with_default_ttl(Duration::from_secs(self.default_ttl_secs));

        if self.memory {
            config = config.with_memory_tier(self.max_capacity);
        } else {
            config.max_capacity = self.max_capacity;
        }

        if let Some(prefix) = &self.key_prefix {
            config = config.with_key_prefix(prefix.clone());
        }

        config
    }

    pub fn key_builder(&self) -> KeyBuilder {
        match &self.key_namespace {
            Some(namespace) if !namespace.is_empty() => KeyBuilder::new().with_namespace(namespace.clone()),
            _ => KeyBuilder::new(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert!(!config.cache.memory);
        assert_eq!(config.cache.max_capacity, 100);
        assert_eq!(config.cache.remote, CacheType::InMemory);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_to_cache_config() {
        let settings = CacheSettings {
            memory: true,
            max_capacity: 500,
            default_ttl_secs: 300,
            remote: CacheType::Redis,
            redis_url: Some("redis://localhost:6379".to_string()),
            key_prefix: Some("svc".to_string()),
            key_namespace: None,
        };

        let config = settings.to_cache_config();
        assert!(config.memory);
        assert_eq!(config.max_capacity, 500);
        assert_eq!(config.default_ttl, Some(Duration::from_secs(300)));
        assert_eq!(config.remote, CacheType::Redis);
        assert_eq!(config.redis_url.as_deref(), Some("redis://localhost:6379"));
        assert_eq!(config.key_prefix.as_deref(), Some("svc"));
    }

    #[test]
    fn test_zero_ttl_means_no_default() {
        let config = CacheSettings::default().to_cache_config();

        assert_eq!(config.default_ttl, None);
        assert!(!config.memory);
    }

    #[test]
    fn test_key_builder_namespace() {
        let settings = CacheSettings {
            key_namespace: Some("app".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.key_builder().namespace(), Some("app"));

        let blank = CacheSettings {
            key_namespace: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(blank.key_builder().namespace(), None);
    }

    #[test]
    fn test_remote_aliases() {
        for alias in ["in_memory", "inmemory", "memory"] {
            let config: AppConfig =
                serde_json::from_value(serde_json::json!({ "cache": { "remote": alias } })).unwrap();
            assert_eq!(config.cache.remote, CacheType::InMemory, "{}", alias);
        }

        let invalid = serde_json::from_value::<AppConfig>(serde_json::json!({
            "cache": { "remote": "memcached" }
        }));
        assert!(invalid.is_err());
    }

    #[test]
    fn test_deserialize_partial_settings() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "cache": { "memory": true, "remote": "redis", "redis_url": "redis://cache:6379" },
            "logging": { "format": "json" }
        }))
        .unwrap();

        assert!(config.cache.memory);
        assert_eq!(config.cache.max_capacity, 100);
        assert_eq!(config.cache.remote, CacheType::Redis);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Json);
    }
}
