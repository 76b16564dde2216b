//! Cache factory building the tier stack from configuration

use std::sync::Arc;
use std::time::Duration;

use crate::domain::DomainError;
use crate::domain::cache::Cache;

use super::in_memory::{InMemoryCache, InMemoryCacheConfig};
use super::redis::{RedisCache, RedisCacheConfig};
use super::tiered::TieredCache;

/// Supported backends for the remote (last) tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheType {
    /// In-process store, for single-instance setups and tests
    #[default]
    #[serde(alias = "inmemory", alias = "memory")]
    InMemory,
    /// Redis cache
    Redis,
}

impl CacheType {
    /// Whether entries outlive the process that wrote them
    pub fn is_shared(&self) -> bool {
        matches!(self, CacheType::Redis)
    }
}

impl std::fmt::Display for CacheType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheType::InMemory => write!(f, "in_memory"),
            CacheType::Redis => write!(f, "redis"),
        }
    }
}

/// Configuration for the tier stack
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Put a bounded in-process tier in front of the remote tier
    pub memory: bool,
    /// Maximum entries of the in-process tier
    pub max_capacity: u64,
    /// Store default TTL; `None` means entries without a TTL do not expire
    pub default_ttl: Option<Duration>,
    /// Backend of the remote tier
    pub remote: CacheType,
    /// Redis URL (required for Redis type)
    pub redis_url: Option<String>,
    /// Key prefix for namespacing remote keys
    pub key_prefix: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            memory: false,
            max_capacity: 100,
            default_ttl: None,
            remote: CacheType::InMemory,
            redis_url: None,
            key_prefix: None,
        }
    }
}

impl CacheConfig {
    /// Single in-process tier
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Redis as the remote tier
    pub fn redis(url: impl Into<String>) -> Self {
        Self {
            remote: CacheType::Redis,
            redis_url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Adds the in-process tier in front of the remote one
    pub fn with_memory_tier(mut self, max_capacity: u64) -> Self {
        self.memory = true;
        self.max_capacity = max_capacity;
        self
    }

    /// Sets the key prefix
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Sets the default TTL; zero keeps the store without one
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = (!ttl.is_zero()).then_some(ttl);
        self
    }

    fn memory_config(&self) -> InMemoryCacheConfig {
        let config = InMemoryCacheConfig::default().with_max_capacity(self.max_capacity);

        match self.default_ttl {
            Some(ttl) => config.with_default_ttl(ttl),
            None => config,
        }
    }
}

/// Factory for creating cache instances
#[derive(Debug, Default)]
pub struct CacheFactory;

impl CacheFactory {
    /// Creates a new cache factory
    pub fn new() -> Self {
        Self
    }

    /// Builds `[memory (optional), remote]`, fastest first
    pub async fn create(&self, config: &CacheConfig) -> Result<TieredCache, DomainError> {
        let mut tiers: Vec<Arc<dyn Cache>> = Vec::with_capacity(2);

        if config.memory {
            tiers.push(Arc::new(InMemoryCache::with_config(config.memory_config())));
        }

        tiers.push(self.create_remote(config).await?);

        tracing::info!(
            memory = config.memory,
            remote = %config.remote,
            tiers = tiers.len(),
            "Created cache tiers"
        );

        TieredCache::new(tiers)
    }

    async fn create_remote(&self, config: &CacheConfig) -> Result<Arc<dyn Cache>, DomainError> {
        match config.remote {
            CacheType::InMemory => Ok(Arc::new(InMemoryCache::with_config(config.memory_config()))),
            CacheType::Redis => {
                let url = config.redis_url.clone().ok_or_else(|| {
                    DomainError::configuration("Redis URL is required for Redis cache type")
                })?;

                let mut redis_config = RedisCacheConfig::new(url);

                if let Some(ttl) = config.default_ttl {
                    redis_config = redis_config.with_default_ttl(ttl);
                }

                if let Some(prefix) = &config.key_prefix {
                    redis_config = redis_config.with_key_prefix(prefix.clone());
                }

                let cache = RedisCache::new(redis_config).await?;
                Ok(Arc::new(cache))
            }
        }
    }
}
