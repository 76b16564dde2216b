//! Active cache configuration point

use std::sync::Arc;

use once_cell::sync::Lazy;
use tokio::sync::RwLock;

use crate::domain::DomainError;
use crate::domain::cache::Cache;

static GLOBAL_BINDING: Lazy<Arc<CacheBinding>> = Lazy::new(|| Arc::new(CacheBinding::new()));

/// Holds the cache that cacheable operations currently run against.
///
/// Binding replaces the previous cache in one step: an operation sees either
/// the old or the new cache, never a mix.
#[derive(Debug, Default)]
pub struct CacheBinding {
    current: RwLock<Option<Arc<dyn Cache>>>,
}

impl CacheBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide binding shared by every orchestrator that opts into it
    pub fn global() -> Arc<CacheBinding> {
        GLOBAL_BINDING.clone()
    }

    /// Binds `cache`, returning the one it replaced
    pub async fn bind(&self, cache: Arc<dyn Cache>) -> Option<Arc<dyn Cache>> {
        let backend = cache.backend_name();
        let previous = self.current.write().await.replace(cache);
        tracing::info!(backend, replaced = previous.is_some(), "Cache bound");
        previous
    }

    pub async fn unbind(&self) -> Option<Arc<dyn Cache>> {
        self.current.write().await.take()
    }

    pub async fn is_bound(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// The bound cache, or a configuration error if none is bound
    pub async fn current(&self) -> Result<Arc<dyn Cache>, DomainError> {
        self.current.read().await.clone().ok_or_else(|| {
            DomainError::configuration("No cache is bound; bind a cache before using cacheable operations")
        })
    }
}
