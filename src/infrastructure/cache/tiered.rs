//! Ordered composition of cache tiers

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::DomainError;
use crate::domain::cache::Cache;

/// Composes cache tiers, fastest first, into one logical cache.
///
/// Reads return the first tier's hit without repairing earlier tiers. Writes,
/// deletes and clears fan out to every tier; a failing tier does not stop the
/// remaining ones, and the failure is reported once all tiers were attempted.
#[derive(Debug, Clone)]
pub struct TieredCache {
    tiers: Vec<Arc<dyn Cache>>,
}

/// Failure of a single tier during a fan-out operation
#[derive(Debug)]
struct TierFailure {
    index: usize,
    backend: &'static str,
    error: DomainError,
}

impl TieredCache {
    /// Creates a tiered cache; at least one tier is required
    pub fn new(tiers: Vec<Arc<dyn Cache>>) -> Result<Self, DomainError> {
        if tiers.is_empty() {
            return Err(DomainError::configuration(
                "A tiered cache needs at least one tier",
            ));
        }

        Ok(Self { tiers })
    }

    /// Single-tier composition
    pub fn single(tier: Arc<dyn Cache>) -> Self {
        Self { tiers: vec![tier] }
    }

    pub fn tiers(&self) -> &[Arc<dyn Cache>] {
        &self.tiers
    }

    /// Runs `op` on every tier in order and aggregates the failures
    async fn fan_out<'a, F, Fut, T>(&'a self, operation: &str, key: &str, op: F) -> Result<Vec<T>, DomainError>
    where
        F: Fn(&'a Arc<dyn Cache>) -> Fut,
        Fut: std::future::Future<Output = Result<T, DomainError>>,
    {
        let mut results = Vec::with_capacity(self.tiers.len());
        let mut failures = Vec::new();

        for (index, tier) in self.tiers.iter().enumerate() {
            match op(tier).await {
                Ok(result) => results.push(result),
                Err(error) => {
                    tracing::warn!(
                        tier = index,
                        backend = tier.backend_name(),
                        operation,
                        key,
                        error = %error,
                        "Cache tier operation failed"
                    );
                    failures.push(TierFailure {
                        index,
                        backend: tier.backend_name(),
                        error,
                    });
                }
            }
        }

        match failures.len() {
            0 => Ok(results),
            1 => Err(failures.remove(0).error),
            _ => {
                let message = failures
                    .iter()
                    .map(|f| format!("tier {} ({}): {}", f.index, f.backend, f.error))
                    .collect::<Vec<_>>()
                    .join("; ");
                Err(DomainError::tiered(operation, message))
            }
        }
    }
}

#[async_trait]
impl Cache for TieredCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        for (index, tier) in self.tiers.iter().enumerate() {
            if let Some(value) = tier.get_raw(key).await? {
                tracing::debug!(key, tier = index, backend = tier.backend_name(), "Tier hit");
                return Ok(Some(value));
            }
        }

        Ok(None)
    }

    async fn set_raw(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), DomainError> {
        self.fan_out("set", key, |tier| tier.set_raw(key, value, ttl))
            .await
            .map(|_| ())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let deleted = self.fan_out("delete", key, |tier| tier.delete(key)).await?;
        Ok(deleted.into_iter().any(|d| d))
    }

    async fn ttl(&self, key: &str) -> Result<Option<Duration>, DomainError> {
        for tier in &self.tiers {
            if let Some(ttl) = tier.ttl(key).await? {
                return Ok(Some(ttl));
            }
        }

        Ok(None)
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.fan_out("clear", "*", |tier| tier.clear()).await.map(|_| ())
    }

    /// Size of the last tier, which holds the authoritative copy
    async fn size(&self) -> Result<usize, DomainError> {
        match self.tiers.last() {
            Some(tier) => tier.size().await,
            None => Ok(0),
        }
    }

    fn backend_name(&self) -> &'static str {
        "tiered"
    }
}
