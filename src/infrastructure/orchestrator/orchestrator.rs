//! Cache orchestrator - read-through calls and out-of-band operations

use std::any::Any;
use std::sync::Arc;

use serde_json::Value;

use super::memoized::MemoizedMethod;
use crate::domain::DomainError;
use crate::domain::cache::{Cache, CacheExt, CachedValue, CallArgs, KeyBuilder};
use crate::domain::invoker::Invoker;
use crate::domain::registry::{Instance, MemberId, OwnerType, Registration};
use crate::infrastructure::cache::CacheBinding;
use crate::infrastructure::registry::CacheRegistry;

/// What [`CacheOrchestrator::invalidate`] should delete
#[derive(Debug, Clone)]
pub enum InvalidationTarget {
    /// A raw cache key
    Key(String),
    /// The key a registered member derives from `args`
    Member {
        owner: OwnerType,
        member: MemberId,
        args: CallArgs,
    },
}

impl InvalidationTarget {
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }

    pub fn member<T: Any>(member: impl Into<MemberId>, args: CallArgs) -> Self {
        Self::Member {
            owner: OwnerType::of::<T>(),
            member: member.into(),
            args,
        }
    }
}

/// Drives cacheable members against the bound cache
///
/// Cheap to clone; clones share the registry, binding and invoker.
#[derive(Clone)]
pub struct CacheOrchestrator {
    registry: Arc<CacheRegistry>,
    binding: Arc<CacheBinding>,
    invoker: Option<Arc<dyn Invoker>>,
    key_builder: KeyBuilder,
}

impl std::fmt::Debug for CacheOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheOrchestrator")
            .field("registry", &self.registry)
            .field("binding", &self.binding)
            .field("invoker", &self.invoker.as_ref().map(|_| "<invoker>"))
            .field("key_builder", &self.key_builder)
            .finish()
    }
}

impl CacheOrchestrator {
    /// Creates an orchestrator with its own, initially unbound, cache binding
    pub fn new(registry: Arc<CacheRegistry>) -> Self {
        Self {
            registry,
            binding: Arc::new(CacheBinding::new()),
            invoker: None,
            key_builder: KeyBuilder::new(),
        }
    }

    /// Shares `binding` instead of owning one, e.g. [`CacheBinding::global`]
    pub fn with_binding(mut self, binding: Arc<CacheBinding>) -> Self {
        self.binding = binding;
        self
    }

    pub fn with_invoker(mut self, invoker: Arc<dyn Invoker>) -> Self {
        self.invoker = Some(invoker);
        self
    }

    pub fn with_key_builder(mut self, key_builder: KeyBuilder) -> Self {
        self.key_builder = key_builder;
        self
    }

    pub fn registry(&self) -> &Arc<CacheRegistry> {
        &self.registry
    }

    pub fn binding(&self) -> &Arc<CacheBinding> {
        &self.binding
    }

    /// Binds the cache every later operation runs against
    pub async fn bind_cache(&self, cache: Arc<dyn Cache>) -> Option<Arc<dyn Cache>> {
        self.binding.bind(cache).await
    }

    /// Binds `instance` to a registered member for repeated calls
    pub fn memoized<T: Any + Send + Sync>(
        &self,
        instance: Arc<T>,
        member: impl Into<MemberId>,
    ) -> MemoizedMethod<T> {
        MemoizedMethod::new(self.clone(), instance, member.into())
    }

    /// Read-through call of a registered member on `instance`.
    ///
    /// A hit returns the stored value without running the computation. A miss
    /// runs it, stores the normalized result and returns the result as
    /// computed, so only later hits observe [`CachedValue::Empty`].
    pub async fn call<T: Any + Send + Sync>(
        &self,
        instance: &Arc<T>,
        member: impl Into<MemberId>,
        args: CallArgs,
    ) -> Result<CachedValue, DomainError> {
        let cache = self.binding.current().await?;
        let registration = self
            .registry
            .lookup(&OwnerType::of::<T>(), &member.into())
            .await?;
        let key = self.key_builder.build_key(registration.key(), &args)?;

        if let Some(cached) = cache.get::<CachedValue>(&key).await? {
            tracing::debug!(target_member = %registration.target(), key = %key, "Cache hit");
            return Ok(cached);
        }

        tracing::debug!(target_member = %registration.target(), key = %key, "Cache miss");

        let instance: Instance = instance.clone();
        let value = registration.computation().invoke(instance, args).await?;
        self.store(cache.as_ref(), &registration, &key, &value).await?;

        Ok(CachedValue::Present(value))
    }

    /// Recomputes a member on a resolved instance and stores the result.
    ///
    /// Returns the computed value, not its normalized stored form.
    pub async fn recompute(
        &self,
        owner: &OwnerType,
        member: impl Into<MemberId>,
        args: CallArgs,
    ) -> Result<Value, DomainError> {
        let cache = self.binding.current().await?;
        let registration = self.registry.lookup(owner, &member.into()).await?;
        let key = self.key_builder.build_key(registration.key(), &args)?;

        let value = self.invoke(&registration, args).await?;
        self.store(cache.as_ref(), &registration, &key, &value).await?;

        tracing::debug!(target_member = %registration.target(), key = %key, "Recomputed");
        Ok(value)
    }

    /// Computes a member on a resolved instance without touching the cache
    pub async fn fetch_by_invocation(
        &self,
        owner: &OwnerType,
        member: impl Into<MemberId>,
        args: CallArgs,
    ) -> Result<Value, DomainError> {
        let registration = self.registry.lookup(owner, &member.into()).await?;
        self.invoke(&registration, args).await
    }

    /// Deletes a cached value from every tier; `true` if any tier held it
    pub async fn invalidate(&self, target: InvalidationTarget) -> Result<bool, DomainError> {
        let cache = self.binding.current().await?;

        let key = match target {
            InvalidationTarget::Key(key) => key,
            InvalidationTarget::Member {
                owner,
                member,
                args,
            } => self.cache_key(&owner, member, &args).await?,
        };

        let deleted = cache.delete(&key).await?;
        tracing::debug!(key = %key, deleted, "Invalidated");
        Ok(deleted)
    }

    /// Clears every tier of the bound cache
    pub async fn reset_all(&self) -> Result<(), DomainError> {
        let cache = self.binding.current().await?;
        cache.clear().await?;
        tracing::info!(backend = cache.backend_name(), "Cache reset");
        Ok(())
    }

    /// The key a registered member derives from `args`
    pub async fn cache_key(
        &self,
        owner: &OwnerType,
        member: impl Into<MemberId>,
        args: &CallArgs,
    ) -> Result<String, DomainError> {
        let registration = self.registry.lookup(owner, &member.into()).await?;
        self.key_builder.build_key(registration.key(), args)
    }

    async fn invoke(&self, registration: &Registration, args: CallArgs) -> Result<Value, DomainError> {
        let owner = registration.owner();
        let invoker = self.invoker.as_ref().ok_or_else(|| {
            DomainError::configuration(format!(
                "No invoker configured; cannot run {} out of band",
                registration.target()
            ))
        })?;

        let instance = invoker
            .resolve_instance(owner)
            .await?
            .ok_or_else(|| DomainError::resolution(owner.to_string(), "no live instance available"))?;

        registration.computation().invoke(instance, args).await
    }

    async fn store(
        &self,
        cache: &dyn Cache,
        registration: &Registration,
        key: &str,
        value: &Value,
    ) -> Result<(), DomainError> {
        let normalized = CachedValue::normalize(value);
        cache.set(key, &normalized, registration.ttl()).await
    }
}
