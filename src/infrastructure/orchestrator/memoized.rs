//! A cacheable member bound to one instance

use std::any::Any;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use super::orchestrator::CacheOrchestrator;
use crate::domain::DomainError;
use crate::domain::cache::{CachedValue, CallArgs};
use crate::domain::registry::MemberId;

/// Read-through handle for `instance.member(args)`.
///
/// Lookups happen per call, so a handle created before the member was
/// registered (or before a cache was bound) works once wiring completes.
pub struct MemoizedMethod<T> {
    orchestrator: CacheOrchestrator,
    instance: Arc<T>,
    member: MemberId,
}

impl<T> Clone for MemoizedMethod<T> {
    fn clone(&self) -> Self {
        Self {
            orchestrator: self.orchestrator.clone(),
            instance: self.instance.clone(),
            member: self.member.clone(),
        }
    }
}

impl<T> std::fmt::Debug for MemoizedMethod<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoizedMethod")
            .field("owner", &std::any::type_name::<T>())
            .field("member", &self.member)
            .finish()
    }
}

impl<T: Any + Send + Sync> MemoizedMethod<T> {
    pub(crate) fn new(orchestrator: CacheOrchestrator, instance: Arc<T>, member: MemberId) -> Self {
        Self {
            orchestrator,
            instance,
            member,
        }
    }

    pub fn member(&self) -> &MemberId {
        &self.member
    }

    pub fn instance(&self) -> &Arc<T> {
        &self.instance
    }

    pub async fn call(&self, args: CallArgs) -> Result<CachedValue, DomainError> {
        self.orchestrator
            .call(&self.instance, self.member.clone(), args)
            .await
    }

    /// Like [`call`](Self::call), decoding the value; `None` for an empty result
    pub async fn call_as<V: DeserializeOwned>(&self, args: CallArgs) -> Result<Option<V>, DomainError> {
        self.call(args).await?.decode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::MockCache;
    use crate::domain::registry::Registration;
    use crate::infrastructure::registry::CacheRegistry;
    use serde::{Deserialize, Serialize};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Quote {
        symbol: String,
        price: f64,
    }

    #[derive(Debug, Default)]
    struct Ticker {
        lookups: AtomicUsize,
    }

    fn quote_registration() -> Registration {
        Registration::builder::<Ticker>("quote", "quote:{0}")
            .ttl_secs(5)
            .compute(|ticker: Arc<Ticker>, args: CallArgs| async move {
                ticker.lookups.fetch_add(1, Ordering::SeqCst);
                let symbol: String = args.get(0)?;
                Ok::<_, DomainError>(Quote { symbol, price: 12.5 })
            })
    }

    #[tokio::test]
    async fn test_call_as_decodes_and_memoizes() {
        let registry = Arc::new(CacheRegistry::builder().register(quote_registration()).build());
        let orchestrator = CacheOrchestrator::new(registry);
        orchestrator.bind_cache(Arc::new(MockCache::new())).await;

        let ticker = Arc::new(Ticker::default());
        let quote = orchestrator.memoized(ticker.clone(), "quote");
        let args = CallArgs::of(&("ACME",)).unwrap();

        let first: Option<Quote> = quote.call_as(args.clone()).await.unwrap();
        let second: Option<Quote> = quote.call_as(args).await.unwrap();

        let expected = Quote {
            symbol: "ACME".to_string(),
            price: 12.5,
        };
        assert_eq!(first, Some(expected.clone()));
        assert_eq!(second, Some(expected));
        assert_eq!(ticker.lookups.load(Ordering::SeqCst), 1);
        assert_eq!(quote.member().as_str(), "quote");
    }

    #[tokio::test]
    async fn test_handle_created_before_registration() {
        let registry = Arc::new(CacheRegistry::new());
        let orchestrator = CacheOrchestrator::new(registry.clone());
        orchestrator.bind_cache(Arc::new(MockCache::new())).await;

        let quote = orchestrator.memoized(Arc::new(Ticker::default()), "quote");
        let args = CallArgs::of(&("ACME",)).unwrap();

        let early = quote.call(args.clone()).await;
        assert!(matches!(early, Err(DomainError::RegistrationNotFound { .. })));

        registry.register(quote_registration()).await;
        assert!(quote.call(args).await.is_ok());
    }
}
