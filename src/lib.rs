//! Tiered Cacheable
//!
//! Declarative read-through caching of object members over an ordered stack
//! of cache tiers:
//! - Registrations bind a member of an owner type to a key template and TTL
//! - Tiered stores (moka in-process, Redis) composed fastest first
//! - Out-of-band recompute, fetch and invalidation by member or key

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{
    Cache, CacheExt, CachedValue, CallArgs, DomainError, Invoker, KeyBuilder, KeyTemplate,
    MemberId, OwnerType, Registration,
};
pub use infrastructure::cache::{CacheBinding, CacheConfig, CacheFactory, TieredCache};
pub use infrastructure::invoker::InstanceContainer;
pub use infrastructure::orchestrator::{CacheOrchestrator, InvalidationTarget, MemoizedMethod};
pub use infrastructure::registry::{CacheRegistry, CacheRegistryBuilder};
