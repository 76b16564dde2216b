//! Cache infrastructure - store drivers, tier composition and binding

mod binding;
mod factory;
mod in_memory;
mod redis;
mod tiered;

pub use binding::CacheBinding;
pub use factory::{CacheConfig, CacheFactory, CacheType};
pub use in_memory::{InMemoryCache, InMemoryCacheConfig};
pub use redis::{RedisCache, RedisCacheConfig};
pub use tiered::TieredCache;
