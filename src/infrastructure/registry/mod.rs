//! Registry infrastructure

mod cache_registry;

pub use cache_registry::{CacheRegistry, CacheRegistryBuilder};
