//! Cache domain - store abstraction, key derivation and stored values

mod key;
mod repository;
mod value;

pub use key::{CallArgs, KeyBuilder, KeyFn, KeyTemplate};
pub use repository::{effective_ttl, Cache, CacheExt};
pub use value::CachedValue;

#[cfg(test)]
pub use repository::mock::MockCache;
