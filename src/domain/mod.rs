//! Domain layer - Core caching abstractions

pub mod cache;
pub mod error;
pub mod invoker;
pub mod registry;

pub use cache::{Cache, CacheExt, CachedValue, CallArgs, KeyBuilder, KeyTemplate};
pub use error::DomainError;
pub use invoker::Invoker;
pub use registry::{Computation, Instance, MemberId, OwnerType, Registration, RegistrationBuilder};
