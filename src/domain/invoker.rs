//! Instance resolution for out-of-band invocations

use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::registry::{Instance, OwnerType};

#[cfg(test)]
use mockall::automock;

/// Locates a live instance of an owner type so a computation can be re-run
/// outside of its usual call path
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Invoker: Send + Sync {
    /// Resolves an instance of `owner`, or `None` if none is available
    async fn resolve_instance(&self, owner: &OwnerType) -> Result<Option<Instance>, DomainError>;
}
