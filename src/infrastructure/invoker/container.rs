//! In-process instance container

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::DomainError;
use crate::domain::invoker::Invoker;
use crate::domain::registry::{Instance, OwnerType};

/// Holds one live instance per owner type and resolves it for
/// out-of-band recomputation
#[derive(Default)]
pub struct InstanceContainer {
    instances: RwLock<HashMap<OwnerType, Instance>>,
}

impl std::fmt::Debug for InstanceContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceContainer").finish_non_exhaustive()
    }
}

impl InstanceContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `instance` as the resolvable instance of `T`, replacing any previous one
    pub async fn bind<T: Any + Send + Sync>(&self, instance: Arc<T>) {
        self.instances
            .write()
            .await
            .insert(OwnerType::of::<T>(), instance);
    }

    pub async fn unbind<T: Any + Send + Sync>(&self) -> bool {
        self.instances
            .write()
            .await
            .remove(&OwnerType::of::<T>())
            .is_some()
    }

    /// Typed access to a bound instance
    pub async fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        let instance = self.instances.read().await.get(&OwnerType::of::<T>()).cloned()?;
        instance.downcast::<T>().ok()
    }
}

#[async_trait]
impl Invoker for InstanceContainer {
    async fn resolve_instance(&self, owner: &OwnerType) -> Result<Option<Instance>, DomainError> {
        Ok(self.instances.read().await.get(owner).cloned())
    }
}
