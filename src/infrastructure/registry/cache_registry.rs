//! Cache registry - maps (owner type, member) to registrations

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::DomainError;
use crate::domain::registry::{MemberId, OwnerType, Registration};

type Partition = HashMap<MemberId, Arc<Registration>>;

/// Registry of cacheable members, partitioned by owner type
///
/// Written during wiring, read on every cacheable call afterwards.
#[derive(Debug, Default)]
pub struct CacheRegistry {
    registrations: RwLock<HashMap<OwnerType, Partition>>,
}

impl CacheRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> CacheRegistryBuilder {
        CacheRegistryBuilder::default()
    }

    /// Registers a member, replacing any registration for the same pair
    pub async fn register(&self, registration: Registration) -> Option<Arc<Registration>> {
        let mut registrations = self.registrations.write().await;
        insert(&mut registrations, registration)
    }

    /// Get a registration, returning an error if it was never declared
    pub async fn lookup(
        &self,
        owner: &OwnerType,
        member: &MemberId,
    ) -> Result<Arc<Registration>, DomainError> {
        self.registrations
            .read()
            .await
            .get(owner)
            .and_then(|partition| partition.get(member))
            .cloned()
            .ok_or_else(|| DomainError::registration_not_found(owner.to_string(), member.as_str()))
    }

    /// Check if a member is registered on an owner
    pub async fn contains(&self, owner: &OwnerType, member: &MemberId) -> bool {
        self.registrations
            .read()
            .await
            .get(owner)
            .is_some_and(|partition| partition.contains_key(member))
    }

    /// List the registered members of an owner, sorted
    pub async fn members(&self, owner: &OwnerType) -> Vec<MemberId> {
        let mut members: Vec<MemberId> = self
            .registrations
            .read()
            .await
            .get(owner)
            .map(|partition| partition.keys().cloned().collect())
            .unwrap_or_default();

        members.sort();
        members
    }

    /// Total number of registrations
    pub async fn len(&self) -> usize {
        self.registrations
            .read()
            .await
            .values()
            .map(|partition| partition.len())
            .sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn insert(
    registrations: &mut HashMap<OwnerType, Partition>,
    registration: Registration,
) -> Option<Arc<Registration>> {
    let owner = *registration.owner();
    let member = registration.member().clone();

    let replaced = registrations
        .entry(owner)
        .or_default()
        .insert(member.clone(), Arc::new(registration));

    if replaced.is_some() {
        tracing::info!(owner = %owner, member = %member, "Replaced cacheable registration");
    } else {
        tracing::debug!(owner = %owner, member = %member, "Registered cacheable member");
    }

    replaced
}

/// Collects registrations while components are wired, then builds the registry
#[derive(Debug, Default)]
pub struct CacheRegistryBuilder {
    registrations: HashMap<OwnerType, Partition>,
}

impl CacheRegistryBuilder {
    /// Adds a registration; a later one for the same pair wins
    pub fn register(mut self, registration: Registration) -> Self {
        insert(&mut self.registrations, registration);
        self
    }

    pub fn build(self) -> CacheRegistry {
        CacheRegistry {
            registrations: RwLock::new(self.registrations),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct User;
    struct Order;

    fn profile(ttl: u64) -> Registration {
        Registration::builder::<User>("profile", "user:{0}")
            .ttl_secs(ttl)
            .compute(|_: Arc<User>, _| async { Ok::<_, DomainError>("profile") })
    }

    #[tokio::test]
    async fn test_register_and_lookup() {
        let registry = CacheRegistry::new();
        registry.register(profile(60)).await;

        let registration = registry
            .lookup(&OwnerType::of::<User>(), &"profile".into())
            .await
            .unwrap();

        assert_eq!(registration.member().as_str(), "profile");
        assert_eq!(registration.ttl(), Some(Duration::from_secs(60)));
    }

    #[tokio::test]
    async fn test_lookup_not_found() {
        let registry = CacheRegistry::new();
        registry.register(profile(60)).await;

        let missing_member = registry
            .lookup(&OwnerType::of::<User>(), &"orders".into())
            .await;
        assert!(matches!(
            missing_member,
            Err(DomainError::RegistrationNotFound { ref member, .. }) if member == "orders"
        ));

        let missing_owner = registry
            .lookup(&OwnerType::of::<Order>(), &"profile".into())
            .await;
        assert!(matches!(
            missing_owner,
            Err(DomainError::RegistrationNotFound { ref owner, .. }) if owner == "Order"
        ));
    }

    #[tokio::test]
    async fn test_register_overwrites() {
        let registry = CacheRegistry::new();

        assert!(registry.register(profile(60)).await.is_none());
        let replaced = registry.register(profile(120)).await;
        assert_eq!(replaced.unwrap().ttl(), Some(Duration::from_secs(60)));

        let active = registry
            .lookup(&OwnerType::of::<User>(), &"profile".into())
            .await
            .unwrap();
        assert_eq!(active.ttl(), Some(Duration::from_secs(120)));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_members_are_partitioned_by_owner() {
        let registry = CacheRegistry::builder()
            .register(profile(60))
            .register(
                Registration::builder::<User>("avatar", "avatar:{0}")
                    .compute(|_: Arc<User>, _| async { Ok::<_, DomainError>(1) }),
            )
            .register(
                Registration::builder::<Order>("profile", "order:{0}")
                    .compute(|_: Arc<Order>, _| async { Ok::<_, DomainError>(2) }),
            )
            .build();

        assert_eq!(
            registry.members(&OwnerType::of::<User>()).await,
            vec![MemberId::from("avatar"), MemberId::from("profile")]
        );
        assert!(registry.contains(&OwnerType::of::<Order>(), &"profile".into()).await);
        assert!(!registry.contains(&OwnerType::of::<Order>(), &"avatar".into()).await);
        assert_eq!(registry.len().await, 3);
        assert!(!registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_builder_keeps_last_registration() {
        let registry = CacheRegistry::builder()
            .register(profile(60))
            .register(profile(90))
            .build();

        let active = registry
            .lookup(&OwnerType::of::<User>(), &"profile".into())
            .await
            .unwrap();
        assert_eq!(active.ttl(), Some(Duration::from_secs(90)));
        assert_eq!(registry.len().await, 1);
    }
}
