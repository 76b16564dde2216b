//! Owner and member identities of cacheable operations

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of the type declaring a cacheable member
///
/// Equality and hashing only consider the `TypeId`; the name is kept for
/// diagnostics.
#[derive(Clone, Copy)]
pub struct OwnerType {
    id: TypeId,
    name: &'static str,
}

impl OwnerType {
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Full type path
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        match base.rfind("::") {
            Some(pos) => &self.name[pos + 2..],
            None => self.name,
        }
    }
}

impl PartialEq for OwnerType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for OwnerType {}

impl Hash for OwnerType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for OwnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OwnerType").field(&self.name).finish()
    }
}

impl fmt::Display for OwnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Identity of a cacheable member, unique within its owner
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(String);

impl MemberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for MemberId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&MemberId> for MemberId {
    fn from(id: &MemberId) -> Self {
        id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct User;
    struct Order;

    #[test]
    fn test_owner_identity() {
        assert_eq!(OwnerType::of::<User>(), OwnerType::of::<User>());
        assert_ne!(OwnerType::of::<User>(), OwnerType::of::<Order>());

        let owners: HashSet<_> = [OwnerType::of::<User>(), OwnerType::of::<User>()].into();
        assert_eq!(owners.len(), 1);
    }

    #[test]
    fn test_owner_display() {
        let owner = OwnerType::of::<User>();
        assert_eq!(owner.to_string(), "User");
        assert!(owner.name().ends_with("::User"));
    }

    #[test]
    fn test_member_id() {
        let member = MemberId::from("profile");
        assert_eq!(member.as_str(), "profile");
        assert_eq!(member, MemberId::new(String::from("profile")));
    }
}
