//! Tenant (store) scoping.
//!
//! A store owner label only says "this user owns *some* store of this kind".
//! Access to a particular store additionally requires that the store document
//! names the user as its owner. System admins see every store.

use serde::{Deserialize, Serialize};

use crate::access::{AccessDecision, AuthState};
use crate::identity::Identity;
use crate::types::{Role, StoreId, UserId};

/// The two kinds of tenant in the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    /// Brick-and-mortar store.
    Physical,
    /// Online-only store.
    Virtual,
}

impl StoreKind {
    /// The role a user needs to own a store of this kind.
    #[must_use]
    pub const fn owner_role(self) -> Role {
        match self {
            Self::Physical => Role::PhysicalStoreOwner,
            Self::Virtual => Role::VirtualStoreOwner,
        }
    }

    /// Path prefix of this kind's dashboard pages.
    #[must_use]
    pub const fn dashboard_path(self) -> &'static str {
        match self {
            Self::Physical => "/dashboard/physical-stores",
            Self::Virtual => "/dashboard/virtual-stores",
        }
    }
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Physical => write!(f, "physical"),
            Self::Virtual => write!(f, "virtual"),
        }
    }
}

/// A store as far as access control is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    pub kind: StoreKind,
    pub owner_id: UserId,
    pub name: String,
}

impl Store {
    /// Whether `identity` is recorded as this store's owner.
    #[must_use]
    pub fn is_owned_by(&self, identity: &Identity) -> bool {
        self.owner_id == identity.id
    }
}

/// Decide whether `identity` may manage `store`.
///
/// - No identity: [`AccessDecision::Unauthenticated`]
/// - System admin: [`AccessDecision::Allowed`]
/// - Holds the store kind's owner role and is the recorded owner:
///   [`AccessDecision::Allowed`]
/// - Anything else, including owning the store document without the role
///   label: [`AccessDecision::Forbidden`]
#[must_use]
pub fn decide_store_access(identity: Option<&Identity>, store: &Store) -> AccessDecision {
    let Some(identity) = identity else {
        return AccessDecision::Unauthenticated;
    };

    if identity.has_role(Role::SystemAdmin) {
        return AccessDecision::Allowed;
    }

    if identity.has_role(store.kind.owner_role()) && store.is_owned_by(identity) {
        AccessDecision::Allowed
    } else {
        AccessDecision::Forbidden
    }
}

/// Where a caller is sent after signing in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Landing {
    /// Not signed in.
    SignIn,
    /// Marketplace administration.
    AdminDashboard,
    /// List of the caller's physical stores.
    PhysicalStores,
    /// List of the caller's virtual stores.
    VirtualStores,
    /// Signed in without any privileged role.
    Storefront,
}

impl Landing {
    /// Path to redirect to.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::SignIn => "/sign-in",
            Self::AdminDashboard => "/admin",
            Self::PhysicalStores => StoreKind::Physical.dashboard_path(),
            Self::VirtualStores => StoreKind::Virtual.dashboard_path(),
            Self::Storefront => "/",
        }
    }
}

/// Pick the landing page for a caller.
///
/// A user holding several roles lands on the most privileged one: admin,
/// then physical stores, then virtual stores.
#[must_use]
pub fn landing_for(auth: &AuthState) -> Landing {
    if !auth.is_authenticated() {
        return Landing::SignIn;
    }

    let flags = auth.flags();
    if flags.is_system_admin() {
        Landing::AdminDashboard
    } else if flags.is_physical_store_owner() {
        Landing::PhysicalStores
    } else if flags.is_virtual_store_owner() {
        Landing::VirtualStores
    } else {
        Landing::Storefront
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::LabelSet;

    fn user(id: &str, labels: &[&str]) -> Identity {
        Identity::new(
            UserId::parse(id).unwrap(),
            LabelSet::parse_many(labels).unwrap(),
        )
    }

    fn store(kind: StoreKind, owner: &str) -> Store {
        Store {
            id: StoreId::parse("store1").unwrap(),
            kind,
            owner_id: UserId::parse(owner).unwrap(),
            name: "Corner Shop".to_string(),
        }
    }

    #[test]
    fn test_anonymous_is_unauthenticated() {
        let shop = store(StoreKind::Physical, "owner1");
        assert_eq!(
            decide_store_access(None, &shop),
            AccessDecision::Unauthenticated
        );
    }

    #[test]
    fn test_owner_with_matching_role_is_allowed() {
        let shop = store(StoreKind::Physical, "owner1");
        let owner = user("owner1", &["physicalStoreOwner"]);
        assert_eq!(
            decide_store_access(Some(&owner), &shop),
            AccessDecision::Allowed
        );
    }

    #[test]
    fn test_owner_of_other_store_is_forbidden() {
        let shop = store(StoreKind::Physical, "owner1");
        let other = user("owner2", &["physicalStoreOwner"]);
        assert_eq!(
            decide_store_access(Some(&other), &shop),
            AccessDecision::Forbidden
        );
    }

    #[test]
    fn test_wrong_kind_role_is_forbidden() {
        let shop = store(StoreKind::Virtual, "owner1");
        let owner = user("owner1", &["physicalStoreOwner"]);
        assert_eq!(
            decide_store_access(Some(&owner), &shop),
            AccessDecision::Forbidden
        );
    }

    #[test]
    fn test_recorded_owner_without_label_is_forbidden() {
        let shop = store(StoreKind::Virtual, "owner1");
        let owner = user("owner1", &[]);
        assert_eq!(
            decide_store_access(Some(&owner), &shop),
            AccessDecision::Forbidden
        );
    }

    #[test]
    fn test_system_admin_sees_every_store() {
        let admin = user("admin1", &["superAdmin"]);
        for kind in [StoreKind::Physical, StoreKind::Virtual] {
            assert_eq!(
                decide_store_access(Some(&admin), &store(kind, "owner1")),
                AccessDecision::Allowed
            );
        }
    }

    #[test]
    fn test_landing_priority() {
        let cases = [
            (None, Landing::SignIn),
            (Some(user("u", &[])), Landing::Storefront),
            (Some(user("u", &["virtualStoreOwner"])), Landing::VirtualStores),
            (
                Some(user("u", &["virtualStoreOwner", "physicalStoreOwner"])),
                Landing::PhysicalStores,
            ),
            (
                Some(user("u", &["physicalStoreOwner", "superAdmin"])),
                Landing::AdminDashboard,
            ),
        ];

        for (identity, expected) in cases {
            assert_eq!(landing_for(&AuthState::new(identity)), expected);
        }
    }

    #[test]
    fn test_landing_paths() {
        assert_eq!(Landing::SignIn.path(), "/sign-in");
        assert_eq!(Landing::PhysicalStores.path(), "/dashboard/physical-stores");
        assert_eq!(Landing::VirtualStores.path(), "/dashboard/virtual-stores");
    }
}
