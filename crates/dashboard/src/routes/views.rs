//! View models shared by page templates.

use bazaar_core::{Identity, RoleFlags, Store};

/// The signed-in user as shown in page headers.
#[derive(Debug, Clone)]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub labels: Vec<String>,
    pub flags: RoleFlags,
}

impl From<&Identity> for UserView {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.to_string(),
            name: identity.display_name().to_string(),
            email: identity.email.clone(),
            labels: identity.labels.iter().map(ToString::to_string).collect(),
            flags: identity.role_flags(),
        }
    }
}

/// A store row or header.
#[derive(Debug, Clone)]
pub struct StoreView {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub owner_id: String,
    pub url: String,
}

impl From<&Store> for StoreView {
    fn from(store: &Store) -> Self {
        let name = if store.name.trim().is_empty() {
            store.id.to_string()
        } else {
            store.name.clone()
        };

        Self {
            id: store.id.to_string(),
            name,
            kind: store.kind.to_string(),
            owner_id: store.owner_id.to_string(),
            url: format!("{}/{}", store.kind.dashboard_path(), store.id),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::{LabelSet, StoreId, StoreKind, UserId};

    use super::*;

    #[test]
    fn test_user_view_from_identity() {
        let identity = Identity::new(
            UserId::parse("u1").unwrap(),
            LabelSet::parse_many(["superAdmin", "beta"]).unwrap(),
        )
        .with_name("Ada");

        let view = UserView::from(&identity);
        assert_eq!(view.name, "Ada");
        assert_eq!(view.labels, vec!["beta", "superAdmin"]);
        assert!(view.flags.is_system_admin());
    }

    #[test]
    fn test_store_view_url_and_name_fallback() {
        let store = Store {
            id: StoreId::parse("s1").unwrap(),
            kind: StoreKind::Physical,
            owner_id: UserId::parse("u1").unwrap(),
            name: "  ".to_string(),
        };

        let view = StoreView::from(&store);
        assert_eq!(view.name, "s1");
        assert_eq!(view.kind, "physical");
        assert_eq!(view.url, "/dashboard/physical-stores/s1");
    }
}
