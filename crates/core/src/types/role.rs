//! Well-known marketplace roles.

use serde::{Deserialize, Serialize};

/// A role granted through a user label.
///
/// Each role is backed by exactly one label string; the label is the source
/// of truth and the role is only a typed name for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Operator of the whole marketplace.
    #[serde(rename = "superAdmin")]
    SystemAdmin,
    /// Owner of one or more brick-and-mortar stores.
    #[serde(rename = "physicalStoreOwner")]
    PhysicalStoreOwner,
    /// Owner of one or more online-only stores.
    #[serde(rename = "virtualStoreOwner")]
    VirtualStoreOwner,
}

impl Role {
    /// Every role, in descending privilege order.
    pub const ALL: [Self; 3] = [
        Self::SystemAdmin,
        Self::PhysicalStoreOwner,
        Self::VirtualStoreOwner,
    ];

    /// The label that grants this role.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SystemAdmin => "superAdmin",
            Self::PhysicalStoreOwner => "physicalStoreOwner",
            Self::VirtualStoreOwner => "virtualStoreOwner",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.label() == s)
            .ok_or_else(|| format!("invalid role label: {s}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_label_round_trips_through_from_str() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_label_is_not_a_role() {
        assert!("customer".parse::<Role>().is_err());
        assert!("SuperAdmin".parse::<Role>().is_err());
    }

    #[test]
    fn test_serde_uses_label() {
        assert_eq!(
            serde_json::to_string(&Role::PhysicalStoreOwner).unwrap(),
            "\"physicalStoreOwner\""
        );
    }
}
