//! Label-based access resolution.
//!
//! Everything in this module is a pure function of an optional [`Identity`]
//! and a set of required labels:
//!
//! - [`resolve`] answers the boolean question "does this caller match?"
//! - [`RoleFlags`] and [`AuthState`] summarize a caller's well-known roles
//! - [`Requirement::decide`] turns the answer into the three-way
//!   [`AccessDecision`] every protected page branches on
//!
//! An absent identity never matches anything, whatever the mode.

use serde::{Deserialize, Serialize};

use crate::identity::Identity;
use crate::types::{Label, LabelSet, Role};

/// How a set of required labels is matched against an identity's labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchMode {
    /// At least one required label is present.
    #[default]
    AnyOf,
    /// Every required label is present. Vacuously true for an empty set.
    AllOf,
    /// No required label is present.
    NoneOf,
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AnyOf => write!(f, "anyOf"),
            Self::AllOf => write!(f, "allOf"),
            Self::NoneOf => write!(f, "noneOf"),
        }
    }
}

impl std::str::FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "anyOf" => Ok(Self::AnyOf),
            "allOf" => Ok(Self::AllOf),
            "noneOf" => Ok(Self::NoneOf),
            _ => Err(format!("invalid match mode: {s}")),
        }
    }
}

/// Check an identity's labels against `required` using `mode`.
///
/// Returns `false` whenever `identity` is `None`.
///
/// # Example
///
/// ```
/// use bazaar_core::{Identity, LabelSet, MatchMode, UserId, resolve};
///
/// let labels = LabelSet::parse_many(["superAdmin"]).unwrap();
/// let admin = Identity::new(UserId::parse("u1").unwrap(), labels.clone());
///
/// assert!(resolve(Some(&admin), &labels, MatchMode::AnyOf));
/// assert!(!resolve(None, &labels, MatchMode::NoneOf));
/// ```
#[must_use]
pub fn resolve(identity: Option<&Identity>, required: &LabelSet, mode: MatchMode) -> bool {
    let Some(identity) = identity else {
        return false;
    };

    match mode {
        MatchMode::AnyOf => identity.labels.intersects(required),
        MatchMode::AllOf => identity.labels.is_superset_of(required),
        MatchMode::NoneOf => !identity.labels.intersects(required),
    }
}

/// Per-request summary of a caller's well-known roles.
///
/// Fields are private and there is no `Deserialize`: the only way to obtain a
/// set flag is [`RoleFlags::from_identity`] on an identity carrying the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleFlags {
    is_system_admin: bool,
    is_physical_store_owner: bool,
    is_virtual_store_owner: bool,
}

impl RoleFlags {
    /// Derive flags from an identity's labels. Anonymous callers get no flags.
    #[must_use]
    pub fn from_identity(identity: Option<&Identity>) -> Self {
        let has = |role: Role| identity.is_some_and(|i| i.has_role(role));
        Self {
            is_system_admin: has(Role::SystemAdmin),
            is_physical_store_owner: has(Role::PhysicalStoreOwner),
            is_virtual_store_owner: has(Role::VirtualStoreOwner),
        }
    }

    #[must_use]
    pub const fn is_system_admin(&self) -> bool {
        self.is_system_admin
    }

    #[must_use]
    pub const fn is_physical_store_owner(&self) -> bool {
        self.is_physical_store_owner
    }

    #[must_use]
    pub const fn is_virtual_store_owner(&self) -> bool {
        self.is_virtual_store_owner
    }

    /// Owner of at least one kind of store.
    #[must_use]
    pub const fn is_store_owner(&self) -> bool {
        self.is_physical_store_owner || self.is_virtual_store_owner
    }

    /// Holds any well-known role at all.
    #[must_use]
    pub const fn is_privileged(&self) -> bool {
        self.is_system_admin || self.is_store_owner()
    }

    /// Whether the flag for `role` is set.
    #[must_use]
    pub const fn has(&self, role: Role) -> bool {
        match role {
            Role::SystemAdmin => self.is_system_admin,
            Role::PhysicalStoreOwner => self.is_physical_store_owner,
            Role::VirtualStoreOwner => self.is_virtual_store_owner,
        }
    }
}

/// The caller of the current request together with their role flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    identity: Option<Identity>,
    flags: RoleFlags,
}

impl AuthState {
    /// Build the auth state for an optional identity.
    #[must_use]
    pub fn new(identity: Option<Identity>) -> Self {
        let flags = RoleFlags::from_identity(identity.as_ref());
        Self { identity, flags }
    }

    /// An unauthenticated caller.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    #[must_use]
    pub const fn flags(&self) -> RoleFlags {
        self.flags
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Consume the state, keeping only the identity.
    #[must_use]
    pub fn into_identity(self) -> Option<Identity> {
        self.identity
    }
}

/// Outcome of gating a request.
///
/// Protected pages map these one-to-one onto: redirect to sign-in, show the
/// access-denied view, render the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessDecision {
    /// No identity: the caller must sign in.
    Unauthenticated,
    /// Signed in, but the labels do not satisfy the requirement.
    Forbidden,
    /// Signed in and the requirement is met.
    Allowed,
}

impl AccessDecision {
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// A set of labels plus the mode they are matched with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    labels: LabelSet,
    mode: MatchMode,
}

impl Requirement {
    #[must_use]
    pub const fn new(labels: LabelSet, mode: MatchMode) -> Self {
        Self { labels, mode }
    }

    /// Require at least one of `labels`.
    #[must_use]
    pub fn any_of(labels: impl IntoIterator<Item = Label>) -> Self {
        Self::new(labels.into_iter().collect(), MatchMode::AnyOf)
    }

    /// Require every one of `labels`.
    #[must_use]
    pub fn all_of(labels: impl IntoIterator<Item = Label>) -> Self {
        Self::new(labels.into_iter().collect(), MatchMode::AllOf)
    }

    /// Require none of `labels`.
    #[must_use]
    pub fn none_of(labels: impl IntoIterator<Item = Label>) -> Self {
        Self::new(labels.into_iter().collect(), MatchMode::NoneOf)
    }

    /// Require a single well-known role.
    #[must_use]
    pub fn role(role: Role) -> Self {
        Self::any_of([Label::from(role)])
    }

    /// Require at least one of `roles`.
    #[must_use]
    pub fn any_role(roles: impl IntoIterator<Item = Role>) -> Self {
        Self::new(roles.into_iter().collect(), MatchMode::AnyOf)
    }

    #[must_use]
    pub const fn labels(&self) -> &LabelSet {
        &self.labels
    }

    #[must_use]
    pub const fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Boolean check, see [`resolve`].
    #[must_use]
    pub fn check(&self, identity: Option<&Identity>) -> bool {
        resolve(identity, &self.labels, self.mode)
    }

    /// Three-way decision for a protected resource.
    #[must_use]
    pub fn decide(&self, identity: Option<&Identity>) -> AccessDecision {
        match identity {
            None => AccessDecision::Unauthenticated,
            Some(_) if self.check(identity) => AccessDecision::Allowed,
            Some(_) => AccessDecision::Forbidden,
        }
    }
}
