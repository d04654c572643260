//! The authenticated user record.
//!
//! An [`Identity`] is what the auth provider hands back for a valid session.
//! It is owned by the provider: nothing in Bazaar mutates it.

use serde::{Deserialize, Deserializer, Serialize};

use crate::access::RoleFlags;
use crate::types::{LabelSet, Role, UserId};

/// Errors raised when an identity payload cannot be trusted.
#[derive(thiserror::Error, Debug)]
pub enum IdentityError {
    /// The payload is not valid JSON, lacks `$id` or `labels`, or carries an
    /// invalid id or label.
    #[error("malformed identity payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// An authenticated user.
///
/// Deserializes from the account document returned by the auth provider.
/// `labels` is required: a payload without it is rejected rather than treated
/// as an unprivileged user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider-assigned user ID.
    #[serde(rename = "$id")]
    pub id: UserId,
    /// Display name (may be empty).
    #[serde(default)]
    pub name: String,
    /// Email address, if the account has one.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub email: Option<String>,
    /// Role and capability labels.
    pub labels: LabelSet,
}

impl Identity {
    /// Create an identity with no name or email.
    #[must_use]
    pub fn new(id: UserId, labels: LabelSet) -> Self {
        Self {
            id,
            name: String::new(),
            email: None,
            labels,
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Parse an identity from the provider's JSON account payload.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Malformed`] if the payload is missing `$id`
    /// or `labels`, or contains an invalid ID or label.
    pub fn from_json(payload: &str) -> Result<Self, IdentityError> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Whether the identity carries `label`.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    /// Whether the identity carries the label for `role`.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.has_label(role.label())
    }

    /// Role flags derived from this identity's labels.
    #[must_use]
    pub fn role_flags(&self) -> RoleFlags {
        RoleFlags::from_identity(Some(self))
    }

    /// Name to show in the UI, falling back to email and then the ID.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if !self.name.trim().is_empty() {
            return &self.name;
        }
        self.email.as_deref().unwrap_or_else(|| self.id.as_str())
    }
}

/// The provider sends `""` for accounts without an email.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
