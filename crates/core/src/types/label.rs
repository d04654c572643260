//! User labels and label sets.
//!
//! A label is a short tag the auth provider attaches to a user account
//! (`superAdmin`, `physicalStoreOwner`, ...). Labels are the only input role
//! resolution looks at.

use core::fmt;
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::collections::btree_set;

use serde::{Deserialize, Serialize};

use super::role::Role;

/// Errors that can occur when parsing a [`Label`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    /// The input string is empty.
    #[error("label cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("label must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a non-alphanumeric character.
    #[error("label must be alphanumeric, found '{0}'")]
    NonAlphanumeric(char),
}

/// A user label.
///
/// ## Constraints
///
/// - Length: 1-36 characters
/// - ASCII letters and digits only
///
/// Labels are compared case-sensitively: `superAdmin` and `superadmin` are
/// different labels.
///
/// ## Examples
///
/// ```
/// use bazaar_core::Label;
///
/// assert!(Label::parse("superAdmin").is_ok());
/// assert!(Label::parse("").is_err());
/// assert!(Label::parse("store-owner").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Label(String);

impl Label {
    /// Maximum length of a label.
    pub const MAX_LENGTH: usize = 36;

    /// Parse a `Label` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 36 characters, or
    /// contains anything other than ASCII letters and digits.
    pub fn parse(s: &str) -> Result<Self, LabelError> {
        Self::validate(s)?;
        Ok(Self(s.to_owned()))
    }

    fn validate(s: &str) -> Result<(), LabelError> {
        if s.is_empty() {
            return Err(LabelError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(LabelError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        match s.chars().find(|c| !c.is_ascii_alphanumeric()) {
            Some(c) => Err(LabelError::NonAlphanumeric(c)),
            None => Ok(()),
        }
    }

    /// Get the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Label {
    type Error = LabelError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::validate(&s)?;
        Ok(Self(s))
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.0
    }
}

impl From<Role> for Label {
    fn from(role: Role) -> Self {
        Self(role.label().to_owned())
    }
}

impl Borrow<str> for Label {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An ordered set of labels.
///
/// Serializes as a JSON array. Duplicates in the input collapse into one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSet(BTreeSet<Label>);

impl LabelSet {
    /// Create an empty label set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Parse every string in `labels`, stopping at the first invalid one.
    ///
    /// # Errors
    ///
    /// Returns the [`LabelError`] of the first label that fails to parse.
    pub fn parse_many<I, S>(labels: I) -> Result<Self, LabelError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        labels
            .into_iter()
            .map(|s| Label::parse(s.as_ref()))
            .collect()
    }

    /// Add a label. Returns `false` if it was already present.
    pub fn insert(&mut self, label: Label) -> bool {
        self.0.insert(label)
    }

    /// Whether `label` is in the set.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.0.contains(label)
    }

    /// Number of distinct labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set has no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over labels in sorted order.
    pub fn iter(&self) -> btree_set::Iter<'_, Label> {
        self.0.iter()
    }

    /// Whether the two sets share at least one label.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        !self.0.is_disjoint(&other.0)
    }

    /// Whether every label in `other` is also in `self`.
    ///
    /// Always true when `other` is empty.
    #[must_use]
    pub fn is_superset_of(&self, other: &Self) -> bool {
        self.0.is_superset(&other.0)
    }
}

impl FromIterator<Label> for LabelSet {
    fn from_iter<T: IntoIterator<Item = Label>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromIterator<Role> for LabelSet {
    fn from_iter<T: IntoIterator<Item = Role>>(iter: T) -> Self {
        iter.into_iter().map(Label::from).collect()
    }
}

impl Extend<Label> for LabelSet {
    fn extend<T: IntoIterator<Item = Label>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl<'a> IntoIterator for &'a LabelSet {
    type Item = &'a Label;
    type IntoIter = btree_set::Iter<'a, Label>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for LabelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, label) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(label.as_str())?;
        }
        f.write_str("]")
    }
}
