//! Newtype IDs for type-safe document references.
//!
//! Appwrite identifies users and documents with short strings rather than
//! integers. Use the `define_id!` macro to create validated wrappers that
//! prevent accidentally mixing IDs from different entity types.

/// Maximum length of an Appwrite document ID.
pub const MAX_ID_LENGTH: usize = 36;

/// Errors that can occur when parsing a document ID.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input string is empty.
    #[error("id cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The first character is a separator.
    #[error("id cannot start with '{0}'")]
    InvalidStart(char),
    /// The input contains a character outside `[A-Za-z0-9._-]`.
    #[error("id contains invalid character '{0}'")]
    InvalidChar(char),
}

/// Check a candidate ID against Appwrite's ID rules.
///
/// # Errors
///
/// Returns an error if the input is empty, longer than [`MAX_ID_LENGTH`],
/// starts with `.`, `-` or `_`, or contains characters other than ASCII
/// letters, digits, `.`, `-` and `_`.
pub fn validate_id(id: &str) -> Result<(), IdError> {
    let Some(first) = id.chars().next() else {
        return Err(IdError::Empty);
    };

    if id.len() > MAX_ID_LENGTH {
        return Err(IdError::TooLong { max: MAX_ID_LENGTH });
    }

    if matches!(first, '.' | '-' | '_') {
        return Err(IdError::InvalidStart(first));
    }

    if let Some(bad) = id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')))
    {
        return Err(IdError::InvalidChar(bad));
    }

    Ok(())
}

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` that validates on the way in
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `PartialOrd`, `Ord`, `Hash`
/// - `parse()`, `as_str()`, `FromStr`, `TryFrom<String>`, `AsRef<str>`
///
/// # Example
///
/// ```rust
/// # use bazaar_core::define_id;
/// define_id!(OrderId);
/// define_id!(ProductId);
///
/// let order_id = OrderId::parse("64f1c2").unwrap();
/// let product_id = ProductId::parse("64f1c2").unwrap();
///
/// // These are different types, so this won't compile:
/// // let _: OrderId = product_id;
/// assert_eq!(order_id.as_str(), product_id.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parse and validate an ID.
            ///
            /// # Errors
            ///
            /// Returns an error if the input violates the document ID rules.
            pub fn parse(id: &str) -> ::core::result::Result<Self, $crate::types::id::IdError> {
                $crate::types::id::validate_id(id)?;
                Ok(Self(id.to_owned()))
            }

            /// Get the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl ::core::convert::TryFrom<String> for $name {
            type Error = $crate::types::id::IdError;

            fn try_from(id: String) -> ::core::result::Result<Self, Self::Error> {
                $crate::types::id::validate_id(&id)?;
                Ok(Self(id))
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard document IDs
define_id!(UserId);
define_id!(StoreId);
