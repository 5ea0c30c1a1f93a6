//! Newtype IDs for type-safe identifiers.
//!
//! The storefront never mints these itself: they arrive in embedded page
//! data or in cart responses, sometimes as JSON numbers and sometimes as
//! strings. Both forms deserialize into the same newtype.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire form of an identifier. Product and variant ids are numeric in
/// embedded product JSON but strings everywhere else.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into_string()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<u64> for $name {
            fn from(n: u64) -> Self {
                Self(n.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Identifier of a product on the page.
    ProductId
);
define_id!(
    /// Identifier of one purchasable variant.
    VariantId
);
define_id!(
    /// Key of a cart line. Distinct from the variant id: the same variant
    /// with different line properties occupies two lines.
    ItemKey
);
define_id!(
    /// Identifier of an interactive element on the page.
    ElementId
);
define_id!(
    /// Identifier of a modal dialog.
    ModalId
);
