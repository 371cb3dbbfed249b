//! Newtype IDs for type-safe identifiers.
//!
//! The services are inconsistent about identifier types (numeric category
//! ids, hex document ids for listings), so every ID is stored as a string and
//! deserializes from either a JSON string or a JSON number.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A unique identifier.
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
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

            /// True for the empty ID.
            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
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

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                crate::de::id_string(d).map(Self)
            }
        }
    };
}

define_id!(SlideId);
define_id!(CategoryId);
define_id!(ListingId);
define_id!(SellerId);
define_id!(SectionId);

/// Numeric product identifier.
pub type ProductId = u64;

impl CategoryId {
    /// The id as a positive number, if it is one.
    pub fn as_positive(&self) -> Option<u64> {
        self.0.parse::<u64>().ok().filter(|n| *n > 0)
    }
}
