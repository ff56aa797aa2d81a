//! Opaque product identifiers.
//!
//! The document store assigns identifiers on insert. Core never interprets
//! them; it only carries the store's canonical string form (a 24-character
//! hex `ObjectId` for MongoDB).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Store-assigned identifier of a [`Product`](crate::Product).
///
/// # Example
///
/// ```rust
/// # use nextshop_core::ProductId;
/// let id = ProductId::new("65f0c0ffee00000000000001");
/// assert_eq!(id.as_str(), "65f0c0ffee00000000000001");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create an ID from the store's string representation.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
