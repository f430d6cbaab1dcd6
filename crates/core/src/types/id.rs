//! Product identifier.
//!
//! Catalog and stock entries are keyed by a stable integer id. The newtype
//! keeps it from being confused with quantities, which are also integers.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing a [`ProductId`] from text.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid product id: {0:?}")]
pub struct ParseProductIdError(String);

/// Type-safe product identifier.
///
/// Serialized as a bare JSON number (`#[serde(transparent)]`), matching the
/// store API and the persisted cart snapshot.
///
/// # Example
///
/// ```rust
/// # use rocketshoes_core::ProductId;
/// let id: ProductId = "3".parse().unwrap();
/// assert_eq!(id, ProductId::new(3));
/// assert_eq!(id.to_string(), "3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u32);

impl ProductId {
    /// Create a new ID from a u32 value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the underlying u32 value.
    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for ProductId {
    type Err = ParseProductIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(Self)
            .map_err(|_| ParseProductIdError(s.to_string()))
    }
}

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<ProductId> for u32 {
    fn from(id: ProductId) -> Self {
        id.0
    }
}
