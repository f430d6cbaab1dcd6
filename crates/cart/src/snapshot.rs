//! Serialization boundary for the persisted cart.
//!
//! # Format
//!
//! Snapshots are written as a versioned envelope:
//!
//! ```json
//! { "version": 1, "saved_at": "2026-10-17T12:00:00Z", "items": [ { "id": 1, "amount": 2, ... } ] }
//! ```
//!
//! Loading also accepts a bare JSON array of line items, the format written
//! by earlier storefront builds. Anything that fails to decode or validate
//! loads as an empty cart.

use chrono::{DateTime, Utc};
use rocketshoes_core::{Cart, CartInvariantError, CartLineItem};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::storage::{SnapshotStorage, StorageError};

/// Storage key holding the cart snapshot.
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Current envelope version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Reasons a stored snapshot could not be turned back into a cart.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unsupported snapshot version {0}")]
    UnsupportedVersion(u32),

    #[error("Invalid cart: {0}")]
    Invalid(#[from] CartInvariantError),
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    saved_at: DateTime<Utc>,
    items: &'a Cart,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredSnapshot {
    Envelope {
        version: u32,
        #[allow(dead_code)]
        saved_at: Option<DateTime<Utc>>,
        items: Vec<CartLineItem>,
    },
    Legacy(Vec<CartLineItem>),
}

/// Encode `cart` as a snapshot envelope.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(cart: &Cart) -> Result<String, serde_json::Error> {
    serde_json::to_string(&EnvelopeRef {
        version: SNAPSHOT_VERSION,
        saved_at: Utc::now(),
        items: cart,
    })
}

/// Decode and validate a snapshot written by [`encode`] or a legacy array.
///
/// # Errors
///
/// Returns an error if the JSON is malformed, the version is unknown or the
/// items break a cart invariant.
pub fn decode(raw: &str) -> Result<Cart, SnapshotError> {
    let items = match serde_json::from_str::<StoredSnapshot>(raw)? {
        StoredSnapshot::Envelope { version, items, .. } => {
            if version != SNAPSHOT_VERSION {
                return Err(SnapshotError::UnsupportedVersion(version));
            }
            items
        }
        StoredSnapshot::Legacy(items) => items,
    };
    Ok(Cart::from_items(items)?)
}

/// Read the snapshot from `storage`.
///
/// Returns `Ok(None)` when nothing has been stored yet.
///
/// # Errors
///
/// Returns an error if storage cannot be read or the snapshot is invalid.
pub fn read(storage: &dyn SnapshotStorage) -> Result<Option<Cart>, SnapshotError> {
    storage
        .get(CART_STORAGE_KEY)?
        .map(|raw| decode(&raw))
        .transpose()
}

/// Load the initial cart, falling back to an empty cart on any failure.
pub fn load(storage: &dyn SnapshotStorage) -> Cart {
    match read(storage) {
        Ok(Some(cart)) => {
            debug!(items = cart.len(), "Restored cart from snapshot");
            cart
        }
        Ok(None) => Cart::new(),
        Err(e) => {
            warn!(error = %e, "Discarding unreadable cart snapshot");
            Cart::new()
        }
    }
}

/// Overwrite the stored snapshot with `cart`.
///
/// # Errors
///
/// Returns an error if the cart cannot be encoded or written.
pub fn save(storage: &dyn SnapshotStorage, cart: &Cart) -> Result<(), StorageError> {
    let raw = encode(cart).map_err(|e| StorageError::Unavailable(e.to_string()))?;
    storage.set(CART_STORAGE_KEY, &raw)
}
