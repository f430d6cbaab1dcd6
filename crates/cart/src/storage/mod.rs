//! Durable key-value slots for the cart snapshot.
//!
//! The cart only ever uses one key, but backends store arbitrary string
//! values under arbitrary keys, the way browser local storage does.
//!
//! All methods take `&self`; backends use interior mutability.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend refused the operation.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// A string key-value store holding serialized snapshots.
pub trait SnapshotStorage: Send + Sync {
    /// Value stored under `key`, or `None` if the key was never written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value under `key` in a single step.
    ///
    /// # Errors
    ///
    /// Returns an error if the value could not be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
