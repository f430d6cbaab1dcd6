//! RocketShoes cart library.
//!
//! Holds the shopper's cart in memory, validates every change against the
//! remote stock service and mirrors the result to a durable snapshot.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rocketshoes_cart::{CartConfig, CartStore, FileStorage, HttpStoreClient};
//!
//! let config = CartConfig::from_env()?;
//! let client = Arc::new(HttpStoreClient::new(&config.api)?);
//! let storage = Arc::new(FileStorage::new(&config.storage_dir)?);
//! let store = CartStore::new(client.clone(), client, storage);
//!
//! store.add_product(ProductId::new(1)).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod notification;
pub mod snapshot;
pub mod storage;
pub mod store;

pub use api::{ApiError, HttpStoreClient, ProductCatalog, StockService};
pub use config::{ApiConfig, CartConfig, ConfigError};
pub use error::CartError;
pub use notification::Notification;
pub use storage::{FileStorage, MemoryStorage, SnapshotStorage, StorageError};
pub use store::{CartStore, UpdateProductAmount};
