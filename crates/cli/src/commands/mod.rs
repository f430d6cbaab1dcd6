//! CLI command implementations.

pub mod cart;
pub mod products;

use std::sync::Arc;

use rocketshoes_cart::{CartConfig, CartStore, FileStorage, HttpStoreClient};

/// Everything a command needs: the cart store and the catalog client.
pub struct Session {
    pub store: CartStore,
    pub client: HttpStoreClient,
}

impl Session {
    /// Wire the HTTP client and file storage described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the storage
    /// directory cannot be created.
    pub fn open(config: &CartConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let client = HttpStoreClient::new(&config.api)?;
        let storage = FileStorage::new(&config.storage_dir)?;

        let shared = Arc::new(client.clone());
        let store = CartStore::new(shared.clone(), shared, Arc::new(storage));

        Ok(Self { store, client })
    }
}
