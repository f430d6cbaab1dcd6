//! Store API: the remote stock service and product catalog.
//!
//! # Architecture
//!
//! - [`StockService`] and [`ProductCatalog`] are the seams the cart store
//!   depends on; both are read-only
//! - [`HttpStoreClient`] implements both over the JSON REST API using `reqwest`
//! - Product metadata is cached via `moka`; stock never is, since it is the
//!   authority the cart validates against
//!
//! # Endpoints
//!
//! - `GET /stock/{id}` -> `{ "id": 1, "amount": 3 }`
//! - `GET /products/{id}` -> `{ "id": 1, "title": "...", "price": 179.9, "image": "..." }`
//! - `GET /products` -> array of products

mod cache;
mod client;

pub use client::HttpStoreClient;

use async_trait::async_trait;
use rocketshoes_core::{Product, ProductId, StockInfo};
use thiserror::Error;

/// Errors that can occur when talking to the store API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Read-only lookup of available stock.
#[async_trait]
pub trait StockService: Send + Sync {
    /// Current stock for `id`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status or malformed body.
    async fn stock(&self, id: ProductId) -> Result<StockInfo, ApiError>;
}

/// Read-only lookup of product metadata.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Metadata for a single product.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status or malformed body.
    async fn product(&self, id: ProductId) -> Result<Product, ApiError>;

    /// Every product in the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status or malformed body.
    async fn products(&self) -> Result<Vec<Product>, ApiError>;
}
