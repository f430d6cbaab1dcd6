//! Integration tests for the RocketShoes cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! # Test Support
//!
//! [`FakeStoreApi`] serves `/stock/{id}`, `/products/{id}` and `/products`
//! from memory on an ephemeral local port, so the cart can be exercised
//! through its real HTTP client and file storage.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rocketshoes_cart::ApiConfig;
use rocketshoes_core::{Price, Product, ProductId, StockInfo};

#[derive(Default)]
struct Inventory {
    products: RwLock<HashMap<ProductId, Product>>,
    stock: RwLock<HashMap<ProductId, u32>>,
    offline: AtomicBool,
    stock_requests: AtomicUsize,
}

/// Handle to an in-process store API.
#[derive(Clone)]
pub struct FakeStoreApi {
    base_url: String,
    inventory: Arc<Inventory>,
}

impl FakeStoreApi {
    /// Start serving on `127.0.0.1` with an empty catalog.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn spawn() -> Self {
        let inventory = Arc::new(Inventory::default());

        let app = Router::new()
            .route("/stock/{id}", get(stock))
            .route("/products", get(products))
            .route("/products/{id}", get(product))
            .with_state(inventory.clone());

        #[allow(clippy::unwrap_used)]
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        #[allow(clippy::unwrap_used)]
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            inventory,
        }
    }

    /// Client configuration pointing at this server.
    ///
    /// # Panics
    ///
    /// Panics if the generated base URL does not parse.
    #[must_use]
    pub fn api_config(&self) -> ApiConfig {
        #[allow(clippy::unwrap_used)]
        ApiConfig::new(&self.base_url).unwrap()
    }

    /// Register a product with `stock` units available.
    pub fn stock_product(&self, id: u32, title: &str, cents: i64, stock: u32) {
        let id = ProductId::new(id);
        let product = Product {
            id,
            title: title.to_string(),
            price: Price::from_cents(cents),
            image: format!("https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis{id}.jpg"),
        };
        write(&self.inventory.products).insert(id, product);
        write(&self.inventory.stock).insert(id, stock);
    }

    /// Change the available stock of a product.
    pub fn set_stock(&self, id: u32, stock: u32) {
        write(&self.inventory.stock).insert(ProductId::new(id), stock);
    }

    /// Make every endpoint answer `503 Service Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.inventory.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of stock lookups served so far.
    #[must_use]
    pub fn stock_requests(&self) -> usize {
        self.inventory.stock_requests.load(Ordering::SeqCst)
    }
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn unavailable() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, "store api offline").into_response()
}

async fn stock(State(inventory): State<Arc<Inventory>>, Path(id): Path<u32>) -> Response {
    inventory.stock_requests.fetch_add(1, Ordering::SeqCst);
    if inventory.offline.load(Ordering::SeqCst) {
        return unavailable();
    }
    let id = ProductId::new(id);
    match read(&inventory.stock).get(&id) {
        Some(&amount) => Json(StockInfo { id, amount }).into_response(),
        None => (StatusCode::NOT_FOUND, Json(serde_json::json!({}))).into_response(),
    }
}

async fn product(State(inventory): State<Arc<Inventory>>, Path(id): Path<u32>) -> Response {
    if inventory.offline.load(Ordering::SeqCst) {
        return unavailable();
    }
    match read(&inventory.products).get(&ProductId::new(id)) {
        Some(product) => Json(product.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(serde_json::json!({}))).into_response(),
    }
}

async fn products(State(inventory): State<Arc<Inventory>>) -> Response {
    if inventory.offline.load(Ordering::SeqCst) {
        return unavailable();
    }
    let mut list: Vec<Product> = read(&inventory.products).values().cloned().collect();
    list.sort_by_key(|p| p.id);
    Json(list).into_response()
}
