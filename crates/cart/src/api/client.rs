//! HTTP implementation of the store API.

use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;
use rocketshoes_core::{Product, ProductId, StockInfo};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::cache::{CacheKey, CacheValue};
use super::{ApiError, ProductCatalog, StockService};
use crate::config::ApiConfig;

// =============================================================================
// HttpStoreClient
// =============================================================================

/// Client for the store's JSON REST API.
///
/// Cheap to clone; clones share the connection pool and the catalog cache.
#[derive(Clone)]
pub struct HttpStoreClient {
    inner: Arc<HttpStoreClientInner>,
}

struct HttpStoreClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl HttpStoreClient {
    /// Create a new store API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.catalog_cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(HttpStoreClientInner {
                client,
                base_url: config.base_url.clone(),
                cache,
            }),
        })
    }

    /// Drop every cached catalog entry.
    pub fn invalidate_catalog(&self) {
        self.inner.cache.invalidate_all();
    }

    /// GET a path below the base URL and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.inner.base_url.join(path)?;

        let response = self
            .inner
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                path,
                body = %body.chars().take(500).collect::<String>(),
                "Store API returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                path,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse store API response"
            );
            ApiError::Parse(e)
        })
    }
}

#[async_trait]
impl StockService for HttpStoreClient {
    #[instrument(skip(self))]
    async fn stock(&self, id: ProductId) -> Result<StockInfo, ApiError> {
        self.get_json(&format!("stock/{id}")).await
    }
}

#[async_trait]
impl ProductCatalog for HttpStoreClient {
    #[instrument(skip(self))]
    async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        let cache_key = CacheKey::Product(id);

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self.get_json(&format!("products/{id}")).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    #[instrument(skip(self))]
    async fn products(&self) -> Result<Vec<Product>, ApiError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for product list");
            return Ok(products);
        }

        let products: Vec<Product> = self.get_json("products").await?;

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use rocketshoes_core::Price;

    use super::*;

    #[derive(Default)]
    struct Hits {
        stock: AtomicUsize,
        product: AtomicUsize,
    }

    fn sneaker(id: u32) -> Product {
        Product {
            id: ProductId::new(id),
            title: "Tênis VR Caminhada Confortável Detalhes Couro Masculino".to_string(),
            price: Price::from_cents(13_990),
            image: format!("https://example.com/tenis{id}.jpg"),
        }
    }

    async fn stock(State(hits): State<Arc<Hits>>, Path(id): Path<u32>) -> impl IntoResponse {
        hits.stock.fetch_add(1, Ordering::SeqCst);
        match id {
            1 => Json(serde_json::json!({ "id": 1, "amount": 3 })).into_response(),
            2 => (StatusCode::OK, "not json").into_response(),
            3 => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
            4 => (StatusCode::TOO_MANY_REQUESTS, [("Retry-After", "7")], "slow down")
                .into_response(),
            _ => StatusCode::NOT_FOUND.into_response(),
        }
    }

    async fn product(State(hits): State<Arc<Hits>>, Path(id): Path<u32>) -> impl IntoResponse {
        hits.product.fetch_add(1, Ordering::SeqCst);
        Json(sneaker(id))
    }

    async fn products() -> Json<Vec<Product>> {
        Json(vec![sneaker(1), sneaker(2)])
    }

    async fn spawn_api() -> (HttpStoreClient, Arc<Hits>) {
        let hits = Arc::new(Hits::default());
        let app = Router::new()
            .route("/stock/{id}", get(stock))
            .route("/products", get(products))
            .route("/products/{id}", get(product))
            .with_state(hits.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = ApiConfig::new(&format!("http://{addr}")).unwrap();
        (HttpStoreClient::new(&config).unwrap(), hits)
    }

    #[tokio::test]
    async fn test_stock_is_fetched_on_every_call() {
        let (client, hits) = spawn_api().await;

        let first = client.stock(ProductId::new(1)).await.unwrap();
        let second = client.stock(ProductId::new(1)).await.unwrap();

        assert_eq!(first.amount, 3);
        assert_eq!(first, second);
        assert_eq!(hits.stock.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_product_metadata_is_cached() {
        let (client, hits) = spawn_api().await;

        let first = client.product(ProductId::new(5)).await.unwrap();
        let second = client.product(ProductId::new(5)).await.unwrap();

        assert_eq!(first, sneaker(5));
        assert_eq!(first, second);
        assert_eq!(hits.product.load(Ordering::SeqCst), 1);

        client.invalidate_catalog();
        client.product(ProductId::new(5)).await.unwrap();
        assert_eq!(hits.product.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_products_list() {
        let (client, _) = spawn_api().await;
        let list = client.products().await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].id, ProductId::new(2));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let (client, _) = spawn_api().await;
        let err = client.stock(ProductId::new(2)).await.unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[tokio::test]
    async fn test_server_error_is_status_error() {
        let (client, _) = spawn_api().await;
        let err = client.stock(ProductId::new(3)).await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 500, ref message } if message == "boom"));
    }

    #[tokio::test]
    async fn test_rate_limited_reads_retry_after() {
        let (client, _) = spawn_api().await;
        let err = client.stock(ProductId::new(4)).await.unwrap_err();
        assert!(matches!(err, ApiError::RateLimited(7)));
    }

    #[tokio::test]
    async fn test_missing_stock_is_not_found() {
        let (client, _) = spawn_api().await;
        let err = client.stock(ProductId::new(99)).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(ref path) if path == "stock/99"));
    }

    #[tokio::test]
    async fn test_unreachable_api_is_http_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = ApiConfig::new(&format!("http://{addr}")).unwrap();
        let client = HttpStoreClient::new(&config).unwrap();
        let err = client.stock(ProductId::new(1)).await.unwrap_err();
        assert!(matches!(err, ApiError::Http(_)));
    }
}
