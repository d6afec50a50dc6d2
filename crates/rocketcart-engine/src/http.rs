//! # HTTP Inventory Client
//!
//! One `reqwest` client serving both lookup ports against the storefront API.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  StockLookup::stock(7)     ──► GET {base}/stock/7     → { id, amount }  │
//! │  CatalogLookup::product(7) ──► GET {base}/products/7  → { id, title,    │
//! │                                                          price, image } │
//! │                                                                         │
//! │  404            → LookupError::NotFound                                 │
//! │  other non-2xx  → LookupError::Status                                   │
//! │  bad body       → LookupError::Decode                                   │
//! │  no connection  → LookupError::Transport                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no retry here. A failed lookup fails the cart operation.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use rocketcart_core::{
    CatalogLookup, LookupError, LookupResult, ProductId, ProductRecord, StockLookup, StockRecord,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::InventorySettings;
use crate::error::EngineResult;

/// Client for the stock and catalog endpoints.
#[derive(Clone)]
pub struct HttpInventory {
    inner: Arc<HttpInventoryInner>,
}

struct HttpInventoryInner {
    client: reqwest::Client,
    base_url: String,
}

impl HttpInventory {
    /// Builds a client from the inventory settings.
    ///
    /// The settings are expected to have passed `EngineConfig::validate`.
    pub fn new(settings: &InventorySettings) -> EngineResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()?;

        Ok(HttpInventory {
            inner: Arc::new(HttpInventoryInner {
                client,
                base_url: settings.base_url.trim_end_matches('/').to_string(),
            }),
        })
    }

    /// Returns the base URL requests are made against.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    async fn get<T: DeserializeOwned>(
        &self,
        resource: &str,
        product_id: ProductId,
    ) -> LookupResult<T> {
        let url = format!("{}/{}/{}", self.inner.base_url, resource, product_id);
        debug!(url = %url, "Inventory request");

        let response = self
            .inner
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        self.handle_response(response, resource, product_id).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        resource: &str,
        product_id: ProductId,
    ) -> LookupResult<T> {
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound(product_id));
        }

        if !status.is_success() {
            return Err(LookupError::Status {
                resource: resource.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        serde_json::from_str(&body)
            .map_err(|e| LookupError::Decode(format!("{} {}: {}", resource, product_id, e)))
    }
}

#[async_trait]
impl StockLookup for HttpInventory {
    async fn stock(&self, product_id: ProductId) -> LookupResult<StockRecord> {
        self.get("stock", product_id).await
    }
}

#[async_trait]
impl CatalogLookup for HttpInventory {
    async fn product(&self, product_id: ProductId) -> LookupResult<ProductRecord> {
        self.get("products", product_id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
