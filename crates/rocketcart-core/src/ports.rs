//! # Ports
//!
//! Traits for everything the cart talks to but does not own.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Collaborator Ports                               │
//! │                                                                         │
//! │   CartController                                                        │
//! │        │                                                                │
//! │        ├──► StockLookup        GET /stock/{id}      (HttpInventory)     │
//! │        ├──► CatalogLookup      GET /products/{id}   (HttpInventory)     │
//! │        ├──► CartStore          load / save snapshot (SqliteCartStore)   │
//! │        └──► NotificationSink   info / error notice  (TracingNotifier)   │
//! │                                                                         │
//! │   In-memory versions of each live in rocketcart-engine::memory.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;

use crate::cart::Cart;
use crate::error::{LookupResult, StoreResult};
use crate::notice::Notice;
use crate::types::{ProductId, ProductRecord, StockRecord};

/// Reads the current stock of a product.
#[async_trait]
pub trait StockLookup: Send + Sync {
    /// Returns the stock record for `product_id`.
    async fn stock(&self, product_id: ProductId) -> LookupResult<StockRecord>;
}

/// Reads catalog data for a product.
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Returns the catalog record for `product_id`.
    async fn product(&self, product_id: ProductId) -> LookupResult<ProductRecord>;
}

/// Durable storage for the cart snapshot, keyed by namespace.
///
/// Implementations store the whole cart at once. `load` returns `Ok(None)`
/// when nothing has been saved under `key`, and `Err(StoreError::Corrupt)`
/// when something was saved but does not decode into a valid cart.
#[async_trait]
pub trait CartStore: Send + Sync {
    async fn load(&self, key: &str) -> StoreResult<Option<Cart>>;

    async fn save(&self, key: &str, cart: &Cart) -> StoreResult<()>;
}

/// Receives user-facing notices.
///
/// Called from the controller task, so implementations must not block.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notice: &Notice);
}
