//! # In-Memory Adapters
//!
//! Port implementations that keep everything in process. Used by the
//! controller tests and by embedders that bring their own I/O.
//!
//! Both adapters can be switched into a failing mode to exercise the
//! controller's error paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use rocketcart_core::{
    Cart, CartStore, CatalogLookup, LookupError, LookupResult, ProductId, ProductRecord,
    StockLookup, StockRecord, StoreError, StoreResult,
};
use tokio::sync::RwLock;

// =============================================================================
// Memory Cart Store
// =============================================================================

/// [`CartStore`] holding serialized snapshots in a map.
///
/// Snapshots are kept as JSON text, so a load exercises the same decoding a
/// real store does.
#[derive(Debug, Default)]
pub struct MemoryCartStore {
    snapshots: RwLock<HashMap<String, String>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a snapshot under `key`.
    pub fn with_cart(mut self, key: &str, cart: &Cart) -> StoreResult<Self> {
        let payload =
            serde_json::to_string(cart).map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        self.snapshots.get_mut().insert(key.to_string(), payload);
        Ok(self)
    }

    /// Seeds a raw payload under `key`, valid or not.
    pub fn with_raw(mut self, key: &str, payload: &str) -> Self {
        self.snapshots
            .get_mut()
            .insert(key.to_string(), payload.to_string());
        self
    }

    /// Makes every following `save` fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Returns the raw payload stored under `key`.
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.snapshots.read().await.get(key).cloned()
    }
}

#[async_trait]
impl CartStore for MemoryCartStore {
    async fn load(&self, key: &str) -> StoreResult<Option<Cart>> {
        let snapshots = self.snapshots.read().await;
        match snapshots.get(key) {
            Some(payload) => serde_json::from_str(payload)
                .map(Some)
                .map_err(|e| StoreError::Corrupt(e.to_string())),
            None => Ok(None),
        }
    }

    async fn save(&self, key: &str, cart: &Cart) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::WriteFailed("store is read-only".into()));
        }

        let payload =
            serde_json::to_string(cart).map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        self.snapshots.write().await.insert(key.to_string(), payload);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// =============================================================================
// Static Inventory
// =============================================================================

/// Stock and catalog lookups served from maps.
#[derive(Debug, Default)]
pub struct StaticInventory {
    stock: RwLock<HashMap<ProductId, i64>>,
    products: RwLock<HashMap<ProductId, ProductRecord>>,
    failing: AtomicBool,
    catalog_failing: AtomicBool,
    catalog_lookups: AtomicUsize,
}

impl StaticInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product with its stock.
    pub fn with_product(mut self, product: ProductRecord, stock: i64) -> Self {
        self.stock.get_mut().insert(product.id, stock);
        self.products.get_mut().insert(product.id, product);
        self
    }

    /// Changes the stock of a product.
    pub async fn set_stock(&self, product_id: ProductId, amount: i64) {
        self.stock.write().await.insert(product_id, amount);
    }

    /// Makes every following lookup fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Makes only the catalog lookups fail, leaving stock lookups working.
    pub fn set_catalog_failing(&self, failing: bool) {
        self.catalog_failing.store(failing, Ordering::SeqCst);
    }

    /// Number of catalog lookups served.
    pub fn catalog_lookups(&self) -> usize {
        self.catalog_lookups.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> LookupResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(LookupError::Transport("inventory offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl StockLookup for StaticInventory {
    async fn stock(&self, product_id: ProductId) -> LookupResult<StockRecord> {
        self.check_available()?;

        let amount = self
            .stock
            .read()
            .await
            .get(&product_id)
            .copied()
            .ok_or(LookupError::NotFound(product_id))?;

        Ok(StockRecord {
            id: product_id,
            amount,
        })
    }
}

#[async_trait]
impl CatalogLookup for StaticInventory {
    async fn product(&self, product_id: ProductId) -> LookupResult<ProductRecord> {
        self.check_available()?;
        if self.catalog_failing.load(Ordering::SeqCst) {
            return Err(LookupError::Status {
                resource: "products".into(),
                status: 500,
            });
        }
        self.catalog_lookups.fetch_add(1, Ordering::SeqCst);

        self.products
            .read()
            .await
            .get(&product_id)
            .cloned()
            .ok_or(LookupError::NotFound(product_id))
    }
}
