//! # SQLite Cart Store
//!
//! [`CartStore`] backed by the `cart_snapshots` table.
//!
//! ```text
//! save(key, cart) ──► serde_json::to_string(cart) ──► snapshots().put(key, json)
//! load(key) ──────► snapshots().get(key) ──► serde_json::from_str::<Cart>(payload)
//!                                             │
//!                                             └─ invalid cart → StoreError::Corrupt
//! ```

use async_trait::async_trait;
use rocketcart_core::{Cart, CartStore, StoreError, StoreResult};
use tracing::{debug, warn};

use crate::error::DbError;
use crate::pool::Database;

/// Cart snapshots persisted in SQLite.
#[derive(Debug, Clone)]
pub struct SqliteCartStore {
    db: Database,
}

impl SqliteCartStore {
    pub fn new(db: Database) -> Self {
        SqliteCartStore { db }
    }

    /// Returns the underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl CartStore for SqliteCartStore {
    async fn load(&self, key: &str) -> StoreResult<Option<Cart>> {
        let Some(record) = self.db.snapshots().get(key).await? else {
            debug!(key = %key, "No stored cart");
            return Ok(None);
        };

        let cart: Cart = serde_json::from_str(&record.payload).map_err(|e| {
            warn!(key = %key, error = %e, "Stored cart does not decode");
            StoreError::from(DbError::Payload(e.to_string()))
        })?;

        debug!(
            key = %key,
            items = cart.item_count(),
            updated_at = %record.updated_at,
            "Loaded stored cart"
        );
        Ok(Some(cart))
    }

    async fn save(&self, key: &str, cart: &Cart) -> StoreResult<()> {
        let payload =
            serde_json::to_string(cart).map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        self.db.snapshots().put(key, &payload).await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
