//! # Domain Types
//!
//! Records exchanged between the cart and its collaborators.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  ProductRecord  │   │   StockRecord   │   │    LineItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  title          │   │  amount (≥ 0)   │   │  title, price   │       │
//! │  │  price          │   │                 │   │  image_url      │       │
//! │  │  image_url      │   │                 │   │  amount (≥ 1)   │       │
//! │  └────────┬────────┘   └─────────────────┘   └────────▲────────┘       │
//! │           │        catalog data + amount              │                │
//! │           └───────────────────────────────────────────┘                │
//! │                                                                         │
//! │  ProductRecord and StockRecord are owned by external services.         │
//! │  LineItem is owned by the cart (frozen copy of catalog data).          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Field names follow the storefront API (`image`, not `image_url`), so the
//! same structs decode HTTP responses and persisted snapshots.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CartError, CartResult};

// =============================================================================
// Product ID
// =============================================================================

/// Identifier of a catalog product.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct ProductId(u64);

impl ProductId {
    /// Creates a product ID.
    #[inline]
    pub const fn new(id: u64) -> Self {
        ProductId(id)
    }

    /// Returns the raw numeric ID.
    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        ProductId(id)
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProductId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(ProductId)
    }
}

// =============================================================================
// Product Record
// =============================================================================

/// Catalog data for a product, as served by the catalog service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductRecord {
    pub id: ProductId,

    /// Display name.
    pub title: String,

    /// Unit price as published by the catalog. Carried, never computed on.
    pub price: f64,

    /// Product image URL.
    #[serde(rename = "image")]
    pub image_url: String,
}

// =============================================================================
// Stock Record
// =============================================================================

/// Available quantity of a product, as served by the inventory service.
///
/// The cart never writes stock. A record is a point-in-time observation used
/// to bound the amount of one mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockRecord {
    pub id: ProductId,

    /// Units available. Zero means sold out.
    pub amount: i64,
}

impl StockRecord {
    /// Checks that `requested` units are covered by this record.
    ///
    /// ## Returns
    /// * `Ok(())` - `requested <= amount`
    /// * `Err(CartError::StockExceeded)` - otherwise
    pub fn ensure_covers(&self, requested: i64) -> CartResult<()> {
        if requested > self.amount {
            return Err(CartError::StockExceeded {
                product_id: self.id,
                available: self.amount,
                requested,
            });
        }

        Ok(())
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One product in the cart plus the requested quantity.
///
/// ## Snapshot Pattern
/// Title, price and image are copied from the [`ProductRecord`] when the
/// product is first added. Later catalog changes do not alter the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Product ID, unique within a cart.
    pub id: ProductId,

    /// Title at time of adding (frozen).
    pub title: String,

    /// Price at time of adding (frozen).
    pub price: f64,

    /// Image URL at time of adding (frozen).
    #[serde(rename = "image")]
    pub image_url: String,

    /// Requested quantity, always >= 1.
    pub amount: i64,
}

impl LineItem {
    /// Creates a line item from catalog data and an amount.
    pub fn from_product(product: &ProductRecord, amount: i64) -> Self {
        LineItem {
            id: product.id,
            title: product.title.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            amount,
        }
    }

    /// Returns a copy of this item with a different amount.
    pub fn with_amount(&self, amount: i64) -> Self {
        LineItem {
            amount,
            ..self.clone()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
