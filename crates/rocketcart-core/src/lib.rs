//! # rocketcart-core: Pure Cart Logic for RocketCart
//!
//! This crate is the **heart** of RocketCart. It decides what every cart
//! operation does, as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        RocketCart Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Storefront UI / CLI (presentation)                 │   │
//! │  │     Product grid ──► Cart page ──► Toasts                       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ CartHandle                             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             rocketcart-engine (CartController actor)            │   │
//! │  │    add_item, remove_item, set_item_amount, clear               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ rocketcart-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   cart    │  │   ports   │  │  notice   │  │   │
//! │  │   │ LineItem  │  │   Cart    │  │ StockLook │  │  Notice   │  │   │
//! │  │   │ StockRec  │  │ transitions│ │ CartStore │  │ Operation │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │         rocketcart-db (SQLite snapshot store)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Records (LineItem, ProductRecord, StockRecord, ProductId)
//! - [`cart`] - The immutable `Cart` snapshot and its transitions
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//! - [`notice`] - User-facing notices and operation names
//! - [`ports`] - Traits for the external collaborators
//!
//! ## Design Principles
//!
//! 1. **Snapshots, not mutation**: every transition returns a new `Cart`
//! 2. **Stock first**: no transition produces an amount above observed stock
//! 3. **Explicit Errors**: every rejection is a typed `CartError`
//!
//! ## Example Usage
//!
//! ```rust
//! use rocketcart_core::{Cart, ProductId, ProductRecord, StockRecord};
//!
//! let product = ProductRecord {
//!     id: ProductId::new(1),
//!     title: "Tênis de Caminhada Leve Confortável".to_string(),
//!     price: 179.9,
//!     image_url: "https://example.com/shoe.jpg".to_string(),
//! };
//! let stock = StockRecord { id: ProductId::new(1), amount: 3 };
//!
//! let cart = Cart::new().insert(&product, &stock).unwrap();
//! let cart = cart.increment(ProductId::new(1), &stock).unwrap();
//!
//! assert_eq!(cart.total_quantity(), 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod notice;
pub mod ports;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::Cart;
pub use error::{
    CartError, CartResult, ErrorCode, LookupError, LookupResult, StoreError, StoreResult,
    ValidationError,
};
pub use notice::{CartOperation, Notice, NoticeLevel};
pub use ports::{CartStore, CatalogLookup, NotificationSink, StockLookup};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Namespace key the cart snapshot is persisted under.
///
/// Kept identical to the key the storefront has always written, so carts
/// saved by earlier builds are picked up on first start.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";
