//! # rocketcart-engine: Cart Controller for RocketCart
//!
//! Runs the cart: a single controller task owns the current [`Cart`] and
//! applies `add_item`, `remove_item`, `set_item_amount` and `clear` in the
//! order they arrive.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        rocketcart-engine                                │
//! │                                                                         │
//! │   UI / CLI ──► CartHandle ──mpsc──► controller task ──► CartStore       │
//! │                    ▲                     │    │                         │
//! │                    └────── watch ────────┘    └──► StockLookup          │
//! │                                                    CatalogLookup        │
//! │                                                    NotificationSink     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`controller`] - `CartController`, `CartHandle`, `CartUpdate`
//! - [`config`] - TOML + environment configuration
//! - [`http`] - `HttpInventory` stock/catalog client
//! - [`notify`] - Notification sinks
//! - [`memory`] - In-memory store and inventory
//! - [`error`] - Engine errors
//!
//! ## Example
//! ```rust,ignore
//! let config = EngineConfig::load(None)?;
//! let inventory = Arc::new(HttpInventory::new(&config.inventory)?);
//! let db = Database::new(DbConfig::new(config.database_path())).await?;
//!
//! let cart = CartController::new(
//!     &config,
//!     inventory.clone(),
//!     inventory,
//!     Arc::new(SqliteCartStore::new(db)),
//!     Arc::new(TracingNotifier),
//! )
//! .start()
//! .await;
//!
//! cart.add_item(ProductId::new(1)).await?;
//! ```
//!
//! [`Cart`]: rocketcart_core::Cart

pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod memory;
pub mod notify;

pub use config::EngineConfig;
pub use controller::{CartController, CartHandle, CartUpdate};
pub use error::{EngineError, EngineResult};
pub use http::HttpInventory;
pub use memory::{MemoryCartStore, StaticInventory};
pub use notify::{ChannelNotifier, NoOpNotifier, TracingNotifier};
