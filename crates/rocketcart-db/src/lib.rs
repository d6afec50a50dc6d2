//! # rocketcart-db: Snapshot Store for RocketCart
//!
//! Persists the cart as one JSON snapshot per storage key in SQLite.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        rocketcart-db                                    │
//! │                                                                         │
//! │  ┌──────────────────┐    ┌──────────────────────┐                      │
//! │  │ SqliteCartStore  │───►│  SnapshotRepository  │                      │
//! │  │ (CartStore port) │    │  get / put / delete  │                      │
//! │  └──────────────────┘    └──────────┬───────────┘                      │
//! │                                     │                                   │
//! │  ┌──────────────────┐    ┌──────────▼───────────┐                      │
//! │  │    migrations    │───►│   Database (pool)    │                      │
//! │  └──────────────────┘    │   SQLite + WAL       │                      │
//! │                          └──────────────────────┘                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use rocketcart_db::{Database, DbConfig, SqliteCartStore};
//!
//! let db = Database::new(DbConfig::new("./cart.db")).await?;
//! let store = SqliteCartStore::new(db);
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::snapshot::{SnapshotRecord, SnapshotRepository};
pub use store::SqliteCartStore;
