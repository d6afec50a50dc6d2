//! # Repository Module
//!
//! Database repository implementations for RocketCart.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SqliteCartStore                                                       │
//! │       │                                                                 │
//! │       │  db.snapshots().put(key, payload)                              │
//! │       ▼                                                                 │
//! │  SnapshotRepository                                                    │
//! │  ├── get(&self, key)                                                   │
//! │  ├── put(&self, key, payload)                                          │
//! │  ├── delete(&self, key)                                                │
//! │  └── count(&self)                                                      │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database (cart_snapshots)                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`SnapshotRepository`](snapshot::SnapshotRepository) - Raw cart snapshot rows

pub mod snapshot;
