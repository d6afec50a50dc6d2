//! # Error Types
//!
//! Domain-specific error types for rocketcart-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  rocketcart-core errors (this file)                                    │
//! │  ├── CartError        - Why a cart operation was rejected              │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  ├── LookupError      - Stock/catalog collaborator failures            │
//! │  └── StoreError       - Persistent store failures                      │
//! │                                                                         │
//! │  rocketcart-db errors                                                  │
//! │  └── DbError          - SQLite failures (→ StoreError)                 │
//! │                                                                         │
//! │  rocketcart-engine errors                                              │
//! │  └── EngineError      - Config, channels, HTTP client setup            │
//! │                                                                         │
//! │  Flow: LookupError / StoreError → CartError → Notice + ErrorCode       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product ID, amounts)
//! 3. Errors are enum variants, never String
//! 4. Each `CartError` maps to exactly one user-facing notice

use serde::Serialize;
use thiserror::Error;

use crate::notice::{CartOperation, Notice, OUT_OF_STOCK_MESSAGE};
use crate::types::ProductId;

// =============================================================================
// Cart Error
// =============================================================================

/// Why a cart operation did not change the cart.
///
/// Every variant leaves the current cart untouched. The controller turns the
/// error into a [`Notice`] via [`CartError::notice`] and also returns it to
/// the caller.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product is not in the cart.
    ///
    /// ## When This Occurs
    /// - `remove_item` for a product that was never added
    /// - `remove_item` twice in a row
    /// - `set_item_amount` for a product that was never added
    #[error("Product {0} is not in the cart")]
    NotFoundInCart(ProductId),

    /// The requested amount exceeds the observed stock.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart has 2× product 1, stock says 2
    ///      │
    ///      ▼
    /// add_item(1) → requested 3
    ///      │
    ///      ▼
    /// StockExceeded { product_id: 1, available: 2, requested: 3 }
    ///      │
    ///      ▼
    /// UI shows: "Requested quantity is out of stock"
    /// ```
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    StockExceeded {
        product_id: ProductId,
        available: i64,
        requested: i64,
    },

    /// Caller supplied an amount <= 0.
    #[error("Amount must be positive, got {0}")]
    InvalidAmount(i64),

    /// The product is already in the cart (a new item would break uniqueness).
    #[error("Product {0} is already in the cart")]
    DuplicateItem(ProductId),

    /// Stock or catalog lookup failed.
    #[error("Lookup failed: {0}")]
    Collaborator(#[from] LookupError),

    /// Writing the snapshot failed; nothing was published.
    #[error("Failed to persist cart: {0}")]
    Persistence(#[from] StoreError),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The controller task has stopped.
    #[error("Cart controller is not running")]
    ControllerClosed,
}

impl CartError {
    /// Returns the machine-readable code for this error.
    pub fn kind(&self) -> ErrorCode {
        match self {
            CartError::NotFoundInCart(_) => ErrorCode::NotFoundInCart,
            CartError::StockExceeded { .. } => ErrorCode::StockExceeded,
            CartError::InvalidAmount(_) => ErrorCode::InvalidAmount,
            CartError::DuplicateItem(_) | CartError::Validation(_) => ErrorCode::InvalidCart,
            CartError::Collaborator(_) => ErrorCode::CollaboratorFailure,
            CartError::Persistence(_) => ErrorCode::PersistenceFailure,
            CartError::ControllerClosed => ErrorCode::Unavailable,
        }
    }

    /// Returns the notice shown to the user when `operation` fails with this error.
    ///
    /// Stock problems get their own message; everything else reports the
    /// generic failure of the operation.
    pub fn notice(&self, operation: CartOperation) -> Notice {
        match self {
            CartError::StockExceeded { .. } => Notice::error(OUT_OF_STOCK_MESSAGE),
            _ => Notice::error(operation.failure_message()),
        }
    }
}

/// Error codes for presentation layers.
///
/// ## Usage in Frontend
/// ```typescript
/// switch (result.code) {
///   case 'STOCK_EXCEEDED': highlightStock(); break;
///   case 'COLLABORATOR_FAILURE': showRetry(); break;
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFoundInCart,
    StockExceeded,
    InvalidAmount,
    InvalidCart,
    CollaboratorFailure,
    PersistenceFailure,
    Unavailable,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            ErrorCode::NotFoundInCart => "NOT_FOUND_IN_CART",
            ErrorCode::StockExceeded => "STOCK_EXCEEDED",
            ErrorCode::InvalidAmount => "INVALID_AMOUNT",
            ErrorCode::InvalidCart => "INVALID_CART",
            ErrorCode::CollaboratorFailure => "COLLABORATOR_FAILURE",
            ErrorCode::PersistenceFailure => "PERSISTENCE_FAILURE",
            ErrorCode::Unavailable => "UNAVAILABLE",
        };
        f.write_str(code)
    }
}

// =============================================================================
// Collaborator Errors
// =============================================================================

/// Failure reported by a stock or catalog lookup.
///
/// The controller does not retry; every variant ends the operation.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Network or connection failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Service answered with a non-success status.
    #[error("{resource} returned HTTP {status}")]
    Status { resource: String, status: u16 },

    /// The product does not exist on the service.
    #[error("Product {0} not found")]
    NotFound(ProductId),

    /// Response body could not be decoded.
    #[error("Malformed response: {0}")]
    Decode(String),

    /// Response decoded but describes a different or impossible record.
    #[error("Invalid record: {0}")]
    Invalid(String),
}

/// Failure reported by a persistent cart store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store cannot be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Stored snapshot could not be decoded into a valid cart.
    #[error("Corrupt snapshot: {0}")]
    Corrupt(String),

    /// Write was rejected.
    #[error("Write failed: {0}")]
    WriteFailed(String),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CartError.
pub type CartResult<T> = Result<T, CartError>;

/// Result of a collaborator lookup.
pub type LookupResult<T> = Result<T, LookupError>;

/// Result of a store call.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
