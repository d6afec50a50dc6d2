//! # Validation Module
//!
//! Input validation for cart operations and stored snapshots.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation (UI / CLI)                                      │
//! │  └── Type parsing (amount is an integer, id is numeric)                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Caller amounts must be positive                                   │
//! │  └── Loaded snapshots must hold valid line items                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart transitions (cart.rs)                                   │
//! │  └── Stock bounds and uniqueness                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{LineItem, StockRecord};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest storage key accepted.
pub const MAX_STORAGE_KEY_LEN: usize = 128;

/// Validates a caller-supplied amount.
///
/// ## Rules
/// - Must be positive (> 0). Zero never means "remove".
///
/// ## Example
/// ```rust
/// use rocketcart_core::validation::validate_amount;
///
/// assert!(validate_amount(1).is_ok());
/// assert!(validate_amount(0).is_err());
/// assert!(validate_amount(-3).is_err());
/// ```
pub fn validate_amount(amount: i64) -> ValidationResult<()> {
    if amount <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

/// Validates a line item read from storage.
pub fn validate_line_item(item: &LineItem) -> ValidationResult<()> {
    validate_amount(item.amount)
}

/// Validates a stock record received from the inventory service.
pub fn validate_stock_record(stock: &StockRecord) -> ValidationResult<()> {
    if stock.amount < 0 {
        return Err(ValidationError::Negative {
            field: "stock amount".to_string(),
        });
    }

    Ok(())
}

/// Validates the namespace key the cart is stored under.
pub fn validate_storage_key(key: &str) -> ValidationResult<()> {
    if key.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "storage key".to_string(),
        });
    }

    if key.len() > MAX_STORAGE_KEY_LEN {
        return Err(ValidationError::TooLong {
            field: "storage key".to_string(),
            max: MAX_STORAGE_KEY_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
