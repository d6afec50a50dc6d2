//! # Cart
//!
//! The immutable cart snapshot and every transition on it.
//!
//! ## Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Transitions                                     │
//! │                                                                         │
//! │  Operation            Transition               Rejections               │
//! │  ─────────            ──────────               ──────────               │
//! │                                                                         │
//! │  add (new product) ──► insert(product, stock) ─► StockExceeded          │
//! │                                                  DuplicateItem          │
//! │                                                                         │
//! │  add (in cart) ──────► increment(id, stock) ───► StockExceeded          │
//! │                                                  NotFoundInCart         │
//! │                                                                         │
//! │  set amount ─────────► set_amount(id, n, stock) ► InvalidAmount         │
//! │                                                  StockExceeded          │
//! │                                                  NotFoundInCart         │
//! │                                                                         │
//! │  remove ─────────────► remove(id) ─────────────► NotFoundInCart         │
//! │                                                                         │
//! │  NOTE: Every transition borrows `self` and returns a NEW cart.          │
//! │        A rejected transition leaves nothing half-applied.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Items are unique by product ID
//! - Every amount is >= 1
//! - Every amount is <= the stock observed when it was last changed
//! - Insertion order is display order

use serde::{Deserialize, Serialize};

use crate::error::{CartError, CartResult};
use crate::types::{LineItem, ProductId, ProductRecord, StockRecord};
use crate::validation::{validate_amount, validate_line_item};

/// The shopping cart.
///
/// ## Serialization
/// A cart serializes as a plain JSON array of line items. Deserialization
/// goes through [`Cart::from_items`], so a decoded cart always satisfies the
/// invariants above (minus the stock bound, which only holds at mutation time).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Builds a cart from stored items, checking uniqueness and amounts.
    pub fn from_items(items: Vec<LineItem>) -> CartResult<Self> {
        for (index, item) in items.iter().enumerate() {
            validate_line_item(item)?;

            if items[..index].iter().any(|other| other.id == item.id) {
                return Err(CartError::DuplicateItem(item.id));
            }
        }

        Ok(Cart { items })
    }

    /// Items in display order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Returns the line item for a product, if present.
    pub fn get(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == product_id)
    }

    /// Checks whether a product is in the cart.
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Returns the number of distinct products.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the sum of all amounts.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.amount).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Appends a new product with amount 1.
    ///
    /// ## Behavior
    /// - Stock must cover one unit
    /// - The product must not already be in the cart
    pub fn insert(&self, product: &ProductRecord, stock: &StockRecord) -> CartResult<Cart> {
        if self.contains(product.id) {
            return Err(CartError::DuplicateItem(product.id));
        }

        stock.ensure_covers(1)?;

        let mut items = self.items.clone();
        items.push(LineItem::from_product(product, 1));
        Ok(Cart { items })
    }

    /// Raises the amount of an existing item by one.
    ///
    /// ## Behavior
    /// - Succeeds only while `stock.amount > current amount`
    /// - An amount already at `i64::MAX` is out of stock, never wrapped
    /// - Position in the cart is unchanged
    pub fn increment(&self, product_id: ProductId, stock: &StockRecord) -> CartResult<Cart> {
        let current = self
            .get(product_id)
            .ok_or(CartError::NotFoundInCart(product_id))?;

        let requested = current
            .amount
            .checked_add(1)
            .ok_or(CartError::StockExceeded {
                product_id,
                available: stock.amount,
                requested: i64::MAX,
            })?;
        stock.ensure_covers(requested)?;

        Ok(self.replace_amount(product_id, requested))
    }

    /// Sets the amount of an existing item to exactly `amount`.
    ///
    /// ## Check Order
    /// 1. `amount <= 0` → `InvalidAmount` (never deletes)
    /// 2. `amount > stock` → `StockExceeded`
    /// 3. product not in cart → `NotFoundInCart`
    pub fn set_amount(
        &self,
        product_id: ProductId,
        amount: i64,
        stock: &StockRecord,
    ) -> CartResult<Cart> {
        ensure_positive(amount)?;
        stock.ensure_covers(amount)?;

        if !self.contains(product_id) {
            return Err(CartError::NotFoundInCart(product_id));
        }

        Ok(self.replace_amount(product_id, amount))
    }

    /// Removes a product from the cart.
    pub fn remove(&self, product_id: ProductId) -> CartResult<Cart> {
        if !self.contains(product_id) {
            return Err(CartError::NotFoundInCart(product_id));
        }

        let items = self
            .items
            .iter()
            .filter(|i| i.id != product_id)
            .cloned()
            .collect();
        Ok(Cart { items })
    }

    fn replace_amount(&self, product_id: ProductId, amount: i64) -> Cart {
        let items = self
            .items
            .iter()
            .map(|i| {
                if i.id == product_id {
                    i.with_amount(amount)
                } else {
                    i.clone()
                }
            })
            .collect();
        Cart { items }
    }
}

/// Rejects caller amounts <= 0 with [`CartError::InvalidAmount`].
pub fn ensure_positive(amount: i64) -> CartResult<()> {
    validate_amount(amount).map_err(|_| CartError::InvalidAmount(amount))
}

impl TryFrom<Vec<LineItem>> for Cart {
    type Error = CartError;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        Cart::from_items(items)
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
