//! # Cart Aggregate
//!
//! The session-scoped shopping cart.
//!
//! ## Design
//! The cart is an explicit value owned by one shopper's session and passed
//! into the pipeline by reference - never an ambient global. The storage
//! layer persists its lines across visits (`bazaar-db`'s cart repository);
//! this module owns the mutation rules.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Storefront Action            Cart Change                               │
//! │  ─────────────────            ───────────                               │
//! │  Add to cart ───────────────► existing line: qty + 1 (≤ max_stock)     │
//! │                               new line: qty = 1                         │
//! │  Change quantity ───────────► qty ≤ 0 removes, else capped             │
//! │  Remove line ───────────────► line deleted (absent = no-op)            │
//! │  Clear ─────────────────────► all lines deleted                        │
//! │                                                                         │
//! │  Invariant: every retained line has quantity in [1, max_stock].        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Product;
use crate::MAX_CART_LINES;

// =============================================================================
// Cart Item
// =============================================================================

/// A line in the shopping cart.
///
/// ## Design Notes
/// - `product_id`: Reference to the product (for catalog lookup)
/// - Price fields are frozen copies taken when the line was added. They are
///   ADVISORY ONLY for display: the commit pipeline re-fetches authoritative
///   prices and never trusts these snapshots.
/// - `max_stock`: inventory level seen when the line was added; caps the
///   quantity a shopper can select.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product ID (UUID)
    pub product_id: String,

    /// SKU at time of adding (frozen)
    pub sku: String,

    /// Product name at time of adding (frozen)
    pub name: String,

    /// List price in paisa at time of adding (frozen, advisory)
    pub unit_price_paisa: i64,

    /// Sale price in paisa at time of adding, when discounted (frozen, advisory)
    pub discounted_price_paisa: Option<i64>,

    /// Shipping weight in grams at time of adding
    pub weight_grams: i64,

    /// Quantity in cart, always in [1, max_stock]
    pub quantity: i64,

    /// Stock level seen when the line was added; quantity cap
    pub max_stock: i64,

    /// When this line was added to the cart
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Creates a new cart line from a product, quantity 1.
    ///
    /// ## Price Freezing
    /// Prices are captured at this moment for display. The commit pipeline
    /// re-prices every line from the catalog, so a stale snapshot can never
    /// change what the shopper is charged.
    pub fn from_product(product: &Product, max_stock: i64) -> Self {
        CartItem {
            product_id: product.id.clone(),
            sku: product.sku.clone(),
            name: product.name.clone(),
            unit_price_paisa: product.price_paisa,
            discounted_price_paisa: product.discounted_price_paisa,
            weight_grams: product.weight_grams,
            quantity: 1,
            max_stock,
            added_at: Utc::now(),
        }
    }

    /// The price this line displays: sale price when present, else list price.
    #[inline]
    pub fn effective_price(&self) -> Money {
        Money::from_paisa(self.discounted_price_paisa.unwrap_or(self.unit_price_paisa))
    }

    /// Calculates the line total (effective price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.effective_price().multiply_quantity(self.quantity)
    }

    /// Calculates the line's shipping weight in grams.
    #[inline]
    pub fn line_weight_grams(&self) -> i64 {
        self.weight_grams * self.quantity
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product bumps quantity)
/// - Quantity is always in [1, max_stock]; a zero-quantity line never exists
/// - Maximum distinct lines: [`MAX_CART_LINES`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Lines in the cart
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Rebuilds a cart from persisted lines (storage layer load path).
    pub fn from_items(items: Vec<CartItem>) -> Self {
        Cart { items }
    }

    /// Adds a product to the cart.
    ///
    /// ## Behavior
    /// - Product already in cart: quantity + 1, capped at the line's
    ///   `max_stock` (silently - the storefront greys the button out)
    /// - Product not in cart: new line with quantity 1
    ///
    /// ## Arguments
    /// * `product` - catalog product being added
    /// * `max_stock` - inventory level seen at add time
    pub fn add_item(&mut self, product: &Product, max_stock: i64) -> Result<(), ValidationError> {
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            item.quantity = (item.quantity + 1).min(item.max_stock);
            return Ok(());
        }

        if self.items.len() >= MAX_CART_LINES {
            return Err(ValidationError::OutOfRange {
                field: "cart lines".to_string(),
                min: 0,
                max: MAX_CART_LINES as i64,
            });
        }

        self.items.push(CartItem::from_product(product, max_stock));
        Ok(())
    }

    /// Sets the quantity of a line.
    ///
    /// ## Behavior
    /// - `quantity <= 0`: removes the line (same as [`Cart::remove_item`])
    /// - otherwise: sets quantity capped at the line's `max_stock`
    /// - unknown product: no-op
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity = quantity.min(item.max_stock);
        }
    }

    /// Removes a line by product ID. Absent lines are a no-op.
    pub fn remove_item(&mut self, product_id: &str) {
        self.items.retain(|i| i.product_id != product_id);
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns the number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity across all lines.
    pub fn total_items(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Calculates the cart subtotal from the display snapshots
    /// (discounted price when present, else list price).
    pub fn total_price(&self) -> Money {
        self.items
            .iter()
            .fold(Money::zero(), |acc, i| acc + i.line_total())
    }

    /// Calculates the total shipping weight in grams.
    pub fn total_weight_grams(&self) -> i64 {
        self.items.iter().map(|i| i.line_weight_grams()).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Cart totals summary for storefront responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub total_items: i64,
    pub subtotal_paisa: i64,
    pub total_weight_grams: i64,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.line_count(),
            total_items: cart.total_items(),
            subtotal_paisa: cart.total_price().paisa(),
            total_weight_grams: cart.total_weight_grams(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(id: &str, price_paisa: i64, discounted: Option<i64>) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            sku: format!("SKU-{}", id),
            name: format!("Product {}", id),
            description: None,
            price_paisa,
            discounted_price_paisa: discounted,
            weight_grams: 500,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_add_item_inserts_with_quantity_one() {
        let mut cart = Cart::new();
        let product = test_product("1", 99_900, None);

        cart.add_item(&product, 10).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_items(), 1);
        assert_eq!(cart.total_price(), Money::from_paisa(99_900));
    }

    #[test]
    fn test_add_same_product_is_identity_idempotent() {
        let mut cart = Cart::new();
        let product = test_product("1", 99_900, None);

        cart.add_item(&product, 10).unwrap();
        cart.add_item(&product, 10).unwrap();

        // One line with quantity 2, never two lines
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_items(), 2);
    }

    #[test]
    fn test_add_caps_at_max_stock() {
        let mut cart = Cart::new();
        let product = test_product("1", 99_900, None);

        cart.add_item(&product, 2).unwrap();
        cart.add_item(&product, 2).unwrap();
        cart.add_item(&product, 2).unwrap();

        assert_eq!(cart.total_items(), 2);
    }

    #[test]
    fn test_total_price_prefers_discounted() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("1", 100_000, Some(80_000)), 5)
            .unwrap();
        cart.add_item(&test_product("2", 50_000, None), 5).unwrap();
        cart.update_quantity("2", 3);

        // 80,000 + 3 × 50,000
        assert_eq!(cart.total_price(), Money::from_paisa(230_000));
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let mut cart = Cart::new();
        let product = test_product("1", 99_900, None);

        cart.add_item(&product, 10).unwrap();
        cart.update_quantity("1", 0);

        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_caps_at_max_stock() {
        let mut cart = Cart::new();
        let product = test_product("1", 99_900, None);

        cart.add_item(&product, 4).unwrap();
        cart.update_quantity("1", 99);

        assert_eq!(cart.total_items(), 4);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        cart.remove_item("ghost");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total_weight() {
        let mut cart = Cart::new();
        let product = test_product("1", 99_900, None); // 500 g
        cart.add_item(&product, 10).unwrap();
        cart.update_quantity("1", 4);

        assert_eq!(cart.total_weight_grams(), 2_000);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("1", 99_900, None), 10).unwrap();
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_totals_summary() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("1", 100_000, Some(80_000)), 5)
            .unwrap();

        let totals = CartTotals::from(&cart);
        assert_eq!(totals.line_count, 1);
        assert_eq!(totals.total_items, 1);
        assert_eq!(totals.subtotal_paisa, 80_000);
        assert_eq!(totals.total_weight_grams, 500);
    }
}
