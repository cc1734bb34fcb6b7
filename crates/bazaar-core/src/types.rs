//! # Domain Types
//!
//! Core domain types used throughout the Bazaar order pipeline.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Order       │   │    Coupon       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  sku (business) │   │  order_number   │   │  code (business)│       │
//! │  │  price_paisa    │   │  status         │   │  discount_type  │       │
//! │  │  weight_grams   │   │  total_paisa    │   │  used_count     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ InventoryCounter│   │   OrderStatus   │   │  DiscountType   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  product_id     │   │  Pending        │   │  Percentage     │       │
//! │  │  quantity ≥ 0   │   │  …              │   │  Fixed          │       │
//! │  └─────────────────┘   │  Cancelled      │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID: (sku, order_number, coupon code) - human-readable

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
///
/// Prices live in integer paisa; `price()` / `effective_price()` expose them
/// as [`Money`]. The `discounted_price_paisa` field, when set, is the price
/// shoppers actually pay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Display name shown in the storefront and on order lines.
    pub name: String,

    /// Optional description for product details.
    pub description: Option<String>,

    /// List price in paisa (smallest currency unit).
    pub price_paisa: i64,

    /// Sale price in paisa, when the product is discounted.
    pub discounted_price_paisa: Option<i64>,

    /// Shipping weight in grams.
    pub weight_grams: i64,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the list price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_paisa(self.price_paisa)
    }

    /// Returns the price shoppers pay: the sale price when present,
    /// otherwise the list price.
    #[inline]
    pub fn effective_price(&self) -> Money {
        Money::from_paisa(self.discounted_price_paisa.unwrap_or(self.price_paisa))
    }
}

// =============================================================================
// Inventory Counter
// =============================================================================

/// Per-product stock counter.
///
/// `quantity` never goes below zero: the storage layer decrements it with a
/// conditional single-statement update and reports insufficient stock as a
/// distinct failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryCounter {
    /// Product this counter belongs to (unique).
    pub product_id: String,

    /// Units currently available.
    pub quantity: i64,

    /// Back-office restock alert threshold.
    pub low_stock_threshold: i64,

    /// When the counter last changed.
    pub updated_at: DateTime<Utc>,
}

impl InventoryCounter {
    /// Checks whether the counter can satisfy a requested quantity.
    #[inline]
    pub fn can_satisfy(&self, requested: i64) -> bool {
        self.quantity >= requested
    }

    /// Checks whether the counter is at or below its restock threshold.
    #[inline]
    pub fn is_low(&self) -> bool {
        self.quantity <= self.low_stock_threshold
    }
}

// =============================================================================
// Coupon
// =============================================================================

/// How a coupon's `discount_value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// `discount_value` is a percentage of the order subtotal (0-100),
    /// optionally capped by `max_discount_paisa`.
    Percentage,
    /// `discount_value` is an absolute amount in paisa, applied verbatim.
    Fixed,
}

/// A discount coupon.
///
/// Codes are stored uppercase and matched case-insensitively. The validity
/// window is `[starts_at, ends_at]` with both bounds optional. Once
/// `usage_limit` is set, `used_count` never exceeds it - the storage layer
/// increments the counter conditionally.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Coupon {
    pub id: String,

    /// Business code, stored uppercase (e.g. "EID10").
    pub code: String,

    pub discount_type: DiscountType,

    /// Percent (0-100) for [`DiscountType::Percentage`], paisa for
    /// [`DiscountType::Fixed`].
    pub discount_value: i64,

    /// Minimum order subtotal required to redeem, in paisa.
    pub min_order_paisa: Option<i64>,

    /// Upper bound on a percentage discount, in paisa.
    pub max_discount_paisa: Option<i64>,

    /// Total number of redemptions allowed across all shoppers.
    pub usage_limit: Option<i64>,

    /// Redemptions so far.
    pub used_count: i64,

    /// Start of validity window.
    pub starts_at: Option<DateTime<Utc>>,

    /// End of validity window.
    pub ends_at: Option<DateTime<Utc>>,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Coupon {
    /// Checks whether the usage limit (if any) has been exhausted.
    #[inline]
    pub fn usage_exhausted(&self) -> bool {
        matches!(self.usage_limit, Some(limit) if self.used_count >= limit)
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The lifecycle status of an order.
///
/// Orders are created as `Pending` by the commit pipeline and only move
/// through [`OrderStatus::can_transition_to`] edges afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created by the commit pipeline, awaiting confirmation.
    Pending,
    /// Confirmed by the back office.
    Confirmed,
    /// Being picked and packed.
    Processing,
    /// Handed to the courier.
    Dispatched,
    /// Received by the customer.
    Delivered,
    /// Cancelled before dispatch.
    Cancelled,
}

impl OrderStatus {
    /// Returns the status as its storage string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Dispatched => "dispatched",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    ///
    /// ## Allowed Edges
    /// ```text
    /// Pending ──► Confirmed ──► Processing ──► Dispatched ──► Delivered
    ///    │             │             │
    ///    └─────────────┴─────────────┴──────► Cancelled
    /// ```
    /// Delivered and Cancelled are terminal.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Processing)
                | (Confirmed, Cancelled)
                | (Processing, Dispatched)
                | (Processing, Cancelled)
                | (Dispatched, Delivered)
        )
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

// =============================================================================
// Order
// =============================================================================

/// A persisted customer order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,
    /// Globally unique, human-decodable business number.
    pub order_number: String,
    pub user_id: String,
    pub status: OrderStatus,
    pub subtotal_paisa: i64,
    pub delivery_paisa: i64,
    pub discount_paisa: i64,
    pub total_paisa: i64,
    pub customer_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub city: String,
    pub address: String,
    pub address_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Returns the order total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_paisa(self.total_paisa)
    }

    /// Returns the order subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_paisa(self.subtotal_paisa)
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line item in a persisted order.
/// Uses snapshot pattern to freeze product data at time of purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    /// SKU at time of purchase (frozen).
    pub sku_snapshot: String,
    /// Product name at time of purchase (frozen).
    pub name_snapshot: String,
    /// Unit price in paisa at time of purchase (frozen).
    pub unit_price_paisa: i64,
    /// Quantity ordered.
    pub quantity: i64,
    /// Line total (unit_price × quantity).
    pub line_total_paisa: i64,
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_paisa(self.unit_price_paisa)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_paisa(self.line_total_paisa)
    }
}

// =============================================================================
// Customer Info
// =============================================================================

/// Contact and delivery details captured at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub city: String,
    pub address: String,
    /// Saved-address reference, when the shopper picked one.
    pub address_id: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_price_prefers_discount() {
        let now = Utc::now();
        let mut product = Product {
            id: "p1".to_string(),
            sku: "KURTA-M".to_string(),
            name: "Kurta (M)".to_string(),
            description: None,
            price_paisa: 250_000,
            discounted_price_paisa: Some(199_900),
            weight_grams: 400,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        assert_eq!(product.effective_price(), Money::from_paisa(199_900));

        product.discounted_price_paisa = None;
        assert_eq!(product.effective_price(), Money::from_paisa(250_000));
    }

    #[test]
    fn test_inventory_can_satisfy() {
        let counter = InventoryCounter {
            product_id: "p1".to_string(),
            quantity: 3,
            low_stock_threshold: 5,
            updated_at: Utc::now(),
        };

        assert!(counter.can_satisfy(3));
        assert!(!counter.can_satisfy(4));
        assert!(counter.is_low());
    }

    #[test]
    fn test_coupon_usage_exhausted() {
        let now = Utc::now();
        let mut coupon = Coupon {
            id: "c1".to_string(),
            code: "EID10".to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: 10,
            min_order_paisa: None,
            max_discount_paisa: None,
            usage_limit: Some(1),
            used_count: 1,
            starts_at: None,
            ends_at: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        assert!(coupon.usage_exhausted());

        coupon.used_count = 0;
        assert!(!coupon.usage_exhausted());

        coupon.usage_limit = None;
        coupon.used_count = 1_000;
        assert!(!coupon.usage_exhausted());
    }

    #[test]
    fn test_order_status_default() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_order_status_transitions() {
        use OrderStatus::*;

        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Dispatched));
        assert!(Dispatched.can_transition_to(Delivered));

        // No skipping ahead, no leaving terminal states
        assert!(!Pending.can_transition_to(Dispatched));
        assert!(!Dispatched.can_transition_to(Cancelled));
        assert!(!Delivered.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Pending));
    }
}
