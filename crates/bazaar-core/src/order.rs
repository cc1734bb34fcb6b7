//! # Order Assembler
//!
//! Builds the immutable order draft a commit consumes.
//!
//! ## Where The Draft Sits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Draft Assembly                                     │
//! │                                                                         │
//! │  cart lines ──► re-priced from catalog (authoritative)                  │
//! │                      │                                                  │
//! │  delivery quote ─────┤                                                  │
//! │                      ├──► assemble_draft() ──► OrderDraft               │
//! │  coupon discount ────┤         │                                        │
//! │                      │         └── consumed ONCE by the commit          │
//! │  customer info ──────┘             pipeline in bazaar-db                │
//! │                                                                         │
//! │  total = subtotal − discount + delivery, floored at zero               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cart price snapshots never reach this module: the caller re-fetches every
//! product and passes the authoritative record, so a stale client-side price
//! cannot change what the shopper is charged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::coupon::CouponDiscount;
use crate::delivery::DeliveryQuote;
use crate::error::DraftError;
use crate::money::Money;
use crate::types::{CustomerInfo, Product};

// =============================================================================
// Draft Types
// =============================================================================

/// A line snapshot on an order draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraftItem {
    pub product_id: String,
    pub sku: String,
    pub name: String,
    /// Authoritative unit price in paisa (re-fetched, not the cart snapshot).
    pub unit_price_paisa: i64,
    pub quantity: i64,
    pub line_total_paisa: i64,
    /// Line shipping weight in grams, kept for audit of the delivery fee.
    pub weight_grams: i64,
}

/// The computed, not-yet-persisted proposal for an order.
///
/// Immutable by convention: produced here, consumed exactly once by the
/// commit pipeline, never edited in between.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    /// Pre-generated business number; the commit step regenerates it on a
    /// uniqueness collision.
    pub order_number: String,
    pub user_id: String,
    pub items: Vec<OrderDraftItem>,
    pub subtotal_paisa: i64,
    pub delivery_paisa: i64,
    pub discount_paisa: i64,
    /// subtotal − discount + delivery, floored at zero.
    pub total_paisa: i64,
    pub customer: CustomerInfo,
    /// The validated coupon backing `discount_paisa`, when one was applied.
    pub coupon: Option<CouponDiscount>,
    pub created_at: DateTime<Utc>,
}

impl OrderDraft {
    /// Returns the draft total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_paisa(self.total_paisa)
    }
}

// =============================================================================
// Assembler
// =============================================================================

/// Assembles an immutable order draft.
///
/// ## Arguments
/// * `user_id` - owning shopper
/// * `lines` - `(authoritative product, quantity)` pairs; prices are taken
///   from the product records, NEVER from cart snapshots
/// * `delivery` - quote from [`crate::delivery::calculate_delivery_cost`]
/// * `discount` - validated coupon, if any
/// * `customer` - contact and delivery details
/// * `now` - assembly instant (feeds the order number)
///
/// ## Errors
/// * [`DraftError::EmptyCart`] - no lines to order
pub fn assemble_draft(
    user_id: &str,
    lines: &[(Product, i64)],
    delivery: &DeliveryQuote,
    discount: Option<CouponDiscount>,
    customer: CustomerInfo,
    now: DateTime<Utc>,
) -> Result<OrderDraft, DraftError> {
    if lines.is_empty() {
        return Err(DraftError::EmptyCart);
    }

    let mut items = Vec::with_capacity(lines.len());
    let mut subtotal = Money::zero();

    for (product, quantity) in lines {
        let unit_price = product.effective_price();
        let line_total = unit_price.multiply_quantity(*quantity);
        subtotal += line_total;

        items.push(OrderDraftItem {
            product_id: product.id.clone(),
            sku: product.sku.clone(),
            name: product.name.clone(),
            unit_price_paisa: unit_price.paisa(),
            quantity: *quantity,
            line_total_paisa: line_total.paisa(),
            weight_grams: product.weight_grams * quantity,
        });
    }

    let discount_amount = discount
        .as_ref()
        .map(|d| d.amount())
        .unwrap_or_else(Money::zero);

    // A fixed coupon may exceed the subtotal; the total floors at zero
    let total = (subtotal - discount_amount + delivery.total()).clamp_non_negative();

    Ok(OrderDraft {
        order_number: generate_order_number(now),
        user_id: user_id.to_string(),
        items,
        subtotal_paisa: subtotal.paisa(),
        delivery_paisa: delivery.total_paisa,
        discount_paisa: discount_amount.paisa(),
        total_paisa: total.paisa(),
        customer,
        coupon: discount,
        created_at: now,
    })
}

// =============================================================================
// Order Numbers
// =============================================================================

/// Generates an order number in format: BZR-YYMMDD-HHMMSS-XXXX
///
/// ## Format
/// - YYMMDD-HHMMSS: UTC timestamp, human-decodable
/// - XXXX: random suffix from uuid v4 bits
///
/// Collisions are negligible (two orders in the same second must also draw
/// the same 16 random bits) but the commit step still treats a uniqueness
/// violation as retryable.
///
/// ## Example
/// `BZR-260807-142530-9F3A`
pub fn generate_order_number(now: DateTime<Utc>) -> String {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(4)
        .collect::<String>()
        .to_uppercase();
    format!("BZR-{}-{}", now.format("%y%m%d-%H%M%S"), suffix)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::calculate_delivery_cost;

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

    fn test_customer() -> CustomerInfo {
        CustomerInfo {
            name: "Ayesha Khan".to_string(),
            phone: "03001234567".to_string(),
            email: None,
            city: "Karachi".to_string(),
            address: "House 12, Street 4, DHA Phase 5".to_string(),
            address_id: None,
        }
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        let delivery = calculate_delivery_cost("Karachi", Money::zero(), 0);
        let err = assemble_draft("u1", &[], &delivery, None, test_customer(), Utc::now())
            .unwrap_err();
        assert_eq!(err, DraftError::EmptyCart);
    }

    #[test]
    fn test_subtotal_uses_authoritative_effective_prices() {
        let lines = vec![
            (test_product("1", 100_000, Some(80_000)), 2),
            (test_product("2", 50_000, None), 1),
        ];
        let subtotal = Money::from_paisa(2 * 80_000 + 50_000);
        let delivery = calculate_delivery_cost("Karachi", subtotal, 1_500);

        let draft = assemble_draft("u1", &lines, &delivery, None, test_customer(), Utc::now())
            .unwrap();

        assert_eq!(draft.subtotal_paisa, subtotal.paisa());
        assert_eq!(draft.items.len(), 2);
        assert_eq!(draft.items[0].unit_price_paisa, 80_000);
        assert_eq!(draft.items[0].line_total_paisa, 160_000);
        assert_eq!(
            draft.total_paisa,
            subtotal.paisa() + delivery.total_paisa
        );
    }

    #[test]
    fn test_total_combines_discount_and_delivery() {
        let lines = vec![(test_product("1", 500_000, None), 1)];
        let delivery = calculate_delivery_cost("Karachi", Money::from_paisa(500_000), 500);
        let discount = CouponDiscount {
            coupon_id: "c1".to_string(),
            code: "EID10".to_string(),
            amount_paisa: 50_000,
        };

        let draft = assemble_draft(
            "u1",
            &lines,
            &delivery,
            Some(discount),
            test_customer(),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(draft.discount_paisa, 50_000);
        assert_eq!(
            draft.total_paisa,
            500_000 - 50_000 + delivery.total_paisa
        );
    }

    #[test]
    fn test_total_floors_at_zero_when_discount_exceeds_subtotal() {
        let lines = vec![(test_product("1", 30_000, None), 1)];
        let delivery = DeliveryQuote {
            base_paisa: 0,
            weight_paisa: 0,
            discount_paisa: 0,
            total_paisa: 0,
            is_free: true,
        };
        let discount = CouponDiscount {
            coupon_id: "c1".to_string(),
            code: "MEGA500".to_string(),
            amount_paisa: 50_000,
        };

        let draft = assemble_draft(
            "u1",
            &lines,
            &delivery,
            Some(discount),
            test_customer(),
            Utc::now(),
        )
        .unwrap();

        // Discount recorded in full, total floored
        assert_eq!(draft.discount_paisa, 50_000);
        assert_eq!(draft.total_paisa, 0);
    }

    #[test]
    fn test_order_number_format() {
        let now = Utc::now();
        let number = generate_order_number(now);

        assert!(number.starts_with("BZR-"));
        // BZR-YYMMDD-HHMMSS-XXXX
        assert_eq!(number.len(), 22);
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[1].len(), 6);
        assert_eq!(parts[2].len(), 6);
        assert_eq!(parts[3].len(), 4);
    }

    #[test]
    fn test_order_numbers_differ() {
        let now = Utc::now();
        let a = generate_order_number(now);
        let b = generate_order_number(now);
        // Same second, different random suffix
        assert_ne!(a, b);
    }
}
