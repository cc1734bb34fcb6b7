//! # Delivery Cost Calculator
//!
//! Pure delivery fee computation for the checkout flow.
//!
//! ## How The Fee Is Built
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Delivery Fee Computation                             │
//! │                                                                         │
//! │  Subtotal ≥ Rs 50,000?                                                 │
//! │       │                                                                 │
//! │       ├── yes ──► free delivery (total 0, is_free = true)              │
//! │       │                                                                 │
//! │       └── no ───► base cost from city table (case-insensitive,         │
//! │                   unknown city = Rs 350 fallback)                       │
//! │                        +                                                │
//! │                   Rs 50 per STARTED kg above the 10 kg allowance        │
//! │                                                                         │
//! │  The quote exposes the full breakdown for display and audit.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::{
    DEFAULT_DELIVERY_BASE, DELIVERY_PER_KG_SURCHARGE, DELIVERY_WEIGHT_ALLOWANCE_GRAMS,
    FREE_DELIVERY_THRESHOLD,
};

// =============================================================================
// City Table
// =============================================================================

/// Fixed city → base delivery cost table, in whole rupees.
///
/// Lookup is case-insensitive. Cities missing from the table fall back to
/// [`DEFAULT_DELIVERY_BASE`].
const CITY_BASE_RUPEES: &[(&str, i64)] = &[
    ("karachi", 200),
    ("lahore", 250),
    ("islamabad", 250),
    ("rawalpindi", 250),
    ("faisalabad", 300),
    ("multan", 300),
    ("peshawar", 300),
    ("quetta", 350),
    ("hyderabad", 250),
    ("sialkot", 300),
];

fn city_base_cost(city: &str) -> Money {
    let needle = city.trim().to_lowercase();
    CITY_BASE_RUPEES
        .iter()
        .find(|(name, _)| *name == needle)
        .map(|(_, rupees)| Money::from_rupees(*rupees))
        .unwrap_or(DEFAULT_DELIVERY_BASE)
}

// =============================================================================
// Delivery Quote
// =============================================================================

/// The computed delivery fee with its breakdown.
///
/// Derived at checkout time, never persisted; the chosen total is copied
/// onto the order draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryQuote {
    /// City base cost component, in paisa.
    pub base_paisa: i64,
    /// Weight surcharge component, in paisa.
    pub weight_paisa: i64,
    /// Promotional reduction, in paisa (currently always 0; kept in the
    /// breakdown so receipts have a stable shape).
    pub discount_paisa: i64,
    /// Fee actually charged, in paisa.
    pub total_paisa: i64,
    /// Whether the order qualified for free delivery.
    pub is_free: bool,
}

impl DeliveryQuote {
    /// Returns the fee actually charged as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_paisa(self.total_paisa)
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// Computes the delivery fee for an order.
///
/// Deterministic: same `(city, order_total, weight)` always yields the same
/// quote.
///
/// ## Arguments
/// * `city` - destination city, matched case-insensitively
/// * `order_total` - order subtotal BEFORE discount
/// * `total_weight_grams` - total shipping weight of the cart
///
/// ## Rules
/// 1. Subtotal at or above [`FREE_DELIVERY_THRESHOLD`] → free
/// 2. Base cost from the city table, [`DEFAULT_DELIVERY_BASE`] fallback
/// 3. [`DELIVERY_PER_KG_SURCHARGE`] per started kg above
///    [`DELIVERY_WEIGHT_ALLOWANCE_GRAMS`]
///
/// ## Example
/// ```rust
/// use bazaar_core::delivery::calculate_delivery_cost;
/// use bazaar_core::money::Money;
///
/// let quote = calculate_delivery_cost("Karachi", Money::from_rupees(1_000), 15_000);
/// assert_eq!(quote.base_paisa, Money::from_rupees(200).paisa());
/// assert_eq!(quote.weight_paisa, Money::from_rupees(250).paisa());
/// assert_eq!(quote.total_paisa, Money::from_rupees(450).paisa());
/// ```
pub fn calculate_delivery_cost(
    city: &str,
    order_total: Money,
    total_weight_grams: i64,
) -> DeliveryQuote {
    if order_total >= FREE_DELIVERY_THRESHOLD {
        return DeliveryQuote {
            base_paisa: 0,
            weight_paisa: 0,
            discount_paisa: 0,
            total_paisa: 0,
            is_free: true,
        };
    }

    let base = city_base_cost(city);

    let excess_grams = (total_weight_grams - DELIVERY_WEIGHT_ALLOWANCE_GRAMS).max(0);
    // Integer ceiling: every started kilogram is billed in full
    let billed_kg = (excess_grams + 999) / 1000;
    let weight = DELIVERY_PER_KG_SURCHARGE.multiply_quantity(billed_kg);

    DeliveryQuote {
        base_paisa: base.paisa(),
        weight_paisa: weight.paisa(),
        discount_paisa: 0,
        total_paisa: (base + weight).paisa(),
        is_free: false,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_delivery_at_exact_threshold() {
        // Boundary: exactly the threshold ships free, any city, any weight
        for city in ["Karachi", "Gwadar", ""] {
            let quote = calculate_delivery_cost(city, Money::from_rupees(50_000), 40_000);
            assert!(quote.is_free);
            assert_eq!(quote.total_paisa, 0);
            assert_eq!(quote.base_paisa, 0);
            assert_eq!(quote.weight_paisa, 0);
        }
    }

    #[test]
    fn test_free_delivery_above_threshold() {
        let quote = calculate_delivery_cost("Lahore", Money::from_rupees(72_500), 0);
        assert!(quote.is_free);
        assert_eq!(quote.total_paisa, 0);
    }

    #[test]
    fn test_karachi_light_parcel() {
        // Rs 1,000 order, 5 kg: base 200, no surcharge
        let quote = calculate_delivery_cost("Karachi", Money::from_rupees(1_000), 5_000);
        assert!(!quote.is_free);
        assert_eq!(quote.base_paisa, Money::from_rupees(200).paisa());
        assert_eq!(quote.weight_paisa, 0);
        assert_eq!(quote.total_paisa, Money::from_rupees(200).paisa());
    }

    #[test]
    fn test_karachi_heavy_parcel() {
        // Rs 1,000 order, 15 kg: 5 kg over allowance → 5 × Rs 50 = Rs 250
        let quote = calculate_delivery_cost("Karachi", Money::from_rupees(1_000), 15_000);
        assert_eq!(quote.base_paisa, Money::from_rupees(200).paisa());
        assert_eq!(quote.weight_paisa, Money::from_rupees(250).paisa());
        assert_eq!(quote.total_paisa, Money::from_rupees(450).paisa());
    }

    #[test]
    fn test_started_kilogram_is_billed_in_full() {
        // 10.2 kg → 1 started kg over allowance
        let quote = calculate_delivery_cost("Karachi", Money::from_rupees(1_000), 10_200);
        assert_eq!(quote.weight_paisa, Money::from_rupees(50).paisa());

        // Exactly 10 kg → no surcharge
        let quote = calculate_delivery_cost("Karachi", Money::from_rupees(1_000), 10_000);
        assert_eq!(quote.weight_paisa, 0);
    }

    #[test]
    fn test_city_lookup_is_case_insensitive() {
        let lower = calculate_delivery_cost("karachi", Money::from_rupees(1_000), 0);
        let upper = calculate_delivery_cost("KARACHI", Money::from_rupees(1_000), 0);
        let padded = calculate_delivery_cost("  Karachi ", Money::from_rupees(1_000), 0);

        assert_eq!(lower, upper);
        assert_eq!(lower, padded);
        assert_eq!(lower.base_paisa, Money::from_rupees(200).paisa());
    }

    #[test]
    fn test_unknown_city_uses_fallback_base() {
        let quote = calculate_delivery_cost("Gwadar", Money::from_rupees(1_000), 0);
        assert_eq!(quote.base_paisa, DEFAULT_DELIVERY_BASE.paisa());
    }

    #[test]
    fn test_breakdown_adds_up() {
        let quote = calculate_delivery_cost("Multan", Money::from_rupees(2_000), 13_500);
        assert_eq!(
            quote.total_paisa,
            quote.base_paisa + quote.weight_paisa - quote.discount_paisa
        );
    }
}
