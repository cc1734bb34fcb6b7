//! # Coupon Validator
//!
//! Pure validation and discount computation for coupon codes.
//!
//! ## Validation Ladder
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    validate_coupon(coupon, total, now)                  │
//! │                                                                         │
//! │  inactive ─────────────► CouponError::NotFound                         │
//! │  now > ends_at ────────► CouponError::Expired                           │
//! │  now < starts_at ──────► CouponError::NotYetValid                       │
//! │  used_count ≥ limit ───► CouponError::UsageLimitReached                 │
//! │  total < minimum ──────► CouponError::BelowMinimum { minimum }          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Percentage: total × value / 100, capped at max_discount                │
//! │  Fixed:      value verbatim (uncapped - the draft total floors at 0)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation never mutates `used_count`. Redemption - the atomic increment
//! of the usage counter - is a separate storage-layer step invoked exactly
//! once per committed order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CouponError, CouponResult};
use crate::money::Money;
use crate::types::{Coupon, DiscountType};

// =============================================================================
// Coupon Discount
// =============================================================================

/// A validated coupon, ready for the commit pipeline.
///
/// Carries the normalized coupon identity so redemption targets exactly the
/// row that was validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponDiscount {
    /// Coupon row id.
    pub coupon_id: String,
    /// Normalized (uppercase) code, for receipts.
    pub code: String,
    /// Discount amount in paisa.
    pub amount_paisa: i64,
}

impl CouponDiscount {
    /// Returns the discount amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_paisa(self.amount_paisa)
    }
}

// =============================================================================
// Validator
// =============================================================================

/// Validates a coupon against an order subtotal at a point in time.
///
/// Deterministic: the caller supplies `now`, so the same inputs always
/// produce the same outcome.
///
/// ## Arguments
/// * `coupon` - the coupon row fetched by (case-insensitive) code
/// * `order_total` - order subtotal the discount applies to
/// * `now` - validation instant
///
/// ## Discount Rules
/// - Percentage: `order_total × discount_value / 100`, capped at
///   `max_discount_paisa` when set
/// - Fixed: `discount_value` paisa verbatim. Intentionally NOT capped
///   against the order total; [`crate::order::assemble_draft`] floors the
///   order total at zero instead.
///
/// ## Example
/// ```rust
/// use bazaar_core::coupon::validate_coupon;
/// use bazaar_core::money::Money;
/// use bazaar_core::types::{Coupon, DiscountType};
/// use chrono::Utc;
///
/// # let now = Utc::now();
/// # let coupon = Coupon {
/// #     id: "c1".into(), code: "EID10".into(),
/// #     discount_type: DiscountType::Percentage, discount_value: 10,
/// #     min_order_paisa: None, max_discount_paisa: None,
/// #     usage_limit: None, used_count: 0, starts_at: None, ends_at: None,
/// #     is_active: true, created_at: now, updated_at: now,
/// # };
/// let discount = validate_coupon(&coupon, Money::from_rupees(2_000), now).unwrap();
/// assert_eq!(discount.amount(), Money::from_rupees(200));
/// ```
pub fn validate_coupon(
    coupon: &Coupon,
    order_total: Money,
    now: DateTime<Utc>,
) -> CouponResult<CouponDiscount> {
    if !coupon.is_active {
        return Err(CouponError::NotFound);
    }

    if let Some(ends_at) = coupon.ends_at {
        if now > ends_at {
            return Err(CouponError::Expired);
        }
    }

    if let Some(starts_at) = coupon.starts_at {
        if now < starts_at {
            return Err(CouponError::NotYetValid);
        }
    }

    if coupon.usage_exhausted() {
        return Err(CouponError::UsageLimitReached);
    }

    if let Some(min_order) = coupon.min_order_paisa {
        if order_total < Money::from_paisa(min_order) {
            return Err(CouponError::BelowMinimum {
                minimum: Money::from_paisa(min_order),
            });
        }
    }

    let amount = match coupon.discount_type {
        DiscountType::Percentage => {
            let raw = order_total.percent_of(coupon.discount_value);
            match coupon.max_discount_paisa {
                Some(cap) => raw.min(Money::from_paisa(cap)),
                None => raw,
            }
        }
        DiscountType::Fixed => Money::from_paisa(coupon.discount_value),
    };

    Ok(CouponDiscount {
        coupon_id: coupon.id.clone(),
        code: coupon.code.clone(),
        amount_paisa: amount.paisa(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn base_coupon() -> Coupon {
        let now = Utc::now();
        Coupon {
            id: "c1".to_string(),
            code: "EID10".to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: 10,
            min_order_paisa: None,
            max_discount_paisa: None,
            usage_limit: None,
            used_count: 0,
            starts_at: None,
            ends_at: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_inactive_coupon_is_not_found() {
        let mut coupon = base_coupon();
        coupon.is_active = false;

        let err = validate_coupon(&coupon, Money::from_rupees(1_000), Utc::now()).unwrap_err();
        assert_eq!(err, CouponError::NotFound);
    }

    #[test]
    fn test_expired_coupon() {
        let now = Utc::now();
        let mut coupon = base_coupon();
        coupon.ends_at = Some(now - Duration::hours(1));

        let err = validate_coupon(&coupon, Money::from_rupees(1_000), now).unwrap_err();
        assert_eq!(err, CouponError::Expired);
    }

    #[test]
    fn test_window_end_is_inclusive() {
        let now = Utc::now();
        let mut coupon = base_coupon();
        coupon.ends_at = Some(now);

        assert!(validate_coupon(&coupon, Money::from_rupees(1_000), now).is_ok());
    }

    #[test]
    fn test_not_yet_valid_coupon() {
        let now = Utc::now();
        let mut coupon = base_coupon();
        coupon.starts_at = Some(now + Duration::hours(1));

        let err = validate_coupon(&coupon, Money::from_rupees(1_000), now).unwrap_err();
        assert_eq!(err, CouponError::NotYetValid);
    }

    #[test]
    fn test_usage_limit_reached_regardless_of_other_fields() {
        let mut coupon = base_coupon();
        coupon.usage_limit = Some(1);
        coupon.used_count = 1;
        // Even with a generous window and no minimum, exhausted is exhausted
        coupon.starts_at = Some(Utc::now() - Duration::days(30));
        coupon.ends_at = Some(Utc::now() + Duration::days(30));

        let err = validate_coupon(&coupon, Money::from_rupees(99_999), Utc::now()).unwrap_err();
        assert_eq!(err, CouponError::UsageLimitReached);
    }

    #[test]
    fn test_below_minimum_reports_required_amount() {
        let mut coupon = base_coupon();
        coupon.min_order_paisa = Some(Money::from_rupees(2_000).paisa());

        let err = validate_coupon(&coupon, Money::from_rupees(1_999), Utc::now()).unwrap_err();
        assert_eq!(
            err,
            CouponError::BelowMinimum {
                minimum: Money::from_rupees(2_000)
            }
        );

        // Exactly the minimum passes
        assert!(validate_coupon(&coupon, Money::from_rupees(2_000), Utc::now()).is_ok());
    }

    #[test]
    fn test_percentage_discount() {
        let coupon = base_coupon();
        let discount = validate_coupon(&coupon, Money::from_rupees(2_000), Utc::now()).unwrap();
        assert_eq!(discount.amount(), Money::from_rupees(200));
        assert_eq!(discount.coupon_id, "c1");
        assert_eq!(discount.code, "EID10");
    }

    #[test]
    fn test_percentage_discount_capped() {
        let mut coupon = base_coupon();
        coupon.discount_value = 50;
        coupon.max_discount_paisa = Some(Money::from_rupees(1_000).paisa());

        // 50% of Rs 5,000 is Rs 2,500, capped to Rs 1,000
        let discount = validate_coupon(&coupon, Money::from_rupees(5_000), Utc::now()).unwrap();
        assert_eq!(discount.amount(), Money::from_rupees(1_000));
    }

    #[test]
    fn test_fixed_discount_verbatim_and_uncapped() {
        let mut coupon = base_coupon();
        coupon.discount_type = DiscountType::Fixed;
        coupon.discount_value = Money::from_rupees(500).paisa();
        coupon.max_discount_paisa = Some(Money::from_rupees(100).paisa());

        // Fixed ignores max_discount and the order total
        let discount = validate_coupon(&coupon, Money::from_rupees(300), Utc::now()).unwrap();
        assert_eq!(discount.amount(), Money::from_rupees(500));
    }

    #[test]
    fn test_validation_does_not_mutate_usage() {
        let mut coupon = base_coupon();
        coupon.usage_limit = Some(5);
        coupon.used_count = 2;

        let _ = validate_coupon(&coupon, Money::from_rupees(1_000), Utc::now()).unwrap();
        assert_eq!(coupon.used_count, 2);
    }
}
