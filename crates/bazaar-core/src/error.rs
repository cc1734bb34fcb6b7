//! # Error Types
//!
//! Domain-specific error types for bazaar-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bazaar-core errors (this file)                                        │
//! │  ├── CouponError      - Coupon rejection reasons                       │
//! │  ├── DraftError       - Order draft assembly failures                  │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  bazaar-db errors (separate crate)                                     │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── CheckoutError    - Commit pipeline failures (wraps all of these)  │
//! │                                                                         │
//! │  Flow: ValidationError/CouponError/DraftError → CheckoutError → caller │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (code, minimum, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Coupon Error
// =============================================================================

/// Reasons a coupon code is rejected at validation time.
///
/// Coupon failures are surfaced inline at checkout; they never mutate the
/// coupon's usage counter (redemption is a separate atomic step).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouponError {
    /// No active coupon matches the code.
    ///
    /// Covers both a missing row and a row with `is_active = false`; the
    /// shopper sees the same message either way.
    #[error("Coupon code is not valid")]
    NotFound,

    /// The coupon's validity window has ended.
    #[error("Coupon has expired")]
    Expired,

    /// The coupon's validity window has not started yet.
    #[error("Coupon is not valid yet")]
    NotYetValid,

    /// The coupon's usage limit has been reached.
    #[error("Coupon usage limit has been reached")]
    UsageLimitReached,

    /// The order subtotal is below the coupon's minimum.
    #[error("Order must be at least {minimum} to use this coupon")]
    BelowMinimum { minimum: Money },
}

// =============================================================================
// Draft Error
// =============================================================================

/// Failures while assembling an order draft from cart lines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    /// The cart has no lines; there is nothing to order.
    #[error("Cart is empty")]
    EmptyCart,
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid characters in a coupon code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for coupon validation results.
pub type CouponResult<T> = Result<T, CouponError>;

/// Convenience type alias for validation results.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coupon_error_messages() {
        assert_eq!(
            CouponError::UsageLimitReached.to_string(),
            "Coupon usage limit has been reached"
        );
        let err = CouponError::BelowMinimum {
            minimum: Money::from_rupees(1_000),
        };
        assert_eq!(
            err.to_string(),
            "Order must be at least Rs1000.00 to use this coupon"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "city".to_string(),
        };
        assert_eq!(err.to_string(), "city is required");

        let err = ValidationError::TooLong {
            field: "coupon code".to_string(),
            max: 32,
        };
        assert_eq!(err.to_string(), "coupon code must be at most 32 characters");
    }

    #[test]
    fn test_draft_error_message() {
        assert_eq!(DraftError::EmptyCart.to_string(), "Cart is empty");
    }
}
