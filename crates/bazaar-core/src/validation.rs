//! # Validation Module
//!
//! Input validation for checkout-facing fields.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Storefront forms                                             │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate shopper feedback                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (Rust)                                           │
//! │  └── Business rule validation before the pipeline runs                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / UNIQUE constraints                                     │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ValidationError, ValidationResult};

// =============================================================================
// Coupon Codes
// =============================================================================

/// Normalizes and validates a coupon code.
///
/// ## Rules
/// - Trimmed, then uppercased (codes are matched case-insensitively and
///   stored uppercase)
/// - Must not be empty
/// - Maximum 32 characters
/// - Alphanumeric plus hyphens only
///
/// ## Returns
/// The normalized (uppercase) code.
///
/// ## Example
/// ```rust
/// use bazaar_core::validation::normalize_coupon_code;
///
/// assert_eq!(normalize_coupon_code(" eid10 ").unwrap(), "EID10");
/// assert!(normalize_coupon_code("").is_err());
/// ```
pub fn normalize_coupon_code(code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "coupon code".to_string(),
        });
    }

    if code.len() > 32 {
        return Err(ValidationError::TooLong {
            field: "coupon code".to_string(),
            max: 32,
        });
    }

    if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ValidationError::InvalidFormat {
            field: "coupon code".to_string(),
            reason: "must contain only letters, numbers, and hyphens".to_string(),
        });
    }

    Ok(code.to_uppercase())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed the line's stock cap
pub fn validate_quantity(qty: i64, max_stock: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > max_stock {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: max_stock,
        });
    }

    Ok(())
}

/// Validates a price in paisa.
///
/// Zero is allowed (free items), negative is not.
pub fn validate_price_paisa(paisa: i64) -> ValidationResult<()> {
    if paisa < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Contact Fields
// =============================================================================

/// Validates the delivery city field.
///
/// The city does not have to be in the delivery table (unknown cities use
/// the fallback base cost), it only has to be present.
pub fn validate_city(city: &str) -> ValidationResult<()> {
    if city.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "city".to_string(),
        });
    }

    Ok(())
}

/// Validates a contact phone number.
///
/// ## Rules
/// - Must not be empty
/// - 7 to 15 digits, optional leading `+`
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, with an optional leading +".to_string(),
        });
    }

    if digits.len() < 7 || digits.len() > 15 {
        return Err(ValidationError::OutOfRange {
            field: "phone".to_string(),
            min: 7,
            max: 15,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
