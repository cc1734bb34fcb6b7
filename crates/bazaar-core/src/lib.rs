//! # bazaar-core: Pure Business Logic for the Bazaar Storefront
//!
//! This crate is the **heart** of the order-creation pipeline. It contains
//! all business rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bazaar Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Storefront transport (HTTP / RPC / CLI)              │   │
//! │  │     browse ──► cart ──► checkout ──► order confirmation         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bazaar-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │  coupon   │  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │ validator │  │   │
//! │  │   │   Order   │  │  (paisa)  │  │ CartItem  │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐                                 │   │
//! │  │   │ delivery  │  │   order   │                                 │   │
//! │  │   │ calculator│  │ assembler │                                 │   │
//! │  │   └───────────┘  └───────────┘                                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 bazaar-db (Storage + Pipeline)                  │   │
//! │  │        SQLite repositories, migrations, commit pipeline         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Coupon, Order, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The session-scoped cart aggregate
//! - [`delivery`] - Delivery cost calculator
//! - [`coupon`] - Coupon validation rules
//! - [`order`] - Order draft assembly and order numbers
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in paisa (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod coupon;
pub mod delivery;
pub mod error;
pub mod money;
pub mod order;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use bazaar_core::Money` instead of
// `use bazaar_core::money::Money`

pub use cart::{Cart, CartItem, CartTotals};
pub use coupon::{validate_coupon, CouponDiscount};
pub use delivery::{calculate_delivery_cost, DeliveryQuote};
pub use error::{CouponError, DraftError, ValidationError};
pub use money::Money;
pub use order::{assemble_draft, generate_order_number, OrderDraft, OrderDraftItem};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Orders at or above this subtotal ship free (Rs 50,000).
///
/// Checked against the order subtotal BEFORE discount, so a coupon cannot
/// push an otherwise-free order back into paid delivery.
pub const FREE_DELIVERY_THRESHOLD: Money = Money::from_rupees(50_000);

/// Delivery base cost used for cities missing from the city table (Rs 350).
pub const DEFAULT_DELIVERY_BASE: Money = Money::from_rupees(350);

/// Weight included in the base delivery cost, in grams (10 kg).
pub const DELIVERY_WEIGHT_ALLOWANCE_GRAMS: i64 = 10_000;

/// Surcharge per started kilogram above the allowance (Rs 50).
pub const DELIVERY_PER_KG_SURCHARGE: Money = Money::from_rupees(50);

/// Maximum distinct lines allowed in a single cart.
///
/// Prevents runaway carts and keeps checkout payloads bounded.
pub const MAX_CART_LINES: usize = 100;

/// Maximum insert attempts for order-number uniqueness collisions.
///
/// A collision is retryable (regenerate and re-insert) but never unbounded.
pub const MAX_ORDER_NUMBER_ATTEMPTS: u32 = 3;
