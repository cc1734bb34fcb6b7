//! # Repository Module
//!
//! Storage repositories for the Bazaar order pipeline.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  The commit pipeline talks to one repository per external store:       │
//! │                                                                         │
//! │  CheckoutPipeline                                                      │
//! │  ├── db.products()   → catalog lookup (authoritative prices)           │
//! │  ├── db.inventory()  → atomic conditional decrements                   │
//! │  ├── db.coupons()    → code lookup + atomic usage counter              │
//! │  ├── db.orders()     → header/items insert, compensating delete        │
//! │  └── db.carts()      → cart persistence across sessions                │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • SQL is isolated in one place per entity                             │
//! │  • Each pipeline step maps to a small, testable call                   │
//! │  • The pipeline stays free of query details                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog CRUD
//! - [`inventory::InventoryRepository`] - Stock counters
//! - [`coupon::CouponRepository`] - Coupon rules and usage
//! - [`order::OrderRepository`] - Orders and line snapshots
//! - [`cart::CartRepository`] - Persisted cart lines

pub mod cart;
pub mod coupon;
pub mod inventory;
pub mod order;
pub mod product;
