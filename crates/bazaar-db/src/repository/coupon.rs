//! # Coupon Repository
//!
//! Coupon lookup and the atomic usage counter.
//!
//! ## Exactly-Once Redemption
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Redemption Under Concurrency                         │
//! │                                                                         │
//! │  Checkout A                      Checkout B                             │
//! │  validate (used 0/1) ✓           validate (used 0/1) ✓                  │
//! │       │                               │                                 │
//! │       ▼                               ▼                                 │
//! │  UPDATE … WHERE used_count <     UPDATE … WHERE used_count <            │
//! │  usage_limit → 1 row             usage_limit → 0 rows                   │
//! │       │                               │                                 │
//! │       ▼                               ▼                                 │
//! │  redeemed                        CouponUsageExhausted + compensation    │
//! │                                                                         │
//! │  The counter can never exceed its limit, no matter how many             │
//! │  checkouts validated the same coupon concurrently.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use bazaar_core::Coupon;

const COUPON_COLUMNS: &str = "id, code, discount_type, discount_value, min_order_paisa, \
     max_discount_paisa, usage_limit, used_count, starts_at, ends_at, \
     is_active, created_at, updated_at";

/// Repository for coupon operations.
#[derive(Debug, Clone)]
pub struct CouponRepository {
    pool: SqlitePool,
}

impl CouponRepository {
    /// Creates a new CouponRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CouponRepository { pool }
    }

    /// Gets a coupon by code, case-insensitively.
    ///
    /// Codes are stored uppercase; the needle is uppercased before lookup.
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Coupon>> {
        let code = code.trim().to_uppercase();

        let coupon = sqlx::query_as::<_, Coupon>(&format!(
            "SELECT {} FROM coupons WHERE code = ?1",
            COUPON_COLUMNS
        ))
        .bind(&code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(coupon)
    }

    /// Gets a coupon by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Coupon>> {
        let coupon = sqlx::query_as::<_, Coupon>(&format!(
            "SELECT {} FROM coupons WHERE id = ?1",
            COUPON_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(coupon)
    }

    /// Inserts a new coupon. The code is stored uppercase.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - code already exists
    pub async fn insert(&self, coupon: &Coupon) -> DbResult<()> {
        debug!(code = %coupon.code, "Inserting coupon");

        sqlx::query(
            r#"
            INSERT INTO coupons (
                id, code, discount_type, discount_value,
                min_order_paisa, max_discount_paisa,
                usage_limit, used_count, starts_at, ends_at,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&coupon.id)
        .bind(coupon.code.to_uppercase())
        .bind(coupon.discount_type)
        .bind(coupon.discount_value)
        .bind(coupon.min_order_paisa)
        .bind(coupon.max_discount_paisa)
        .bind(coupon.usage_limit)
        .bind(coupon.used_count)
        .bind(coupon.starts_at)
        .bind(coupon.ends_at)
        .bind(coupon.is_active)
        .bind(coupon.created_at)
        .bind(coupon.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Atomically increments the usage counter.
    ///
    /// Single conditional statement; fails when the coupon is gone,
    /// deactivated, or its usage limit has been reached since validation.
    /// Invoked exactly once per committed order.
    ///
    /// ## Returns
    /// * `Ok(())` - usage recorded
    /// * `Err(DbError::NotFound)` - limit reached or coupon unavailable
    pub async fn increment_usage(&self, id: &str) -> DbResult<()> {
        debug!(coupon_id = %id, "Incrementing coupon usage");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE coupons SET
                used_count = used_count + 1,
                updated_at = ?2
            WHERE id = ?1
              AND is_active = 1
              AND (usage_limit IS NULL OR used_count < usage_limit)
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Redeemable coupon", id));
        }

        Ok(())
    }

    /// Releases one recorded usage (saga compensation).
    ///
    /// Never drives the counter below zero.
    pub async fn release_usage(&self, id: &str) -> DbResult<()> {
        debug!(coupon_id = %id, "Releasing coupon usage");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE coupons SET
                used_count = MAX(used_count - 1, 0),
                updated_at = ?2
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Coupon", id));
        }

        Ok(())
    }
}

/// Helper to generate a new coupon ID.
pub fn generate_coupon_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
