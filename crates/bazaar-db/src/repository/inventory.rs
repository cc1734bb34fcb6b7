//! # Inventory Repository
//!
//! Stock counters with atomic conditional decrements.
//!
//! ## Why Conditional Updates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Decrement Strategy                             │
//! │                                                                         │
//! │  ❌ WRONG: read-then-write (races under concurrent checkouts)          │
//! │     SELECT quantity … ; if enough: UPDATE … SET quantity = n            │
//! │                                                                         │
//! │  ✅ CORRECT: one conditional statement                                  │
//! │     UPDATE inventory SET quantity = quantity - ?                        │
//! │     WHERE product_id = ? AND quantity >= ?                              │
//! │                                                                         │
//! │  Two checkouts racing for the last unit: exactly one statement          │
//! │  matches, the other reports insufficient stock. No overselling.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use bazaar_core::InventoryCounter;

/// Repository for inventory counter operations.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Gets the counter for a product.
    pub async fn get(&self, product_id: &str) -> DbResult<Option<InventoryCounter>> {
        let counter = sqlx::query_as::<_, InventoryCounter>(
            r#"
            SELECT product_id, quantity, low_stock_threshold, updated_at
            FROM inventory
            WHERE product_id = ?1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(counter)
    }

    /// Creates or replaces the counter for a product.
    pub async fn put(&self, counter: &InventoryCounter) -> DbResult<()> {
        debug!(product_id = %counter.product_id, quantity = %counter.quantity, "Putting inventory counter");

        sqlx::query(
            r#"
            INSERT INTO inventory (product_id, quantity, low_stock_threshold, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (product_id) DO UPDATE SET
                quantity = excluded.quantity,
                low_stock_threshold = excluded.low_stock_threshold,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&counter.product_id)
        .bind(counter.quantity)
        .bind(counter.low_stock_threshold)
        .bind(counter.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Atomically decrements stock for a product.
    ///
    /// Single conditional statement: succeeds only when at least `qty` units
    /// are available, so concurrent checkouts cannot oversell.
    ///
    /// ## Errors
    /// * [`DbError::InsufficientStock`] - fewer than `qty` units available
    /// * [`DbError::NotFound`] - no counter exists for the product
    pub async fn decrement(&self, product_id: &str, qty: i64) -> DbResult<()> {
        debug!(product_id = %product_id, qty = %qty, "Decrementing inventory");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE inventory SET
                quantity = quantity - ?2,
                updated_at = ?3
            WHERE product_id = ?1 AND quantity >= ?2
            "#,
        )
        .bind(product_id)
        .bind(qty)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Distinguish "not enough" from "no counter at all"
            return match self.get(product_id).await? {
                Some(counter) => Err(DbError::InsufficientStock {
                    product_id: product_id.to_string(),
                    available: counter.quantity,
                    requested: qty,
                }),
                None => Err(DbError::not_found("Inventory counter", product_id)),
            };
        }

        Ok(())
    }

    /// Restores previously decremented stock (saga compensation).
    pub async fn restore(&self, product_id: &str, qty: i64) -> DbResult<()> {
        debug!(product_id = %product_id, qty = %qty, "Restoring inventory");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE inventory SET
                quantity = quantity + ?2,
                updated_at = ?3
            WHERE product_id = ?1
            "#,
        )
        .bind(product_id)
        .bind(qty)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory counter", product_id));
        }

        Ok(())
    }

    /// Lists counters at or below their restock threshold.
    ///
    /// Back-office restock view.
    pub async fn list_low_stock(&self) -> DbResult<Vec<InventoryCounter>> {
        let counters = sqlx::query_as::<_, InventoryCounter>(
            r#"
            SELECT product_id, quantity, low_stock_threshold, updated_at
            FROM inventory
            WHERE quantity <= low_stock_threshold
            ORDER BY quantity
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(counters)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::generate_product_id;
    use bazaar_core::Product;

    async fn seed_counter(db: &Database, quantity: i64) -> String {
        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            sku: format!("SKU-{}", &generate_product_id()[..8]),
            name: "Test product".to_string(),
            description: None,
            price_paisa: 100_000,
            discounted_price_paisa: None,
            weight_grams: 500,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();

        db.inventory()
            .put(&InventoryCounter {
                product_id: product.id.clone(),
                quantity,
                low_stock_threshold: 5,
                updated_at: now,
            })
            .await
            .unwrap();

        product.id
    }

    #[tokio::test]
    async fn test_decrement_happy_path() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product_id = seed_counter(&db, 10).await;

        db.inventory().decrement(&product_id, 4).await.unwrap();

        let counter = db.inventory().get(&product_id).await.unwrap().unwrap();
        assert_eq!(counter.quantity, 6);
    }

    #[tokio::test]
    async fn test_decrement_insufficient_is_distinct_error() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product_id = seed_counter(&db, 3).await;

        let err = db.inventory().decrement(&product_id, 5).await.unwrap_err();
        match err {
            DbError::InsufficientStock {
                available,
                requested,
                ..
            } => {
                assert_eq!(available, 3);
                assert_eq!(requested, 5);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        // Counter untouched
        let counter = db.inventory().get(&product_id).await.unwrap().unwrap();
        assert_eq!(counter.quantity, 3);
    }

    #[tokio::test]
    async fn test_decrement_to_exactly_zero() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product_id = seed_counter(&db, 2).await;

        db.inventory().decrement(&product_id, 2).await.unwrap();
        let counter = db.inventory().get(&product_id).await.unwrap().unwrap();
        assert_eq!(counter.quantity, 0);
    }

    #[tokio::test]
    async fn test_decrement_missing_counter() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db.inventory().decrement("ghost", 1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_restore_after_decrement() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product_id = seed_counter(&db, 10).await;

        db.inventory().decrement(&product_id, 4).await.unwrap();
        db.inventory().restore(&product_id, 4).await.unwrap();

        let counter = db.inventory().get(&product_id).await.unwrap().unwrap();
        assert_eq!(counter.quantity, 10);
    }

    #[tokio::test]
    async fn test_list_low_stock() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let low = seed_counter(&db, 2).await;
        let _plenty = seed_counter(&db, 50).await;

        let counters = db.inventory().list_low_stock().await.unwrap();
        assert_eq!(counters.len(), 1);
        assert_eq!(counters[0].product_id, low);
    }
}
