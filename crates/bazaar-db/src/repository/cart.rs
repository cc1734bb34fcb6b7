//! # Cart Repository
//!
//! Persists cart lines across sessions.
//!
//! The mutation rules (quantity caps, dedup by product) live in
//! [`bazaar_core::cart`]; this repository only stores the result. A session
//! mutates its in-memory [`bazaar_core::Cart`] and calls [`CartRepository::replace`]
//! to persist it; checkout loads the persisted lines back with
//! [`CartRepository::load`].

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use bazaar_core::{Cart, CartItem};

const CART_ITEM_COLUMNS: &str = "product_id, sku, name, unit_price_paisa, \
     discounted_price_paisa, weight_grams, quantity, max_stock, added_at";

/// Repository for persisted cart lines.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Loads a shopper's cart, oldest line first.
    ///
    /// A shopper with no persisted lines gets an empty cart.
    pub async fn load(&self, user_id: &str) -> DbResult<Cart> {
        let items = sqlx::query_as::<_, CartItem>(&format!(
            "SELECT {} FROM cart_items WHERE user_id = ?1 ORDER BY added_at",
            CART_ITEM_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Cart::from_items(items))
    }

    /// Replaces a shopper's persisted lines with the given cart.
    ///
    /// Delete-then-insert keeps the stored lines an exact mirror of the
    /// session cart, including removals.
    pub async fn replace(&self, user_id: &str, cart: &Cart) -> DbResult<()> {
        debug!(user_id = %user_id, lines = cart.line_count(), "Replacing persisted cart");

        sqlx::query("DELETE FROM cart_items WHERE user_id = ?1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        for item in &cart.items {
            sqlx::query(
                r#"
                INSERT INTO cart_items (
                    id, user_id, product_id, sku, name,
                    unit_price_paisa, discounted_price_paisa, weight_grams,
                    quantity, max_stock, added_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(user_id)
            .bind(&item.product_id)
            .bind(&item.sku)
            .bind(&item.name)
            .bind(item.unit_price_paisa)
            .bind(item.discounted_price_paisa)
            .bind(item.weight_grams)
            .bind(item.quantity)
            .bind(item.max_stock)
            .bind(item.added_at)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    /// Deletes all of a shopper's persisted lines.
    ///
    /// ## Returns
    /// The number of lines removed.
    pub async fn clear(&self, user_id: &str) -> DbResult<u64> {
        debug!(user_id = %user_id, "Clearing persisted cart");

        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = ?1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
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
    use chrono::Utc;

    async fn seed_product(db: &Database, sku: &str, price_paisa: i64) -> Product {
        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            sku: sku.to_string(),
            name: format!("Sample {}", sku),
            description: None,
            price_paisa,
            discounted_price_paisa: None,
            weight_grams: 500,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();
        product
    }

    #[tokio::test]
    async fn test_replace_and_load_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product_a = seed_product(&db, "A-1", 100_000).await;
        let product_b = seed_product(&db, "B-1", 50_000).await;

        let mut cart = Cart::new();
        cart.add_item(&product_a, 10).unwrap();
        cart.add_item(&product_a, 10).unwrap();
        cart.add_item(&product_b, 5).unwrap();

        db.carts().replace("u1", &cart).await.unwrap();

        let loaded = db.carts().load("u1").await.unwrap();
        assert_eq!(loaded.line_count(), 2);
        assert_eq!(loaded.total_items(), 3);
        assert_eq!(loaded.total_price(), cart.total_price());
    }

    #[tokio::test]
    async fn test_replace_mirrors_removals() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = seed_product(&db, "A-1", 100_000).await;

        let mut cart = Cart::new();
        cart.add_item(&product, 10).unwrap();
        db.carts().replace("u1", &cart).await.unwrap();

        cart.remove_item(&product.id);
        db.carts().replace("u1", &cart).await.unwrap();

        let loaded = db.carts().load("u1").await.unwrap();
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_carts_are_per_user() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = seed_product(&db, "A-1", 100_000).await;

        let mut cart = Cart::new();
        cart.add_item(&product, 10).unwrap();
        db.carts().replace("u1", &cart).await.unwrap();

        assert!(db.carts().load("u2").await.unwrap().is_empty());
        assert_eq!(db.carts().load("u1").await.unwrap().line_count(), 1);
    }

    #[tokio::test]
    async fn test_clear_reports_removed_lines() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = seed_product(&db, "A-1", 100_000).await;

        let mut cart = Cart::new();
        cart.add_item(&product, 10).unwrap();
        db.carts().replace("u1", &cart).await.unwrap();

        assert_eq!(db.carts().clear("u1").await.unwrap(), 1);
        assert_eq!(db.carts().clear("u1").await.unwrap(), 0);
        assert!(db.carts().load("u1").await.unwrap().is_empty());
    }
}
