//! # Order Repository
//!
//! Database operations for orders and their line snapshots.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │  1. INSERT HEADER (commit pipeline)                                    │
//! │     └── insert_order() → Order { status: Pending }                     │
//! │                                                                         │
//! │  2. INSERT LINE SNAPSHOTS                                              │
//! │     └── insert_items() → one row per cart line                         │
//! │     └── on failure the pipeline calls delete_order() (compensating)    │
//! │                                                                         │
//! │  3. BACK-OFFICE TRANSITIONS                                            │
//! │     └── update_status() → only edges the lifecycle allows              │
//! │                                                                         │
//! │  Orders are never deleted once committed; delete_order exists ONLY     │
//! │  for the pipeline's compensations immediately after creation.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use bazaar_core::{Order, OrderItem, OrderStatus};

const ORDER_COLUMNS: &str = "id, order_number, user_id, status, subtotal_paisa, delivery_paisa, \
     discount_paisa, total_paisa, customer_name, phone, email, city, address, \
     address_id, created_at, updated_at";

const ORDER_ITEM_COLUMNS: &str = "id, order_id, product_id, sku_snapshot, name_snapshot, \
     unit_price_paisa, quantity, line_total_paisa, created_at";

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE id = ?1",
            ORDER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets an order by its business number.
    pub async fn get_by_number(&self, order_number: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE order_number = ?1",
            ORDER_COLUMNS
        ))
        .bind(order_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Lists a shopper's orders, newest first (order history page).
    pub async fn list_for_user(&self, user_id: &str, limit: u32) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE user_id = ?1 ORDER BY created_at DESC LIMIT ?2",
            ORDER_COLUMNS
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Inserts an order header.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - order number collision; the
    ///   pipeline regenerates the number and retries (bounded)
    pub async fn insert_order(&self, order: &Order) -> DbResult<()> {
        debug!(id = %order.id, order_number = %order.order_number, "Inserting order");

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, order_number, user_id, status,
                subtotal_paisa, delivery_paisa, discount_paisa, total_paisa,
                customer_name, phone, email, city, address, address_id,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7, ?8,
                ?9, ?10, ?11, ?12, ?13, ?14,
                ?15, ?16
            )
            "#,
        )
        .bind(&order.id)
        .bind(&order.order_number)
        .bind(&order.user_id)
        .bind(order.status)
        .bind(order.subtotal_paisa)
        .bind(order.delivery_paisa)
        .bind(order.discount_paisa)
        .bind(order.total_paisa)
        .bind(&order.customer_name)
        .bind(&order.phone)
        .bind(&order.email)
        .bind(&order.city)
        .bind(&order.address)
        .bind(&order.address_id)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts the line snapshots for an order.
    ///
    /// ## Snapshot Pattern
    /// Product details (sku, name, price) are frozen onto the line.
    /// This preserves the order history even if the product changes later.
    pub async fn insert_items(&self, items: &[OrderItem]) -> DbResult<()> {
        for item in items {
            debug!(order_id = %item.order_id, product_id = %item.product_id, "Inserting order item");

            sqlx::query(
                r#"
                INSERT INTO order_items (
                    id, order_id, product_id,
                    sku_snapshot, name_snapshot, unit_price_paisa,
                    quantity, line_total_paisa, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(&item.id)
            .bind(&item.order_id)
            .bind(&item.product_id)
            .bind(&item.sku_snapshot)
            .bind(&item.name_snapshot)
            .bind(item.unit_price_paisa)
            .bind(item.quantity)
            .bind(item.line_total_paisa)
            .bind(item.created_at)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    /// Gets all line snapshots for an order.
    pub async fn get_items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {} FROM order_items WHERE order_id = ?1 ORDER BY created_at",
            ORDER_ITEM_COLUMNS
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Deletes an order and (via cascade) its line snapshots.
    ///
    /// This is the pipeline's compensating action, used ONLY immediately
    /// after creation when a later step fails. Committed orders are never
    /// deleted through any other path.
    pub async fn delete_order(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting order (compensation)");

        let result = sqlx::query("DELETE FROM orders WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }

    /// Updates an order's status along an allowed lifecycle edge.
    ///
    /// The conditional `WHERE status = ?` makes the transition atomic: a
    /// concurrent update to the same order makes this one a NotFound rather
    /// than a lost write.
    ///
    /// ## Errors
    /// * [`DbError::QueryFailed`] - the lifecycle forbids `from → to`
    /// * [`DbError::NotFound`] - order missing or no longer in `from`
    pub async fn update_status(
        &self,
        id: &str,
        from: OrderStatus,
        to: OrderStatus,
    ) -> DbResult<()> {
        if !from.can_transition_to(to) {
            return Err(DbError::QueryFailed(format!(
                "Order status cannot change from {} to {}",
                from.as_str(),
                to.as_str()
            )));
        }

        debug!(id = %id, from = %from.as_str(), to = %to.as_str(), "Updating order status");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE orders SET
                status = ?3,
                updated_at = ?4
            WHERE id = ?1 AND status = ?2
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }

    /// Counts orders for a user (diagnostics and tests).
    pub async fn count_for_user(&self, user_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = ?1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Generates a new order row ID.
pub fn generate_order_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generates a new order item row ID.
pub fn generate_order_item_id() -> String {
    Uuid::new_v4().to_string()
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

    async fn seed_product(db: &Database) -> String {
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
        product.id
    }

    fn sample_order(order_number: &str, user_id: &str) -> Order {
        let now = Utc::now();
        Order {
            id: generate_order_id(),
            order_number: order_number.to_string(),
            user_id: user_id.to_string(),
            status: OrderStatus::Pending,
            subtotal_paisa: 100_000,
            delivery_paisa: 20_000,
            discount_paisa: 0,
            total_paisa: 120_000,
            customer_name: "Ayesha Khan".to_string(),
            phone: "03001234567".to_string(),
            email: None,
            city: "Karachi".to_string(),
            address: "House 12, Street 4".to_string(),
            address_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_item(order_id: &str, product_id: &str) -> OrderItem {
        OrderItem {
            id: generate_order_item_id(),
            order_id: order_id.to_string(),
            product_id: product_id.to_string(),
            sku_snapshot: "SKU-1".to_string(),
            name_snapshot: "Test product".to_string(),
            unit_price_paisa: 100_000,
            quantity: 1,
            line_total_paisa: 100_000,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch_order_with_items() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product_id = seed_product(&db).await;

        let order = sample_order("BZR-260807-120000-AAAA", "u1");
        db.orders().insert_order(&order).await.unwrap();
        db.orders()
            .insert_items(&[sample_item(&order.id, &product_id)])
            .await
            .unwrap();

        let fetched = db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, OrderStatus::Pending);
        assert_eq!(fetched.total_paisa, 120_000);

        let by_number = db
            .orders()
            .get_by_number("BZR-260807-120000-AAAA")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_number.id, order.id);

        let items = db.orders().get_items(&order.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].sku_snapshot, "SKU-1");
    }

    #[tokio::test]
    async fn test_duplicate_order_number_is_unique_violation() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.orders()
            .insert_order(&sample_order("BZR-DUP", "u1"))
            .await
            .unwrap();
        let err = db
            .orders()
            .insert_order(&sample_order("BZR-DUP", "u2"))
            .await
            .unwrap_err();

        assert!(err.is_unique_violation_on("order_number"));
    }

    #[tokio::test]
    async fn test_delete_order_cascades_to_items() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product_id = seed_product(&db).await;

        let order = sample_order("BZR-DEL", "u1");
        db.orders().insert_order(&order).await.unwrap();
        db.orders()
            .insert_items(&[sample_item(&order.id, &product_id)])
            .await
            .unwrap();

        db.orders().delete_order(&order.id).await.unwrap();

        assert!(db.orders().get_by_id(&order.id).await.unwrap().is_none());
        assert!(db.orders().get_items(&order.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_status_allowed_edge() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let order = sample_order("BZR-ST", "u1");
        db.orders().insert_order(&order).await.unwrap();

        db.orders()
            .update_status(&order.id, OrderStatus::Pending, OrderStatus::Confirmed)
            .await
            .unwrap();

        let fetched = db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, OrderStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_update_status_forbidden_edge() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let order = sample_order("BZR-ST2", "u1");
        db.orders().insert_order(&order).await.unwrap();

        let err = db
            .orders()
            .update_status(&order.id, OrderStatus::Pending, OrderStatus::Delivered)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::QueryFailed(_)));

        // Stale `from` is NotFound (another writer got there first)
        let err = db
            .orders()
            .update_status(&order.id, OrderStatus::Confirmed, OrderStatus::Processing)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_for_user_newest_first() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut older = sample_order("BZR-OLD", "u1");
        older.created_at = Utc::now() - chrono::Duration::hours(2);
        db.orders().insert_order(&older).await.unwrap();
        db.orders()
            .insert_order(&sample_order("BZR-NEW", "u1"))
            .await
            .unwrap();
        db.orders()
            .insert_order(&sample_order("BZR-OTHER", "u2"))
            .await
            .unwrap();

        let orders = db.orders().list_for_user("u1", 10).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].order_number, "BZR-NEW");
        assert_eq!(orders[1].order_number, "BZR-OLD");

        assert_eq!(db.orders().count_for_user("u1").await.unwrap(), 2);
    }
}
