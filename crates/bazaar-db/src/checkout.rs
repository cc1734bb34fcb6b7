//! # Order Commit Pipeline
//!
//! Turns a shopper's cart into a durable order.
//!
//! ## The State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Commit Pipeline                                   │
//! │                                                                         │
//! │  1. LOAD + VALIDATE (preview)                                          │
//! │     ├── load persisted cart lines        → EmptyCart                   │
//! │     ├── re-fetch authoritative products  → ProductUnavailable          │
//! │     ├── check inventory per line         → OutOfStock                  │
//! │     ├── delivery quote (city/subtotal/weight)                          │
//! │     ├── coupon lookup + validation       → Coupon(...)                 │
//! │     └── assemble draft; expected total   → PriceMismatch               │
//! │                                                                         │
//! │  2. PERSIST HEADER (status = pending)                                  │
//! │     └── order-number collision → regenerate, retry (max 3)             │
//! │         other failure → OrderPersist, nothing to undo                  │
//! │                                                                         │
//! │  3. PERSIST ITEMS                                                      │
//! │     └── failure → delete header (compensate) → ItemPersist             │
//! │                                                                         │
//! │  4. REDEEM COUPON (atomic conditional increment)                       │
//! │     └── raced to exhaustion → delete order → UsageLimitReached         │
//! │                                                                         │
//! │  5. DECREMENT INVENTORY (atomic conditional, per line)                 │
//! │     └── failure → restore done decrements, release coupon,             │
//! │         delete order → OutOfStock / InventoryDecrement                 │
//! │                                                                         │
//! │  6. CLEAR CART (non-fatal: order is already durable)                   │
//! │                                                                         │
//! │  Terminal states: Committed (receipt returned) or Aborted (every       │
//! │  compensation applied, cart untouched). A partial order is never       │
//! │  visible: headers without items do not survive any path.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Steps are strictly sequential; each needs the previous step's result.
//! The shared counters (inventory, coupon usage) are only ever touched
//! through single-statement conditional updates, so concurrent checkouts
//! cannot oversell stock or over-redeem a coupon.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::DbError;
use crate::pool::Database;
use crate::repository::order::{generate_order_id, generate_order_item_id};
use bazaar_core::{
    assemble_draft, calculate_delivery_cost, validate_coupon, validation, CouponError,
    CustomerInfo, DraftError, Money, Order, OrderDraft, OrderItem, OrderStatus, Product,
    ValidationError, MAX_ORDER_NUMBER_ATTEMPTS,
};

// =============================================================================
// Request / Receipt
// =============================================================================

/// Everything the storefront sends to place an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Session/shopper the cart belongs to.
    pub user_id: String,

    /// Contact and delivery details from the checkout form.
    pub customer: CustomerInfo,

    /// Coupon code as typed by the shopper, if any.
    pub coupon_code: Option<String>,

    /// The total the storefront displayed, in paisa. When set, a differing
    /// server-side total aborts the checkout before anything is persisted.
    pub expected_total_paisa: Option<i64>,
}

/// Confirmation data returned after a successful commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub order_id: String,
    pub order_number: String,
    pub subtotal_paisa: i64,
    pub delivery_paisa: i64,
    pub discount_paisa: i64,
    pub total_paisa: i64,
    pub item_count: usize,
}

// =============================================================================
// Checkout Error
// =============================================================================

/// Failures the pipeline reports to the caller.
///
/// Every variant leaves the cart intact; the caller shows the specific
/// reason and the shopper can retry.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no lines; there is nothing to order.
    #[error("Cart is empty")]
    EmptyCart,

    /// A cart line references a product that is missing or inactive.
    #[error("Product is no longer available: {product_id}")]
    ProductUnavailable { product_id: String },

    /// A cart line asks for more units than are in stock.
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    OutOfStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// The server-side total differs from the total the storefront showed.
    #[error("Order total changed: displayed {expected_paisa} paisa, now {actual_paisa} paisa")]
    PriceMismatch {
        expected_paisa: i64,
        actual_paisa: i64,
    },

    /// The coupon was rejected. Surfaced inline; the rest of the draft is
    /// unaffected until the shopper retries.
    #[error(transparent)]
    Coupon(#[from] CouponError),

    /// A checkout form field failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The order header could not be persisted. Nothing was created.
    #[error("Order could not be persisted: {0}")]
    OrderPersist(#[source] DbError),

    /// The line snapshots could not be persisted. The header has been
    /// compensating-deleted before this was returned.
    #[error("Order items could not be persisted: {0}")]
    ItemPersist(#[source] DbError),

    /// An inventory decrement failed for a reason other than stock level.
    /// All compensations have been applied.
    #[error("Inventory update failed: {0}")]
    InventoryDecrement(#[source] DbError),

    /// Storage failure while reading (cart, catalog, coupon).
    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<DraftError> for CheckoutError {
    fn from(err: DraftError) -> Self {
        match err {
            DraftError::EmptyCart => CheckoutError::EmptyCart,
        }
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// The order commit pipeline.
///
/// Cheap to construct (clones a pool handle); grab one per checkout via
/// [`Database::checkout`].
#[derive(Debug, Clone)]
pub struct CheckoutPipeline {
    db: Database,
}

impl CheckoutPipeline {
    /// Creates a new pipeline over the given database.
    pub fn new(db: Database) -> Self {
        CheckoutPipeline { db }
    }

    /// Builds and validates the order draft without persisting anything.
    ///
    /// This is the pipeline's validate step, also served to the storefront's
    /// order-review page: authoritative prices, stock check, delivery quote,
    /// coupon validation, expected-total check.
    pub async fn preview(&self, request: &CheckoutRequest) -> Result<OrderDraft, CheckoutError> {
        validate_customer(&request.customer)?;

        let cart = self.db.carts().load(&request.user_id).await?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        debug!(user_id = %request.user_id, lines = cart.line_count(), "Validating cart for checkout");

        // Re-fetch every product: cart snapshots are advisory only
        let mut lines: Vec<(Product, i64)> = Vec::with_capacity(cart.line_count());
        let mut total_weight_grams = 0;

        for item in &cart.items {
            let product = self
                .db
                .products()
                .get_by_id(&item.product_id)
                .await?
                .filter(|p| p.is_active)
                .ok_or_else(|| CheckoutError::ProductUnavailable {
                    product_id: item.product_id.clone(),
                })?;

            let available = self
                .db
                .inventory()
                .get(&product.id)
                .await?
                .map(|c| c.quantity)
                .unwrap_or(0);

            if available < item.quantity {
                return Err(CheckoutError::OutOfStock {
                    sku: product.sku.clone(),
                    available,
                    requested: item.quantity,
                });
            }

            if product.effective_price().paisa() != item.effective_price().paisa() {
                debug!(
                    sku = %product.sku,
                    cart_paisa = item.effective_price().paisa(),
                    catalog_paisa = product.effective_price().paisa(),
                    "Cart price snapshot is stale; using catalog price"
                );
            }

            total_weight_grams += product.weight_grams * item.quantity;
            lines.push((product, item.quantity));
        }

        let subtotal = lines
            .iter()
            .fold(Money::zero(), |acc, (p, qty)| {
                acc + p.effective_price().multiply_quantity(*qty)
            });

        let delivery = calculate_delivery_cost(&request.customer.city, subtotal, total_weight_grams);

        let now = Utc::now();

        let discount = match &request.coupon_code {
            Some(code) => {
                let code = validation::normalize_coupon_code(code)?;
                let coupon = self
                    .db
                    .coupons()
                    .get_by_code(&code)
                    .await?
                    .ok_or(CouponError::NotFound)?;
                Some(validate_coupon(&coupon, subtotal, now)?)
            }
            None => None,
        };

        let draft = assemble_draft(
            &request.user_id,
            &lines,
            &delivery,
            discount,
            request.customer.clone(),
            now,
        )?;

        if let Some(expected) = request.expected_total_paisa {
            if expected != draft.total_paisa {
                return Err(CheckoutError::PriceMismatch {
                    expected_paisa: expected,
                    actual_paisa: draft.total_paisa,
                });
            }
        }

        Ok(draft)
    }

    /// Runs the full pipeline: validate, persist, compensate on failure.
    ///
    /// ## Terminal States
    /// * `Ok(receipt)` - order durable with status `pending`, cart cleared
    /// * `Err(_)` - nothing persisted (or compensating actions already
    ///   applied); the cart is intact
    pub async fn commit(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        let draft = self.preview(request).await?;
        self.commit_draft(draft).await
    }

    /// Persists a previously assembled draft.
    ///
    /// The draft's stock check is advisory by the time we get here; the
    /// conditional inventory decrements below are the authoritative guard
    /// against concurrent checkouts.
    pub async fn commit_draft(
        &self,
        draft: OrderDraft,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        let user_id = draft.user_id.clone();
        let order = self.insert_header(&draft).await?;

        let now = Utc::now();
        let items: Vec<OrderItem> = draft
            .items
            .iter()
            .map(|line| OrderItem {
                id: generate_order_item_id(),
                order_id: order.id.clone(),
                product_id: line.product_id.clone(),
                sku_snapshot: line.sku.clone(),
                name_snapshot: line.name.clone(),
                unit_price_paisa: line.unit_price_paisa,
                quantity: line.quantity,
                line_total_paisa: line.line_total_paisa,
                created_at: now,
            })
            .collect();

        if let Err(err) = self.db.orders().insert_items(&items).await {
            // An order with zero items must never survive
            warn!(order_id = %order.id, error = %err, "Item persist failed; deleting header");
            self.delete_order_logged(&order.id).await;
            return Err(CheckoutError::ItemPersist(err));
        }

        // Redeem the coupon exactly once, atomically. Validation happened in
        // preview; a concurrent redemption since then surfaces here.
        if let Some(coupon) = &draft.coupon {
            if let Err(err) = self.db.coupons().increment_usage(&coupon.coupon_id).await {
                warn!(order_id = %order.id, coupon = %coupon.code, "Coupon redemption raced; rolling back");
                self.delete_order_logged(&order.id).await;
                return match err {
                    DbError::NotFound { .. } => {
                        Err(CheckoutError::Coupon(CouponError::UsageLimitReached))
                    }
                    other => Err(CheckoutError::Db(other)),
                };
            }
        }

        // Decrement stock per line. A failure reverses everything done so
        // far: completed decrements, the coupon redemption, and the order.
        let mut decremented: Vec<(String, i64)> = Vec::with_capacity(items.len());
        for item in &items {
            match self
                .db
                .inventory()
                .decrement(&item.product_id, item.quantity)
                .await
            {
                Ok(()) => decremented.push((item.product_id.clone(), item.quantity)),
                Err(err) => {
                    warn!(
                        order_id = %order.id,
                        sku = %item.sku_snapshot,
                        error = %err,
                        "Inventory decrement failed; running compensations"
                    );
                    self.rollback_commit(&order.id, &decremented, &draft).await;
                    return match err {
                        DbError::InsufficientStock {
                            available,
                            requested,
                            ..
                        } => Err(CheckoutError::OutOfStock {
                            sku: item.sku_snapshot.clone(),
                            available,
                            requested,
                        }),
                        other => Err(CheckoutError::InventoryDecrement(other)),
                    };
                }
            }
        }

        // The order is durable from here on. A cart-clear failure is logged
        // and tolerated: the next session load overwrites the stale lines.
        if let Err(err) = self.db.carts().clear(&user_id).await {
            warn!(user_id = %user_id, error = %err, "Cart clear failed after commit");
        }

        info!(
            order_id = %order.id,
            order_number = %order.order_number,
            user_id = %user_id,
            total = %order.total(),
            items = items.len(),
            "Order committed"
        );

        Ok(CheckoutReceipt {
            order_id: order.id,
            order_number: order.order_number,
            subtotal_paisa: order.subtotal_paisa,
            delivery_paisa: order.delivery_paisa,
            discount_paisa: order.discount_paisa,
            total_paisa: order.total_paisa,
            item_count: items.len(),
        })
    }

    /// Inserts the order header, regenerating the order number on a
    /// uniqueness collision (bounded retry).
    async fn insert_header(&self, draft: &OrderDraft) -> Result<Order, CheckoutError> {
        let now = Utc::now();
        let mut order = Order {
            id: generate_order_id(),
            order_number: draft.order_number.clone(),
            user_id: draft.user_id.clone(),
            status: OrderStatus::Pending,
            subtotal_paisa: draft.subtotal_paisa,
            delivery_paisa: draft.delivery_paisa,
            discount_paisa: draft.discount_paisa,
            total_paisa: draft.total_paisa,
            customer_name: draft.customer.name.clone(),
            phone: draft.customer.phone.clone(),
            email: draft.customer.email.clone(),
            city: draft.customer.city.clone(),
            address: draft.customer.address.clone(),
            address_id: draft.customer.address_id.clone(),
            created_at: now,
            updated_at: now,
        };

        let mut attempt = 1;
        loop {
            match self.db.orders().insert_order(&order).await {
                Ok(()) => return Ok(order),
                Err(err)
                    if err.is_unique_violation_on("order_number")
                        && attempt < MAX_ORDER_NUMBER_ATTEMPTS =>
                {
                    attempt += 1;
                    let fresh = bazaar_core::generate_order_number(Utc::now());
                    debug!(
                        collided = %order.order_number,
                        regenerated = %fresh,
                        attempt,
                        "Order number collision; retrying"
                    );
                    order.order_number = fresh;
                }
                Err(err) => return Err(CheckoutError::OrderPersist(err)),
            }
        }
    }

    /// Reverses a partially committed order: restores completed inventory
    /// decrements, releases the coupon redemption, deletes the order.
    ///
    /// Compensation failures are logged, not propagated - the caller's
    /// error (the step that failed) is the one the shopper needs to see.
    async fn rollback_commit(
        &self,
        order_id: &str,
        decremented: &[(String, i64)],
        draft: &OrderDraft,
    ) {
        for (product_id, qty) in decremented {
            if let Err(err) = self.db.inventory().restore(product_id, *qty).await {
                warn!(product_id = %product_id, error = %err, "Inventory restore failed during rollback");
            }
        }

        if let Some(coupon) = &draft.coupon {
            if let Err(err) = self.db.coupons().release_usage(&coupon.coupon_id).await {
                warn!(coupon = %coupon.code, error = %err, "Coupon release failed during rollback");
            }
        }

        self.delete_order_logged(order_id).await;
    }

    /// Compensating delete with logging; cascade removes the items.
    async fn delete_order_logged(&self, order_id: &str) {
        if let Err(err) = self.db.orders().delete_order(order_id).await {
            warn!(order_id = %order_id, error = %err, "Compensating order delete failed");
        }
    }
}

/// Validates the checkout form fields before any storage work.
fn validate_customer(customer: &CustomerInfo) -> Result<(), ValidationError> {
    if customer.name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }
    if customer.address.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "address".to_string(),
        });
    }
    validation::validate_city(&customer.city)?;
    validation::validate_phone(&customer.phone)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
