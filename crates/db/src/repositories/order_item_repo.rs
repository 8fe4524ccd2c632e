//! Repository for the `order_items` table.

use solardesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::order_item::{CreateOrderItem, OrderItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, order_id, product_id, quantity, unit_price_cents, created_at, updated_at";

/// Provides operations for order line items.
pub struct OrderItemRepo;

impl OrderItemRepo {
    /// Insert a new line item, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateOrderItem) -> Result<OrderItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO order_items (order_id, product_id, quantity, unit_price_cents)
             VALUES ($1, $2, COALESCE($3, 1), COALESCE($4, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OrderItem>(&query)
            .bind(input.order_id)
            .bind(input.product_id)
            .bind(input.quantity)
            .bind(input.unit_price_cents)
            .fetch_one(pool)
            .await
    }

    /// List line items for an order.
    pub async fn list_by_order(pool: &PgPool, order_id: DbId) -> Result<Vec<OrderItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM order_items
             WHERE order_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, OrderItem>(&query)
            .bind(order_id)
            .fetch_all(pool)
            .await
    }

    /// Count line items referencing a product.
    pub async fn count_by_product(pool: &PgPool, product_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM order_items WHERE product_id = $1")
            .bind(product_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}
