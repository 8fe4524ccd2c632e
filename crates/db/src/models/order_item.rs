//! Order line item model and DTOs.

use serde::{Deserialize, Serialize};
use solardesk_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A line item row from the `order_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderItem {
    pub id: DbId,
    pub order_id: DbId,
    pub product_id: DbId,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new line item.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderItem {
    pub order_id: DbId,
    pub product_id: DbId,
    /// Defaults to 1 if omitted.
    pub quantity: Option<i32>,
    pub unit_price_cents: Option<i64>,
}
