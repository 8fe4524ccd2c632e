//! Repository for the `orders` table.

use solardesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::order::{CreateOrder, Order, UpdateOrder};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, contact_id, status, total_cents, ordered_on, created_at, updated_at";

/// Provides CRUD operations for orders.
pub struct OrderRepo;

impl OrderRepo {
    /// Insert a new order, returning the created row.
    ///
    /// If `status` is `None` in the input, defaults to `pending`.
    pub async fn create(pool: &PgPool, input: &CreateOrder) -> Result<Order, sqlx::Error> {
        let query = format!(
            "INSERT INTO orders (contact_id, status, total_cents, ordered_on)
             VALUES ($1, COALESCE($2, 'pending'), COALESCE($3, 0), $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(input.contact_id)
            .bind(&input.status)
            .bind(input.total_cents)
            .bind(input.ordered_on)
            .fetch_one(pool)
            .await
    }

    /// Find an order by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List orders with pagination, oldest first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders
             ORDER BY id ASC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List every order, oldest first. Used by duplicate scans.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders ORDER BY id ASC");
        sqlx::query_as::<_, Order>(&query).fetch_all(pool).await
    }

    /// List the orders with the given ids, preserving the id order of the
    /// input. Missing ids are silently dropped.
    pub async fn list_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders
             WHERE id = ANY($1)
             ORDER BY array_position($1, id)"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List orders belonging to a contact, oldest first.
    pub async fn list_by_contact(pool: &PgPool, contact_id: DbId) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders
             WHERE contact_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(contact_id)
            .fetch_all(pool)
            .await
    }

    /// Patch an order. Returns `None` if the row does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateOrder,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "UPDATE orders SET
                contact_id = COALESCE($2, contact_id),
                status = COALESCE($3, status),
                total_cents = COALESCE($4, total_cents),
                ordered_on = COALESCE($5, ordered_on),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(input.contact_id)
            .bind(&input.status)
            .bind(input.total_cents)
            .bind(input.ordered_on)
            .fetch_optional(pool)
            .await
    }

    /// Delete an order by ID. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
