//! Merge executor: applies a resolved merge inside a single transaction.
//!
//! Ordered steps, all-or-nothing:
//! 1. write the resolved field set to the primary record;
//! 2. re-point every dependent row referencing the duplicate to the primary;
//! 3. delete the duplicate.
//!
//! Both rows are locked up front with `SELECT ... FOR UPDATE`, so two
//! concurrent merges naming the same duplicate serialize; the loser finds
//! the duplicate gone and fails with [`MergeError::StaleRecord`] instead
//! of double-applying. Any later failure rolls the transaction back,
//! leaving both records and all dependents untouched.

use solardesk_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::contact::ContactMergeData;
use crate::models::order::OrderMergeData;
use crate::models::product::ProductMergeData;

/// Errors surfaced by merge execution.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// Primary and duplicate are the same record, or otherwise unmergeable.
    #[error("Invalid merge: {0}")]
    InvalidMerge(String),

    /// The primary record does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// The duplicate vanished before the merge (concurrent merge). The
    /// caller should re-run the scan rather than retry blindly.
    #[error("{entity} {id} no longer exists; re-run the duplicate scan")]
    StaleRecord { entity: &'static str, id: DbId },

    /// A step failed mid-transaction; everything was rolled back.
    #[error("Merge execution failed: {0}")]
    Execution(#[from] sqlx::Error),
}

/// Executes merges for each entity kind.
pub struct MergeRepo;

impl MergeRepo {
    /// Merge a duplicate contact into a primary contact.
    ///
    /// Dependent `orders.contact_id` rows are re-pointed to the primary.
    /// Returns the primary's id.
    pub async fn merge_contacts(
        pool: &PgPool,
        primary_id: DbId,
        duplicate_id: DbId,
        merged: &ContactMergeData,
    ) -> Result<DbId, MergeError> {
        let mut tx = begin_locked(pool, "contacts", "Contact", primary_id, duplicate_id).await?;

        sqlx::query(
            "UPDATE contacts SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                address = COALESCE($5, address),
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(primary_id)
        .bind(&merged.name)
        .bind(&merged.email)
        .bind(&merged.phone)
        .bind(&merged.address)
        .execute(&mut *tx)
        .await?;

        let repointed = sqlx::query(
            "UPDATE orders SET contact_id = $1, updated_at = NOW() WHERE contact_id = $2",
        )
        .bind(primary_id)
        .bind(duplicate_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(duplicate_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(primary_id, duplicate_id, repointed, "Merged contacts");
        Ok(primary_id)
    }

    /// Merge a duplicate order into a primary order.
    ///
    /// Dependent `order_items.order_id` rows are re-pointed to the primary.
    /// Returns the primary's id.
    pub async fn merge_orders(
        pool: &PgPool,
        primary_id: DbId,
        duplicate_id: DbId,
        merged: &OrderMergeData,
    ) -> Result<DbId, MergeError> {
        let mut tx = begin_locked(pool, "orders", "Order", primary_id, duplicate_id).await?;

        sqlx::query(
            "UPDATE orders SET
                contact_id = COALESCE($2, contact_id),
                status = COALESCE($3, status),
                total_cents = COALESCE($4, total_cents),
                ordered_on = COALESCE($5, ordered_on),
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(primary_id)
        .bind(merged.contact_id)
        .bind(&merged.status)
        .bind(merged.total_cents)
        .bind(merged.ordered_on)
        .execute(&mut *tx)
        .await?;

        let repointed = sqlx::query(
            "UPDATE order_items SET order_id = $1, updated_at = NOW() WHERE order_id = $2",
        )
        .bind(primary_id)
        .bind(duplicate_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(duplicate_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(primary_id, duplicate_id, repointed, "Merged orders");
        Ok(primary_id)
    }

    /// Merge a duplicate product into a primary product.
    ///
    /// Dependent `order_items.product_id` rows are re-pointed to the
    /// primary. Returns the primary's id.
    pub async fn merge_products(
        pool: &PgPool,
        primary_id: DbId,
        duplicate_id: DbId,
        merged: &ProductMergeData,
    ) -> Result<DbId, MergeError> {
        let mut tx = begin_locked(pool, "products", "Product", primary_id, duplicate_id).await?;

        sqlx::query(
            "UPDATE products SET
                name = COALESCE($2, name),
                sku = COALESCE($3, sku),
                description = COALESCE($4, description),
                price_cents = COALESCE($5, price_cents),
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(primary_id)
        .bind(&merged.name)
        .bind(&merged.sku)
        .bind(&merged.description)
        .bind(merged.price_cents)
        .execute(&mut *tx)
        .await?;

        let repointed = sqlx::query(
            "UPDATE order_items SET product_id = $1, updated_at = NOW() WHERE product_id = $2",
        )
        .bind(primary_id)
        .bind(duplicate_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(duplicate_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(primary_id, duplicate_id, repointed, "Merged products");
        Ok(primary_id)
    }
}

/// Open a transaction and row-lock the primary and duplicate.
///
/// Validates the pair, then takes `FOR UPDATE` locks in id order (so two
/// merges touching the same rows cannot deadlock). Errors if the primary
/// is missing ([`MergeError::NotFound`]) or the duplicate is already gone
/// ([`MergeError::StaleRecord`]).
async fn begin_locked(
    pool: &PgPool,
    table: &str,
    entity: &'static str,
    primary_id: DbId,
    duplicate_id: DbId,
) -> Result<Transaction<'static, Postgres>, MergeError> {
    if primary_id == duplicate_id {
        return Err(MergeError::InvalidMerge(format!(
            "Cannot merge {entity} {primary_id} into itself"
        )));
    }

    let mut tx = pool.begin().await?;

    let query = format!("SELECT id FROM {table} WHERE id = ANY($1) ORDER BY id FOR UPDATE");
    let locked: Vec<(DbId,)> = sqlx::query_as(&query)
        .bind(vec![primary_id, duplicate_id])
        .fetch_all(&mut *tx)
        .await?;

    if !locked.iter().any(|(id,)| *id == primary_id) {
        return Err(MergeError::NotFound {
            entity,
            id: primary_id,
        });
    }
    if !locked.iter().any(|(id,)| *id == duplicate_id) {
        return Err(MergeError::StaleRecord {
            entity,
            id: duplicate_id,
        });
    }

    Ok(tx)
}
