//! Order entity model and DTOs. Monetary amounts are in cents.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use solardesk_core::dedup::{DedupRecord, RecordData};
use solardesk_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// An order row from the `orders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: DbId,
    pub contact_id: DbId,
    pub status: String,
    pub total_cents: i64,
    pub ordered_on: NaiveDate,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Order> for DedupRecord {
    fn from(o: Order) -> Self {
        DedupRecord {
            id: o.id,
            created_at: o.created_at,
            updated_at: o.updated_at,
            data: RecordData::Order {
                contact_id: o.contact_id,
                status: o.status,
                total_cents: o.total_cents,
                ordered_on: o.ordered_on,
            },
        }
    }
}

/// DTO for creating a new order.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrder {
    pub contact_id: DbId,
    /// Defaults to `pending` if omitted.
    pub status: Option<String>,
    pub total_cents: Option<i64>,
    pub ordered_on: NaiveDate,
}

/// DTO for updating an existing order. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrder {
    pub contact_id: Option<DbId>,
    pub status: Option<String>,
    pub total_cents: Option<i64>,
    pub ordered_on: Option<NaiveDate>,
}

/// Resolved field set written to the primary order during a merge.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderMergeData {
    pub contact_id: Option<DbId>,
    pub status: Option<String>,
    pub total_cents: Option<i64>,
    pub ordered_on: Option<NaiveDate>,
}

impl OrderMergeData {
    /// Build merge data from a resolved merge plan.
    pub fn from_plan(merged: &RecordData) -> Self {
        match merged {
            RecordData::Order {
                contact_id,
                status,
                total_cents,
                ordered_on,
            } => Self {
                contact_id: Some(*contact_id),
                status: Some(status.clone()),
                total_cents: Some(*total_cents),
                ordered_on: Some(*ordered_on),
            },
            _ => Self::default(),
        }
    }
}
