//! Product entity model and DTOs. Prices are in cents.

use serde::{Deserialize, Serialize};
use solardesk_core::dedup::{DedupRecord, RecordData};
use solardesk_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A product row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub name: String,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub price_cents: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Product> for DedupRecord {
    fn from(p: Product) -> Self {
        DedupRecord {
            id: p.id,
            created_at: p.created_at,
            updated_at: p.updated_at,
            data: RecordData::Product {
                name: p.name,
                sku: p.sku,
                description: p.description,
                price_cents: p.price_cents,
            },
        }
    }
}

/// DTO for creating a new product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
}

/// DTO for updating an existing product. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
}

/// Resolved field set written to the primary product during a merge.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMergeData {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
}

impl ProductMergeData {
    /// Build merge data from a resolved merge plan.
    pub fn from_plan(merged: &RecordData) -> Self {
        match merged {
            RecordData::Product {
                name,
                sku,
                description,
                price_cents,
            } => Self {
                name: Some(name.clone()),
                sku: sku.clone(),
                description: description.clone(),
                price_cents: Some(*price_cents),
            },
            _ => Self::default(),
        }
    }
}
