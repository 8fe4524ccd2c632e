//! Contact entity model and DTOs.

use serde::{Deserialize, Serialize};
use solardesk_core::dedup::{DedupRecord, RecordData};
use solardesk_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A contact row from the `contacts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contact {
    pub id: DbId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Contact> for DedupRecord {
    fn from(c: Contact) -> Self {
        DedupRecord {
            id: c.id,
            created_at: c.created_at,
            updated_at: c.updated_at,
            data: RecordData::Contact {
                name: c.name,
                email: c.email,
                phone: c.phone,
                address: c.address,
            },
        }
    }
}

/// DTO for creating a new contact.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContact {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// DTO for updating an existing contact. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateContact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Resolved field set written to the primary contact during a merge.
///
/// Omitted fields keep the primary's current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMergeData {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl ContactMergeData {
    /// Build merge data from a resolved merge plan.
    pub fn from_plan(merged: &RecordData) -> Self {
        match merged {
            RecordData::Contact {
                name,
                email,
                phone,
                address,
            } => Self {
                name: Some(name.clone()),
                email: email.clone(),
                phone: phone.clone(),
                address: address.clone(),
            },
            _ => Self::default(),
        }
    }
}
