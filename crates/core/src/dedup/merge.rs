//! Merge planning: resolve a field-by-field merged value set for a
//! primary/duplicate pair.
//!
//! Planning is pure and deterministic; callers may edit the resolved
//! fields before handing the plan to the executor in the repository layer.

use crate::dedup::{DedupRecord, RecordData};
use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Field resolution policy for automatic merge planning.
///
/// The "prefer larger total / more recent date" rules are business
/// heuristics, not laws; they are configurable so callers can disable
/// them and fall back to always preferring the primary's value.
#[derive(Debug, Clone, Copy)]
pub struct MergePolicy {
    /// Resolve order totals to the larger of the two values.
    pub prefer_larger_total: bool,
    /// Resolve order dates to the more recent of the two values.
    pub prefer_recent_date: bool,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            prefer_larger_total: true,
            prefer_recent_date: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// A resolved merge: the primary keeps `merged`, the duplicate is removed.
#[derive(Debug, Clone)]
pub struct MergePlan {
    pub primary_id: DbId,
    pub duplicate_id: DbId,
    pub merged: RecordData,
}

/// Plan a merge of `duplicate` into `primary`.
///
/// Per-field resolution: strings prefer the primary's non-empty value and
/// fall back to the duplicate's; order totals and dates follow `policy`;
/// status and references prefer the primary. Rejects a self-merge and
/// mismatched entity kinds.
pub fn plan_merge(
    primary: &DedupRecord,
    duplicate: &DedupRecord,
    policy: MergePolicy,
) -> Result<MergePlan, CoreError> {
    if primary.id == duplicate.id {
        return Err(CoreError::Validation(format!(
            "Cannot merge record {} into itself",
            primary.id
        )));
    }
    if primary.data.kind() != duplicate.data.kind() {
        return Err(CoreError::Validation(format!(
            "Cannot merge {} into {}",
            duplicate.data.kind().entity_name(),
            primary.data.kind().entity_name()
        )));
    }

    let merged = match (&primary.data, &duplicate.data) {
        (
            RecordData::Contact {
                name: p_name,
                email: p_email,
                phone: p_phone,
                address: p_address,
            },
            RecordData::Contact {
                name: d_name,
                email: d_email,
                phone: d_phone,
                address: d_address,
            },
        ) => RecordData::Contact {
            name: prefer_non_empty(p_name, d_name),
            email: prefer_non_empty_opt(p_email, d_email),
            phone: prefer_non_empty_opt(p_phone, d_phone),
            address: prefer_non_empty_opt(p_address, d_address),
        },
        (
            RecordData::Order {
                contact_id: p_contact,
                status: p_status,
                total_cents: p_total,
                ordered_on: p_date,
            },
            RecordData::Order {
                status: d_status,
                total_cents: d_total,
                ordered_on: d_date,
                ..
            },
        ) => RecordData::Order {
            contact_id: *p_contact,
            status: prefer_non_empty(p_status, d_status),
            total_cents: if policy.prefer_larger_total {
                (*p_total).max(*d_total)
            } else {
                *p_total
            },
            ordered_on: if policy.prefer_recent_date {
                (*p_date).max(*d_date)
            } else {
                *p_date
            },
        },
        (
            RecordData::Product {
                name: p_name,
                sku: p_sku,
                description: p_desc,
                price_cents: p_price,
            },
            RecordData::Product {
                name: d_name,
                sku: d_sku,
                description: d_desc,
                price_cents: d_price,
            },
        ) => RecordData::Product {
            name: prefer_non_empty(p_name, d_name),
            sku: prefer_non_empty_opt(p_sku, d_sku),
            description: prefer_non_empty_opt(p_desc, d_desc),
            // A zero price means "unpriced"; fall back to the duplicate's.
            price_cents: if *p_price != 0 { *p_price } else { *d_price },
        },
        // Kinds already checked equal above.
        _ => unreachable!("mismatched kinds rejected before resolution"),
    };

    Ok(MergePlan {
        primary_id: primary.id,
        duplicate_id: duplicate.id,
        merged,
    })
}

fn prefer_non_empty(primary: &str, duplicate: &str) -> String {
    if primary.trim().is_empty() {
        duplicate.to_string()
    } else {
        primary.to_string()
    }
}

fn prefer_non_empty_opt(primary: &Option<String>, duplicate: &Option<String>) -> Option<String> {
    match primary.as_deref().map(str::trim) {
        Some(p) if !p.is_empty() => primary.clone(),
        _ => duplicate.clone(),
    }
}
