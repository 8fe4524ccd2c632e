//! Duplicate detection domain types and constants.
//!
//! The workflow has three parts, one submodule each: the similarity scorer
//! ([`similarity`]), the grouping engine ([`grouping`]), and merge planning
//! ([`merge`]). All of it is pure — persistence of a merge lives in the
//! repository layer.

pub mod grouping;
pub mod merge;
pub mod similarity;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Threshold constants
// ---------------------------------------------------------------------------

/// Threshold applied when a duplicate scan does not specify one.
pub const DEFAULT_THRESHOLD: f64 = 70.0;
/// Thresholds must be strictly greater than this (a zero threshold would
/// cluster every record into one group and is rejected).
pub const MIN_THRESHOLD: f64 = 0.0;
pub const MAX_THRESHOLD: f64 = 100.0;

/// Validate that `threshold` is within the accepted range `(MIN, MAX]`.
pub fn validate_threshold(threshold: f64) -> Result<(), CoreError> {
    if threshold <= MIN_THRESHOLD || threshold > MAX_THRESHOLD {
        return Err(CoreError::Validation(format!(
            "Similarity threshold must be greater than {MIN_THRESHOLD} and at most {MAX_THRESHOLD}, got {threshold}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Match type constants
// ---------------------------------------------------------------------------

/// Match type reported when more than one field triggered the match.
pub const MATCH_TYPE_MULTIPLE: &str = "multiple";
/// Match type for groups synthesized from an explicit user selection.
pub const MATCH_TYPE_MANUAL: &str = "manual";
/// Match type for pairs that cleared the scan threshold on combined
/// weight alone, with no single field meeting its matched threshold.
/// Possible at low scan thresholds.
pub const MATCH_TYPE_OVERALL: &str = "overall";

// ---------------------------------------------------------------------------
// Entity kinds and records
// ---------------------------------------------------------------------------

/// The three entity kinds that participate in duplicate detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Contact,
    Order,
    Product,
}

impl EntityKind {
    /// Human-readable entity name for error messages.
    pub fn entity_name(self) -> &'static str {
        match self {
            EntityKind::Contact => "Contact",
            EntityKind::Order => "Order",
            EntityKind::Product => "Product",
        }
    }
}

/// Comparable field values for one record, tagged by entity kind.
///
/// Field access during scoring goes through the per-kind comparator table
/// in [`similarity`], so every kind is guaranteed to have comparators
/// defined for all of its fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum RecordData {
    Contact {
        name: String,
        email: Option<String>,
        phone: Option<String>,
        address: Option<String>,
    },
    Order {
        contact_id: DbId,
        status: String,
        total_cents: i64,
        ordered_on: NaiveDate,
    },
    Product {
        name: String,
        sku: Option<String>,
        description: Option<String>,
        price_cents: i64,
    },
}

impl RecordData {
    pub fn kind(&self) -> EntityKind {
        match self {
            RecordData::Contact { .. } => EntityKind::Contact,
            RecordData::Order { .. } => EntityKind::Order,
            RecordData::Product { .. } => EntityKind::Product,
        }
    }
}

/// A record as seen by the duplicate detection workflow.
///
/// Built from the persisted row by the db layer; carries only the fields
/// the scorer and merge planner need.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DedupRecord {
    pub id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(flatten)]
    pub data: RecordData,
}

// ---------------------------------------------------------------------------
// Scan output
// ---------------------------------------------------------------------------

/// The outcome of comparing two records of the same kind.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityResult {
    /// Overall weighted score in `[0, 100]`.
    pub score: f64,
    /// Fields whose individual contribution met their matched threshold.
    pub matched_fields: Vec<&'static str>,
}

impl SimilarityResult {
    /// The single matched field name, `"multiple"` if more than one field
    /// matched, or `None` if nothing matched.
    pub fn match_type(&self) -> Option<&'static str> {
        match self.matched_fields.len() {
            0 => None,
            1 => Some(self.matched_fields[0]),
            _ => Some(MATCH_TYPE_MULTIPLE),
        }
    }
}

/// A cluster of records believed to represent one real-world entity.
///
/// Computed on demand by [`grouping::find_duplicate_groups`]; never
/// persisted. Members keep their input order; `id` is the 1-based position
/// of the group in the (deterministically sorted) scan output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateGroup {
    pub id: usize,
    pub records: Vec<DedupRecord>,
    pub match_type: String,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_threshold_accepts_in_range() {
        assert!(validate_threshold(0.1).is_ok());
        assert!(validate_threshold(DEFAULT_THRESHOLD).is_ok());
        assert!(validate_threshold(100.0).is_ok());
    }

    #[test]
    fn validate_threshold_rejects_zero_and_out_of_range() {
        assert!(validate_threshold(0.0).is_err());
        assert!(validate_threshold(-5.0).is_err());
        assert!(validate_threshold(100.1).is_err());
    }

    #[test]
    fn match_type_reports_single_field() {
        let result = SimilarityResult {
            score: 90.0,
            matched_fields: vec!["email"],
        };
        assert_eq!(result.match_type(), Some("email"));
    }

    #[test]
    fn match_type_collapses_to_multiple() {
        let result = SimilarityResult {
            score: 95.0,
            matched_fields: vec!["email", "phone"],
        };
        assert_eq!(result.match_type(), Some(MATCH_TYPE_MULTIPLE));
    }

    #[test]
    fn match_type_none_when_nothing_matched() {
        let result = SimilarityResult {
            score: 12.0,
            matched_fields: vec![],
        };
        assert_eq!(result.match_type(), None);
    }
}
