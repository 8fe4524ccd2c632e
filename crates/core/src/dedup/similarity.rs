//! Field-level similarity scoring between two records of the same kind.
//!
//! Each entity kind has a static table of [`FieldComparator`]s. A comparator
//! extracts one field from both records and produces a 0–100 contribution;
//! the overall score is the weight-normalized sum. Fields that are empty on
//! both sides are excluded from the weighting entirely, while a field that
//! is empty on only one side contributes 0 but keeps its weight.

use chrono::NaiveDate;
use strsim::jaro_winkler;

use crate::dedup::{EntityKind, RecordData, SimilarityResult};

/// Minimum contribution for an exact match on an identity field (email,
/// SKU) to floor the overall score at [`IDENTITY_SCORE_FLOOR`]. Identity
/// matches must always clear the default scan threshold even when every
/// descriptive field disagrees.
const IDENTITY_SCORE_FLOOR: f64 = 90.0;

/// Default per-field matched threshold: a field counts toward the match
/// type when its contribution is at least this.
const MATCHED_THRESHOLD: f64 = 80.0;

/// Scale factor applied to the percentage difference of numeric fields.
const NUMERIC_DIFF_SCALE: f64 = 5.0;

/// Score decay per day of distance between two order dates.
const DATE_DECAY_PER_DAY: f64 = 10.0;

// ---------------------------------------------------------------------------
// Comparator table
// ---------------------------------------------------------------------------

/// Contribution of a single field to a pairwise comparison.
enum FieldScore {
    /// Field is absent on both sides; excluded from the weighting.
    Skip,
    /// Contribution in `[0, 100]`.
    Score(f64),
}

struct FieldComparator {
    field: &'static str,
    weight: f64,
    /// An exact match on an identity field floors the overall score.
    identity: bool,
    compare: fn(&RecordData, &RecordData) -> FieldScore,
}

const CONTACT_COMPARATORS: &[FieldComparator] = &[
    FieldComparator {
        field: "email",
        weight: 3.0,
        identity: true,
        compare: |a, b| exact(contact_email(a), contact_email(b)),
    },
    FieldComparator {
        field: "phone",
        weight: 2.0,
        identity: false,
        compare: |a, b| exact(contact_phone(a), contact_phone(b)),
    },
    FieldComparator {
        field: "name",
        weight: 1.5,
        identity: false,
        compare: |a, b| fuzzy(contact_name(a), contact_name(b)),
    },
    FieldComparator {
        field: "address",
        weight: 1.0,
        identity: false,
        compare: |a, b| fuzzy(contact_address(a), contact_address(b)),
    },
];

const ORDER_COMPARATORS: &[FieldComparator] = &[
    FieldComparator {
        field: "contact",
        weight: 2.0,
        identity: false,
        compare: |a, b| exact_id(order_contact(a), order_contact(b)),
    },
    FieldComparator {
        field: "total",
        weight: 1.5,
        identity: false,
        compare: |a, b| numeric(order_total(a), order_total(b)),
    },
    FieldComparator {
        field: "order_date",
        weight: 1.0,
        identity: false,
        compare: |a, b| date(order_date(a), order_date(b)),
    },
    FieldComparator {
        field: "status",
        weight: 0.5,
        identity: false,
        compare: |a, b| exact(order_status(a), order_status(b)),
    },
];

const PRODUCT_COMPARATORS: &[FieldComparator] = &[
    FieldComparator {
        field: "sku",
        weight: 3.0,
        identity: true,
        compare: |a, b| exact(product_sku(a), product_sku(b)),
    },
    FieldComparator {
        field: "name",
        weight: 2.0,
        identity: false,
        compare: |a, b| fuzzy(product_name(a), product_name(b)),
    },
    FieldComparator {
        field: "price",
        weight: 1.0,
        identity: false,
        compare: |a, b| numeric(product_price(a), product_price(b)),
    },
    FieldComparator {
        field: "description",
        weight: 1.0,
        identity: false,
        compare: |a, b| fuzzy(product_description(a), product_description(b)),
    },
];

fn comparators(kind: EntityKind) -> &'static [FieldComparator] {
    match kind {
        EntityKind::Contact => CONTACT_COMPARATORS,
        EntityKind::Order => ORDER_COMPARATORS,
        EntityKind::Product => PRODUCT_COMPARATORS,
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Compute the similarity between two records of the same kind.
///
/// Pure and symmetric: `score(a, b) == score(b, a)`. Records of different
/// kinds share no comparable fields and score 0. Missing fields never
/// error; they contribute 0 (or are skipped when absent on both sides).
pub fn score(a: &RecordData, b: &RecordData) -> SimilarityResult {
    if a.kind() != b.kind() {
        return SimilarityResult {
            score: 0.0,
            matched_fields: Vec::new(),
        };
    }

    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    let mut matched_fields = Vec::new();
    let mut identity_matched = false;

    for cmp in comparators(a.kind()) {
        match (cmp.compare)(a, b) {
            FieldScore::Skip => {}
            FieldScore::Score(contribution) => {
                weighted_sum += contribution * cmp.weight;
                weight_total += cmp.weight;
                if contribution >= MATCHED_THRESHOLD {
                    matched_fields.push(cmp.field);
                }
                if cmp.identity && contribution >= 100.0 {
                    identity_matched = true;
                }
            }
        }
    }

    let mut overall = if weight_total > 0.0 {
        weighted_sum / weight_total
    } else {
        0.0
    };
    if identity_matched {
        overall = overall.max(IDENTITY_SCORE_FLOOR);
    }

    SimilarityResult {
        score: overall,
        matched_fields,
    }
}

// ---------------------------------------------------------------------------
// Field extractors
// ---------------------------------------------------------------------------

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn contact_name(d: &RecordData) -> Option<&str> {
    match d {
        RecordData::Contact { name, .. } => non_empty(name),
        _ => None,
    }
}

fn contact_email(d: &RecordData) -> Option<&str> {
    match d {
        RecordData::Contact { email, .. } => email.as_deref().and_then(non_empty),
        _ => None,
    }
}

fn contact_phone(d: &RecordData) -> Option<&str> {
    match d {
        RecordData::Contact { phone, .. } => phone.as_deref().and_then(non_empty),
        _ => None,
    }
}

fn contact_address(d: &RecordData) -> Option<&str> {
    match d {
        RecordData::Contact { address, .. } => address.as_deref().and_then(non_empty),
        _ => None,
    }
}

fn order_contact(d: &RecordData) -> Option<i64> {
    match d {
        RecordData::Order { contact_id, .. } => Some(*contact_id),
        _ => None,
    }
}

fn order_status(d: &RecordData) -> Option<&str> {
    match d {
        RecordData::Order { status, .. } => non_empty(status),
        _ => None,
    }
}

fn order_total(d: &RecordData) -> Option<i64> {
    match d {
        RecordData::Order { total_cents, .. } => Some(*total_cents),
        _ => None,
    }
}

fn order_date(d: &RecordData) -> Option<NaiveDate> {
    match d {
        RecordData::Order { ordered_on, .. } => Some(*ordered_on),
        _ => None,
    }
}

fn product_name(d: &RecordData) -> Option<&str> {
    match d {
        RecordData::Product { name, .. } => non_empty(name),
        _ => None,
    }
}

fn product_sku(d: &RecordData) -> Option<&str> {
    match d {
        RecordData::Product { sku, .. } => sku.as_deref().and_then(non_empty),
        _ => None,
    }
}

fn product_description(d: &RecordData) -> Option<&str> {
    match d {
        RecordData::Product { description, .. } => description.as_deref().and_then(non_empty),
        _ => None,
    }
}

fn product_price(d: &RecordData) -> Option<i64> {
    match d {
        // A zero price means "unpriced" and is treated as absent so two
        // unpriced products do not spuriously match on price.
        RecordData::Product { price_cents, .. } => (*price_cents != 0).then_some(*price_cents),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Field comparators
// ---------------------------------------------------------------------------

/// Case-insensitive equality: 100 or 0.
fn exact(a: Option<&str>, b: Option<&str>) -> FieldScore {
    match (a, b) {
        (None, None) => FieldScore::Skip,
        (Some(x), Some(y)) => {
            if x.eq_ignore_ascii_case(y) {
                FieldScore::Score(100.0)
            } else {
                FieldScore::Score(0.0)
            }
        }
        _ => FieldScore::Score(0.0),
    }
}

/// Identifier equality: 100 or 0.
fn exact_id(a: Option<i64>, b: Option<i64>) -> FieldScore {
    match (a, b) {
        (None, None) => FieldScore::Skip,
        (Some(x), Some(y)) => FieldScore::Score(if x == y { 100.0 } else { 0.0 }),
        _ => FieldScore::Score(0.0),
    }
}

/// Whitespace-collapsed, lowercased Jaro-Winkler similarity scaled to 0–100.
fn fuzzy(a: Option<&str>, b: Option<&str>) -> FieldScore {
    match (a, b) {
        (None, None) => FieldScore::Skip,
        (Some(x), Some(y)) => {
            FieldScore::Score(jaro_winkler(&normalize(x), &normalize(y)) * 100.0)
        }
        _ => FieldScore::Score(0.0),
    }
}

/// 100 minus a scaled percentage difference, floored at 0.
fn numeric(a: Option<i64>, b: Option<i64>) -> FieldScore {
    match (a, b) {
        (None, None) => FieldScore::Skip,
        (Some(x), Some(y)) => {
            if x == y {
                return FieldScore::Score(100.0);
            }
            // f64 from the start: i64 difference/abs overflows on extreme
            // but schema-valid BIGINT values.
            let (x, y) = (x as f64, y as f64);
            let max = x.abs().max(y.abs());
            if max == 0.0 {
                return FieldScore::Score(100.0);
            }
            let pct_diff = (x - y).abs() / max * 100.0;
            FieldScore::Score((100.0 - NUMERIC_DIFF_SCALE * pct_diff).max(0.0))
        }
        _ => FieldScore::Score(0.0),
    }
}

/// 100 on the same day, decaying with day distance, floored at 0.
fn date(a: Option<NaiveDate>, b: Option<NaiveDate>) -> FieldScore {
    match (a, b) {
        (None, None) => FieldScore::Skip,
        (Some(x), Some(y)) => {
            let days = (x - y).num_days().abs() as f64;
            FieldScore::Score((100.0 - DATE_DECAY_PER_DAY * days).max(0.0))
        }
        _ => FieldScore::Score(0.0),
    }
}

fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
