//! Grouping engine: clusters pairwise matches into duplicate groups.
//!
//! Pairwise O(n²) scoring feeds a union-find structure so chains of
//! matches (A~B, B~C) collapse into one group even when A and C alone
//! would not exceed the threshold. Output is deterministic: members keep
//! input order, groups sort by descending score then first-member id.

use std::collections::BTreeSet;

use crate::dedup::similarity::score;
use crate::dedup::{
    validate_threshold, DedupRecord, DuplicateGroup, MATCH_TYPE_MANUAL, MATCH_TYPE_MULTIPLE,
    MATCH_TYPE_OVERALL,
};
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Union-find
// ---------------------------------------------------------------------------

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, i: usize) -> usize {
        if self.parent[i] != i {
            let root = self.find(self.parent[i]);
            self.parent[i] = root;
        }
        self.parent[i]
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[rb] = ra;
        }
    }
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Find all duplicate groups among `records` at the given `threshold`.
///
/// Records of different kinds never match, so a mixed input simply yields
/// per-kind groups. Rejects thresholds outside `(0, 100]` before any
/// comparison work.
pub fn find_duplicate_groups(
    records: &[DedupRecord],
    threshold: f64,
) -> Result<Vec<DuplicateGroup>, CoreError> {
    validate_threshold(threshold)?;

    if records.len() < 2 {
        return Ok(Vec::new());
    }

    let mut uf = UnionFind::new(records.len());
    // (i, j, pairwise score, match type) for every pair at or above threshold.
    let mut matched_pairs: Vec<(usize, usize, f64, &'static str)> = Vec::new();

    for i in 0..records.len() {
        for j in (i + 1)..records.len() {
            let result = score(&records[i].data, &records[j].data);
            if result.score >= threshold {
                // A pair can clear a low threshold without any single
                // field meeting its matched threshold; label it "overall"
                // so "multiple" keeps meaning more than one matched field.
                let match_type = result.match_type().unwrap_or(MATCH_TYPE_OVERALL);
                uf.union(i, j);
                matched_pairs.push((i, j, result.score, match_type));
            }
        }
    }

    // Gather component members in input order.
    let mut components: Vec<(usize, Vec<usize>)> = Vec::new();
    for i in 0..records.len() {
        let root = uf.find(i);
        match components.iter_mut().find(|(r, _)| *r == root) {
            Some((_, members)) => members.push(i),
            None => components.push((root, vec![i])),
        }
    }

    let mut groups: Vec<DuplicateGroup> = Vec::new();
    for (root, members) in components {
        if members.len() < 2 {
            continue;
        }

        let mut max_score: f64 = 0.0;
        let mut types: BTreeSet<&'static str> = BTreeSet::new();
        for &(i, _, pair_score, match_type) in &matched_pairs {
            if uf.find(i) == root {
                max_score = max_score.max(pair_score);
                types.insert(match_type);
            }
        }

        let match_type = match types.len() {
            1 => types.iter().next().copied().unwrap_or(MATCH_TYPE_MULTIPLE),
            _ => MATCH_TYPE_MULTIPLE,
        };

        groups.push(DuplicateGroup {
            id: 0, // assigned after sorting
            records: members.iter().map(|&i| records[i].clone()).collect(),
            match_type: match_type.to_string(),
            score: max_score,
        });
    }

    // Deterministic output order: descending score, ties by first-member id.
    groups.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.records[0].id.cmp(&b.records[0].id))
    });
    for (pos, group) in groups.iter_mut().enumerate() {
        group.id = pos + 1;
    }

    Ok(groups)
}

/// Synthesize manual pairing groups from an explicit selection.
///
/// Used by the bulk scan when the user selected records that are not real
/// duplicates but should still be force-mergeable: consecutive records are
/// paired in selection order. A trailing unpaired record is left out.
pub fn synthesize_manual_groups(records: &[DedupRecord]) -> Vec<DuplicateGroup> {
    records
        .chunks(2)
        .filter(|pair| pair.len() == 2)
        .enumerate()
        .map(|(pos, pair)| DuplicateGroup {
            id: pos + 1,
            records: pair.to_vec(),
            match_type: MATCH_TYPE_MANUAL.to_string(),
            score: 0.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::RecordData;
    use chrono::Utc;

    fn record(id: i64, data: RecordData) -> DedupRecord {
        let now = Utc::now();
        DedupRecord {
            id,
            created_at: now,
            updated_at: now,
            data,
        }
    }

    fn contact(id: i64, name: &str, email: Option<&str>) -> DedupRecord {
        record(
            id,
            RecordData::Contact {
                name: name.to_string(),
                email: email.map(String::from),
                phone: None,
                address: None,
            },
        )
    }

    fn product(id: i64, name: &str) -> DedupRecord {
        record(
            id,
            RecordData::Product {
                name: name.to_string(),
                sku: None,
                description: None,
                price_cents: 0,
            },
        )
    }

    fn order(id: i64, contact_id: i64, status: &str, total_cents: i64, date: &str) -> DedupRecord {
        record(
            id,
            RecordData::Order {
                contact_id,
                status: status.to_string(),
                total_cents,
                ordered_on: date.parse().unwrap(),
            },
        )
    }

    // -- Basic grouping ------------------------------------------------------

    #[test]
    fn identical_emails_form_one_group() {
        let records = vec![
            contact(1, "Alice Adams", Some("a@x.com")),
            contact(2, "Bob Brown", Some("a@x.com")),
            contact(3, "Carol Clark", Some("c@y.com")),
        ];
        let groups = find_duplicate_groups(&records, 70.0).unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].records.len(), 2);
        assert_eq!(groups[0].match_type, "email");
        assert_eq!(groups[0].id, 1);
    }

    #[test]
    fn empty_and_single_inputs_yield_no_groups() {
        assert!(find_duplicate_groups(&[], 70.0).unwrap().is_empty());
        let one = vec![contact(1, "Alice", None)];
        assert!(find_duplicate_groups(&one, 70.0).unwrap().is_empty());
    }

    #[test]
    fn invalid_threshold_is_rejected_before_scanning() {
        let records = vec![contact(1, "A", None), contact(2, "B", None)];
        assert!(find_duplicate_groups(&records, 0.0).is_err());
        assert!(find_duplicate_groups(&records, 101.0).is_err());
    }

    #[test]
    fn group_without_any_matched_field_is_labelled_overall() {
        // Every field contributes below its matched threshold (totals 9%
        // apart score ~54, dates 3 days apart score 70, contact and status
        // disagree), yet the combined score ~30 clears a low threshold.
        let records = vec![
            order(1, 1, "pending", 10_000, "2026-03-01"),
            order(2, 2, "shipped", 11_000, "2026-03-04"),
        ];
        let groups = find_duplicate_groups(&records, 25.0).unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].match_type, MATCH_TYPE_OVERALL);
    }

    #[test]
    fn threshold_above_best_score_yields_no_groups() {
        // Fuzzy-name pair scores in the 90s but not 100.
        let records = vec![product(1, "Solar Panel 300W"), product(2, "Solar Pannel 300W")];
        let groups = find_duplicate_groups(&records, 99.9).unwrap();
        assert!(groups.is_empty());
    }

    // -- Transitivity --------------------------------------------------------

    #[test]
    fn fuzzy_name_variants_group_transitively() {
        // Spec scenario: three spellings of the same product name collapse
        // into a single group of three.
        let records = vec![
            product(1, "Solar Panel 300W"),
            product(2, "Solar Panel 300w"),
            product(3, "SOLAR PANEL 300 W"),
        ];
        let groups = find_duplicate_groups(&records, 70.0).unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].records.len(), 3);
        let ids: Vec<i64> = groups[0].records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    // -- Monotonicity --------------------------------------------------------

    #[test]
    fn raising_threshold_never_grows_groups() {
        let records = vec![
            contact(1, "Jane Doe", Some("jane@x.com")),
            contact(2, "Jane Doe", Some("jane@x.com")),
            contact(3, "Jan Doe", None),
            contact(4, "Janet Doering", None),
        ];

        let mut prev_group_count = usize::MAX;
        let mut prev_member_count = usize::MAX;
        for threshold in [60.0, 75.0, 90.0, 100.0] {
            let groups = find_duplicate_groups(&records, threshold).unwrap();
            let members: usize = groups.iter().map(|g| g.records.len()).sum();
            assert!(groups.len() <= prev_group_count);
            assert!(members <= prev_member_count);
            prev_group_count = groups.len();
            prev_member_count = members;
        }
    }

    // -- Determinism ---------------------------------------------------------

    #[test]
    fn groups_are_ordered_by_descending_score() {
        let records = vec![
            // Exact pair (score 100).
            product(1, "Inverter 5kW"),
            product(2, "Inverter 5kW"),
            // Fuzzy pair (high but below 100).
            product(3, "Solar Panel 300W"),
            product(4, "SOLAR PANEL 300 W"),
        ];
        let groups = find_duplicate_groups(&records, 70.0).unwrap();

        assert_eq!(groups.len(), 2);
        assert!(groups[0].score >= groups[1].score);
        assert_eq!(groups[0].id, 1);
        assert_eq!(groups[1].id, 2);
        assert_eq!(groups[0].records[0].id, 1);
    }

    #[test]
    fn repeated_scans_produce_identical_output() {
        let records = vec![
            contact(1, "Alice", Some("a@x.com")),
            contact(2, "Alicia", Some("a@x.com")),
            contact(3, "Bob", Some("b@x.com")),
            contact(4, "Robert", Some("b@x.com")),
        ];
        let first = find_duplicate_groups(&records, 70.0).unwrap();
        let second = find_duplicate_groups(&records, 70.0).unwrap();

        let shape =
            |gs: &[DuplicateGroup]| -> Vec<(usize, Vec<i64>)> {
                gs.iter()
                    .map(|g| (g.id, g.records.iter().map(|r| r.id).collect()))
                    .collect()
            };
        assert_eq!(shape(&first), shape(&second));
    }

    // -- Mixed kinds ---------------------------------------------------------

    #[test]
    fn different_kinds_never_group_together() {
        let records = vec![
            contact(1, "Solar Panel 300W", None),
            product(2, "Solar Panel 300W"),
        ];
        let groups = find_duplicate_groups(&records, 70.0).unwrap();
        assert!(groups.is_empty());
    }

    // -- Manual pairing ------------------------------------------------------

    #[test]
    fn manual_groups_pair_sequentially() {
        let records = vec![
            contact(10, "A", None),
            contact(20, "B", None),
            contact(30, "C", None),
            contact(40, "D", None),
            contact(50, "E", None),
        ];
        let groups = synthesize_manual_groups(&records);

        assert_eq!(groups.len(), 2);
        assert_eq!(
            groups[0].records.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![10, 20]
        );
        assert_eq!(
            groups[1].records.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![30, 40]
        );
        assert!(groups.iter().all(|g| g.match_type == MATCH_TYPE_MANUAL));
        assert!(groups.iter().all(|g| g.score == 0.0));
    }
}
