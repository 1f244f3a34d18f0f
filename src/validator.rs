//! # Validator
//!
//! Compares a candidate query's executed result table against the
//! target output table supplied by the Example (spec §4.5), deciding
//! whether the candidate is the winning program.
//!
//! Row order is not significant — Cypher makes no ordering guarantee in
//! the absence of `ORDER BY`, and this synthesizer does not synthesize
//! one — so both tables are normalized by sorting their row multiset
//! lexicographically before comparison (spec §4.5 "Rationale").

use crate::executor::Table;

/// Compares executed results against a target table (spec §4.5).
pub struct Validator;

impl Validator {
    /// `validate(result, target) -> bool`.
    ///
    /// True iff `result` and `target` have equal row counts and, once
    /// both are sorted as a multiset of row-tuples, are element-wise
    /// equal. Column order is significant (it comes from
    /// `fixed_return.properties` on both sides); row order is not.
    pub fn validate(result: &Table, target: &Table) -> bool {
        if result.rows.len() != target.rows.len() {
            return false;
        }
        let mut sorted_result = result.rows.clone();
        let mut sorted_target = target.rows.clone();
        sorted_result.sort();
        sorted_target.sort();
        sorted_result == sorted_target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: Vec<Vec<&str>>) -> Table {
        Table {
            columns: vec!["name".to_string()],
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(str::to_string).collect())
                .collect(),
        }
    }

    #[test]
    fn accepts_identical_row_order() {
        let result = table(vec![vec!["Ada"], vec!["Grace"]]);
        let target = table(vec![vec!["Ada"], vec!["Grace"]]);
        assert!(Validator::validate(&result, &target));
    }

    #[test]
    fn accepts_permuted_row_order() {
        let result = table(vec![vec!["Grace"], vec!["Ada"]]);
        let target = table(vec![vec!["Ada"], vec!["Grace"]]);
        assert!(Validator::validate(&result, &target));
    }

    #[test]
    fn rejects_mismatched_row_count() {
        let result = table(vec![vec!["Ada"]]);
        let target = table(vec![vec!["Ada"], vec!["Grace"]]);
        assert!(!Validator::validate(&result, &target));
    }

    #[test]
    fn rejects_different_values() {
        let result = table(vec![vec!["Ada"], vec!["Grace"]]);
        let target = table(vec![vec!["Ada"], vec!["Lovelace"]]);
        assert!(!Validator::validate(&result, &target));
    }

    #[test]
    fn rejects_duplicate_row_masking_a_missing_value() {
        // Same multiset size, but "Ada" appears twice instead of once
        // alongside "Grace" -- must not be conflated with a true match.
        let result = table(vec![vec!["Ada"], vec!["Ada"]]);
        let target = table(vec![vec!["Ada"], vec!["Grace"]]);
        assert!(!Validator::validate(&result, &target));
    }
}
