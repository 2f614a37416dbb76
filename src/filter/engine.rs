//! Combined filter evaluation over the line store.
//!
//! Evaluation is a pure function of the current lines and the visible
//! filter set. Large stores are evaluated in parallel; results are
//! identical to the sequential path.

use super::matcher::Matcher;
use super::{Filter, FilterLogic, MatchType};
use crate::error::EngineError;
use crate::lines::LineStore;
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::warn;

/// Minimum number of lines before evaluation goes parallel.
/// Below this, thread overhead outweighs the win.
const PARALLEL_THRESHOLD: usize = 50_000;

/// Set of matching absolute line indices.
///
/// `None` is the distinguished "no filtering" state (no visible filters);
/// `Some` with an empty set is an active filter set that matches nothing.
pub type MatchingLines = Option<HashSet<usize>>;

/// Result of a filter evaluation.
#[derive(Debug)]
pub struct FilterOutcome {
    pub matching: MatchingLines,
    /// One `InvalidFilterPattern` per filter that failed to compile and
    /// was excluded from evaluation.
    pub warnings: Vec<EngineError>,
}

/// A filter compiled for evaluation.
struct CompiledRule {
    matcher: Matcher,
    inverse: bool,
}

impl CompiledRule {
    /// An inverse rule is satisfied when the pattern is absent.
    fn satisfied_by(&self, line: &str) -> bool {
        self.matcher.matches(line) != self.inverse
    }
}

/// Evaluate the visible filters against every line in the store.
pub fn evaluate(lines: &LineStore, filters: &[Filter], logic: FilterLogic) -> FilterOutcome {
    let mut warnings = Vec::new();
    let mut rules = Vec::new();

    for filter in filters.iter().filter(|f| f.visible) {
        match Matcher::compile(&filter.pattern, filter.case_sensitive) {
            Ok(matcher) => rules.push(CompiledRule {
                matcher,
                inverse: filter.match_type == MatchType::Inverse,
            }),
            Err(e) => {
                warn!(pattern = %filter.pattern, error = %e, "skipping filter with invalid pattern");
                warnings.push(EngineError::InvalidFilterPattern {
                    pattern: filter.pattern.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    if rules.is_empty() {
        return FilterOutcome {
            matching: None,
            warnings,
        };
    }

    let line_matches = |text: &str| match logic {
        FilterLogic::And => rules.iter().all(|r| r.satisfied_by(text)),
        FilterLogic::Or => rules.iter().any(|r| r.satisfied_by(text)),
    };

    let matching: HashSet<usize> = if lines.len() >= PARALLEL_THRESHOLD {
        (0..lines.len())
            .into_par_iter()
            .filter(|&idx| lines.get(idx).is_some_and(|text| line_matches(text)))
            .collect()
    } else {
        (0..lines.len())
            .filter(|&idx| lines.get(idx).is_some_and(|text| line_matches(text)))
            .collect()
    };

    FilterOutcome {
        matching: Some(matching),
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(lines: &[&str]) -> LineStore {
        LineStore::from_lines(lines.iter().map(|s| s.to_string()).collect())
    }

    fn sorted(matching: &MatchingLines) -> Vec<usize> {
        let mut v: Vec<usize> = matching.as_ref().unwrap().iter().copied().collect();
        v.sort_unstable();
        v
    }

    #[test]
    fn test_no_filters_means_unfiltered() {
        let lines = store(&["a", "b"]);
        let outcome = evaluate(&lines, &[], FilterLogic::And);
        assert!(outcome.matching.is_none());
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_active_filter_matching_nothing_is_empty_set() {
        let lines = store(&["a", "b"]);
        let outcome = evaluate(&lines, &[Filter::new("zzz")], FilterLogic::And);
        assert_eq!(outcome.matching, Some(HashSet::new()));
    }

    #[test]
    fn test_and_logic_requires_all_filters() {
        let lines = store(&[
            "error in task setup",
            "error elsewhere",
            "task teardown ok",
        ]);
        let filters = [Filter::new("error"), Filter::new("task")];
        let outcome = evaluate(&lines, &filters, FilterLogic::And);
        assert_eq!(sorted(&outcome.matching), vec![0]);
    }

    #[test]
    fn test_or_logic_requires_any_filter() {
        let lines = store(&[
            "error in task setup",
            "error elsewhere",
            "task teardown ok",
            "nothing here",
        ]);
        let filters = [Filter::new("error"), Filter::new("task")];
        let outcome = evaluate(&lines, &filters, FilterLogic::Or);
        assert_eq!(sorted(&outcome.matching), vec![0, 1, 2]);
    }

    #[test]
    fn test_or_is_superset_of_and() {
        let lines: LineStore = LineStore::from_lines(
            (0..200)
                .map(|i| format!("line {} {}", i, if i % 3 == 0 { "warn" } else { "info" }))
                .collect(),
        );
        let filters = [Filter::new("warn"), Filter::new("7")];

        let and = evaluate(&lines, &filters, FilterLogic::And)
            .matching
            .unwrap();
        let or = evaluate(&lines, &filters, FilterLogic::Or).matching.unwrap();

        assert!(and.is_subset(&or));
    }

    #[test]
    fn test_inverse_filter_selects_non_matching_lines() {
        let lines = store(&["debug noise", "error: boom", "debug more noise"]);
        let outcome = evaluate(&lines, &[Filter::inverse("debug")], FilterLogic::And);
        assert_eq!(sorted(&outcome.matching), vec![1]);
    }

    #[test]
    fn test_hidden_filter_is_excluded() {
        let lines = store(&["error", "info"]);
        let mut hidden = Filter::new("error");
        hidden.visible = false;

        let outcome = evaluate(&lines, &[hidden], FilterLogic::And);
        assert!(outcome.matching.is_none());
    }

    #[test]
    fn test_invalid_pattern_is_skipped_with_warning() {
        let lines = store(&["error one", "info two"]);
        let filters = [Filter::new("(["), Filter::new("error")];

        let outcome = evaluate(&lines, &filters, FilterLogic::And);
        assert_eq!(sorted(&outcome.matching), vec![0]);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(matches!(
            outcome.warnings[0],
            EngineError::InvalidFilterPattern { .. }
        ));
    }

    #[test]
    fn test_all_filters_invalid_falls_back_to_unfiltered() {
        let lines = store(&["a"]);
        let outcome = evaluate(&lines, &[Filter::new("([")], FilterLogic::And);
        assert!(outcome.matching.is_none());
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn test_case_sensitive_filter() {
        let lines = store(&["ERROR: up", "error: down"]);
        let mut filter = Filter::new("ERROR");
        filter.case_sensitive = true;

        let outcome = evaluate(&lines, &[filter], FilterLogic::And);
        assert_eq!(sorted(&outcome.matching), vec![0]);
    }

    #[test]
    fn test_determinism() {
        let lines: LineStore =
            LineStore::from_lines((0..5000).map(|i| format!("row {}", i)).collect());
        let filters = [Filter::new("7")];

        let a = evaluate(&lines, &filters, FilterLogic::And).matching;
        let b = evaluate(&lines, &filters, FilterLogic::And).matching;
        assert_eq!(a, b);
    }
}
