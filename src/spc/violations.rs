//! Sparse index → rule-id mapping built from per-rule results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::rules::{RuleId, RuleResult};

/// Violated rules per sequence index.
///
/// Only indices where at least one rule fired are present. The rule list at
/// each index is non-empty, ascending, and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViolationMap {
    entries: BTreeMap<usize, Vec<RuleId>>,
}

/// Merges rule results into a [`ViolationMap`].
///
/// Results may arrive in any order and with any length; an index is present
/// in the map exactly when some result flags it.
///
/// # Examples
///
/// ```
/// use u_spc::{aggregate, RuleId, StatisticsSummary, WindowMode};
///
/// let values = [0.0, 0.0, 0.0, 0.0, 10.0];
/// let summary = StatisticsSummary::new(&values).unwrap();
/// let results: Vec<_> = RuleId::ALL
///     .iter()
///     .map(|rule| rule.evaluate(&values, &summary, WindowMode::Compatible))
///     .collect();
/// let map = aggregate(&results);
/// assert!(map.is_empty());
/// ```
pub fn aggregate(results: &[RuleResult]) -> ViolationMap {
    let mut entries: BTreeMap<usize, Vec<RuleId>> = BTreeMap::new();
    for result in results {
        for index in result.flagged_indices() {
            entries.entry(index).or_default().push(result.rule());
        }
    }
    for rules in entries.values_mut() {
        rules.sort_unstable();
        rules.dedup();
    }
    ViolationMap { entries }
}

impl ViolationMap {
    /// Number of violated indices.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no rule fired anywhere.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rules violated at `index`, or `None` if the point is in control.
    pub fn get(&self, index: usize) -> Option<&[RuleId]> {
        self.entries.get(&index).map(Vec::as_slice)
    }

    /// Returns `true` if `rule` fired at `index`.
    pub fn contains(&self, index: usize, rule: RuleId) -> bool {
        self.get(index).is_some_and(|rules| rules.contains(&rule))
    }

    /// Violated indices, ascending.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.keys().copied()
    }

    /// `(index, rules)` pairs, ascending by index.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[RuleId])> + '_ {
        self.entries
            .iter()
            .map(|(&index, rules)| (index, rules.as_slice()))
    }

    /// Hover text for `index`, e.g. `Violated Rules: [1, 5]`.
    pub fn hover_label(&self, index: usize) -> Option<String> {
        self.get(index).map(|rules| {
            let numbers: Vec<String> = rules.iter().map(ToString::to_string).collect();
            format!("Violated Rules: [{}]", numbers.join(", "))
        })
    }
}
