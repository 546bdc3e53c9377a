//! End-to-end control-rule detection over a measurement sequence.
//!
//! [`ControlRuleDetector::analyze`] computes the summary and limits once,
//! evaluates the selected rules independently, and joins their results into
//! a [`ViolationMap`]. With the `parallel` feature the rules are evaluated
//! fork-join on the rayon pool; the output is identical either way.

use log::{debug, trace};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::chart::ControlLimits;
use super::rules::{RuleId, RuleResult, WindowMode};
use super::violations::{aggregate, ViolationMap};
use crate::capability::{compute_capability, CapabilityReport, SpecLimits};
use crate::config::DetectorConfig;
use crate::error::Result;
use crate::summary::StatisticsSummary;

/// Runs the configured control rules over measurement sequences.
///
/// # Examples
///
/// ```
/// use u_spc::{ControlRuleDetector, DetectorConfig, RuleId};
///
/// let mut values = vec![10.0; 9];
/// values.extend([0.0; 9]);
///
/// let detector = ControlRuleDetector::new(DetectorConfig::default()).unwrap();
/// let analysis = detector.analyze(&values).unwrap();
/// assert!(analysis.violations().contains(8, RuleId::NineOneSide));
/// assert!(analysis.violations().contains(17, RuleId::NineOneSide));
/// ```
#[derive(Debug, Clone)]
pub struct ControlRuleDetector {
    config: DetectorConfig,
    rules: Vec<RuleId>,
}

impl ControlRuleDetector {
    /// Creates a detector, validating the rule selection.
    ///
    /// # Errors
    ///
    /// [`SpcError::UnknownRuleId`](crate::SpcError::UnknownRuleId) if the
    /// selection names a rule outside 1..=8.
    pub fn new(config: DetectorConfig) -> Result<Self> {
        let rules = config.rules.resolve()?;
        Ok(Self { config, rules })
    }

    /// The configuration this detector was built from.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// The rules this detector evaluates, ascending.
    pub fn rules(&self) -> &[RuleId] {
        &self.rules
    }

    /// Analyzes an ordered measurement sequence.
    ///
    /// # Errors
    ///
    /// Fails if the summary cannot be computed: fewer than two points, or a
    /// non-finite value. Rule evaluation itself never fails.
    pub fn analyze(&self, values: &[f64]) -> Result<Analysis> {
        let summary = StatisticsSummary::new(values)?;
        let limits = ControlLimits::derive(&summary, self.config.sidedness);
        let results = evaluate_rules(&self.rules, values, &summary, self.config.window_mode);
        for result in &results {
            trace!(
                "rule {} fired at {} points",
                result.rule(),
                result.violation_count()
            );
        }
        let violations = aggregate(&results);
        debug!(
            "analyzed {} points with {} rules: {} points out of control",
            values.len(),
            self.rules.len(),
            violations.len()
        );

        Ok(Analysis {
            values: values.to_vec(),
            summary,
            limits,
            results,
            violations,
        })
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluate_rules(
    rules: &[RuleId],
    values: &[f64],
    summary: &StatisticsSummary,
    mode: WindowMode,
) -> Vec<RuleResult> {
    rules
        .iter()
        .map(|rule| rule.evaluate(values, summary, mode))
        .collect()
}

#[cfg(feature = "parallel")]
fn evaluate_rules(
    rules: &[RuleId],
    values: &[f64],
    summary: &StatisticsSummary,
    mode: WindowMode,
) -> Vec<RuleResult> {
    rules
        .par_iter()
        .map(|rule| rule.evaluate(values, summary, mode))
        .collect()
}

/// Output of one detector run, handed to the chart layer.
#[derive(Debug, Clone)]
pub struct Analysis {
    values: Vec<f64>,
    summary: StatisticsSummary,
    limits: ControlLimits,
    results: Vec<RuleResult>,
    violations: ViolationMap,
}

/// A violated point: index, measurement, and the rules it broke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViolatedPoint<'a> {
    /// Position in the analyzed sequence.
    pub index: usize,
    /// Measurement at `index`.
    pub value: f64,
    /// Rules violated at `index`, ascending.
    pub rules: &'a [RuleId],
}

impl Analysis {
    /// Summary the limits and rules were computed from.
    pub fn summary(&self) -> &StatisticsSummary {
        &self.summary
    }

    /// Control limits derived from the summary.
    pub fn limits(&self) -> &ControlLimits {
        &self.limits
    }

    /// Violated rules per index, merged across all evaluated rules.
    pub fn violations(&self) -> &ViolationMap {
        &self.violations
    }

    /// Per-rule results, ascending by rule.
    pub fn results(&self) -> &[RuleResult] {
        &self.results
    }

    /// The result of `rule`, if it was evaluated.
    pub fn result(&self, rule: RuleId) -> Option<&RuleResult> {
        self.results.iter().find(|r| r.rule() == rule)
    }

    /// Returns `true` if no evaluated rule fired.
    pub fn is_in_control(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violated points with their measurements, for drawing markers.
    pub fn violated_points(&self) -> impl Iterator<Item = ViolatedPoint<'_>> + '_ {
        self.violations
            .iter()
            .filter_map(move |(index, rules)| {
                self.values.get(index).map(|&value| ViolatedPoint {
                    index,
                    value,
                    rules,
                })
            })
    }

    /// Capability of the analyzed process against `spec`.
    ///
    /// # Errors
    ///
    /// [`SpcError::DegenerateProcess`](crate::SpcError::DegenerateProcess)
    /// if the sequence had zero variance and a specification was given.
    pub fn capability(&self, spec: &SpecLimits) -> Result<Option<CapabilityReport>> {
        compute_capability(&self.limits, spec)
    }
}
