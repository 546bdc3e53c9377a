//! The eight control rules for detecting non-random patterns.
//!
//! Each rule is a pure scan over the ordered measurements and the
//! [`StatisticsSummary`], producing a per-index flag. Rules share no state and
//! may run in any order or in parallel.
//!
//! | Rule | Pattern | Flagged index |
//! |------|---------|---------------|
//! | 1 | point not strictly within mean ± 3σ | the point |
//! | 2 | 9+ points in a row strictly on one side of the mean | 9th point onward |
//! | 3 | 6+ consecutive rises (or falls) | 6th step onward |
//! | 4 | 14+ points alternating up and down | 14th point onward |
//! | 5 | 2 of 3 beyond 2σ, all three on the same side | last of the triple |
//! | 6 | 4 of 5 beyond 1σ, all five on the same side | last of the five |
//! | 7 | 15 points strictly within mean ± σ | last of the fifteen |
//! | 8 | 8 points at least σ from the mean | see [`WindowMode`] |
//!
//! Running rules (2, 3, 4) treat ties as described on each evaluator.
//! Rule 1 flags a point lying exactly on ±3σ. Rules 5 through 7 compare
//! strictly, so a point on a 1σ or 2σ line does not count toward them, while
//! Rule 8 counts a point exactly σ from the mean.
//!
//! # References
//!
//! - Nelson, L.S. (1984). "The Shewhart Control Chart — Tests for Special Causes",
//!   *Journal of Quality Technology* 16(4), pp. 237-239.
//! - Western Electric (1956). *Statistical Quality Control Handbook*.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::chart::CONTROL_SIGMA;
use crate::error::SpcError;
use crate::summary::StatisticsSummary;

const SHIFT_RUN: usize = 9;
const TREND_STEPS: usize = 6;
const ALTERNATION_RUN: usize = 14;

const NEAR_LIMIT_WINDOW: usize = 3;
const NEAR_LIMIT_REQUIRED: usize = 2;
const WIDE_SHIFT_WINDOW: usize = 5;
const WIDE_SHIFT_REQUIRED: usize = 4;
const REDUCED_VARIATION_WINDOW: usize = 15;
const MIXTURE_WINDOW: usize = 8;

/// Identifier of one of the eight control rules.
///
/// Serializes as its rule number; deserializing a number outside 1..=8
/// fails with [`SpcError::UnknownRuleId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum RuleId {
    /// Rule 1: single point outside mean ± 3σ.
    BeyondLimits,
    /// Rule 2: nine or more points on the same side of the mean.
    NineOneSide,
    /// Rule 3: six or more consecutive rises or falls.
    Trend,
    /// Rule 4: fourteen or more points alternating in direction.
    FourteenAlternating,
    /// Rule 5: two of three points beyond 2σ on the same side.
    TwoOfThreeBeyond2Sigma,
    /// Rule 6: four of five points beyond 1σ on the same side.
    FourOfFiveBeyond1Sigma,
    /// Rule 7: fifteen points within 1σ of the mean.
    FifteenWithin1Sigma,
    /// Rule 8: eight points at least 1σ from the mean, either side.
    EightBeyond1Sigma,
}

impl RuleId {
    /// All rules in ascending order.
    pub const ALL: [RuleId; 8] = [
        RuleId::BeyondLimits,
        RuleId::NineOneSide,
        RuleId::Trend,
        RuleId::FourteenAlternating,
        RuleId::TwoOfThreeBeyond2Sigma,
        RuleId::FourOfFiveBeyond1Sigma,
        RuleId::FifteenWithin1Sigma,
        RuleId::EightBeyond1Sigma,
    ];

    /// The rule number, 1 through 8.
    pub fn number(self) -> u8 {
        match self {
            RuleId::BeyondLimits => 1,
            RuleId::NineOneSide => 2,
            RuleId::Trend => 3,
            RuleId::FourteenAlternating => 4,
            RuleId::TwoOfThreeBeyond2Sigma => 5,
            RuleId::FourOfFiveBeyond1Sigma => 6,
            RuleId::FifteenWithin1Sigma => 7,
            RuleId::EightBeyond1Sigma => 8,
        }
    }

    /// One-line description suitable for hover text.
    pub fn description(self) -> &'static str {
        match self {
            RuleId::BeyondLimits => "One point is more than 3 standard deviations from the mean",
            RuleId::NineOneSide => "Nine or more points in a row are on the same side of the mean",
            RuleId::Trend => "Six or more points in a row are continually increasing or decreasing",
            RuleId::FourteenAlternating => {
                "Fourteen or more points in a row alternate in direction"
            }
            RuleId::TwoOfThreeBeyond2Sigma => {
                "Two out of three points in a row are more than 2 standard deviations \
                 from the mean in the same direction"
            }
            RuleId::FourOfFiveBeyond1Sigma => {
                "Four out of five points in a row are more than 1 standard deviation \
                 from the mean in the same direction"
            }
            RuleId::FifteenWithin1Sigma => {
                "Fifteen points in a row are all within 1 standard deviation of the mean"
            }
            RuleId::EightBeyond1Sigma => {
                "Eight points in a row exist with none within 1 standard deviation of the mean"
            }
        }
    }

    /// Scans `values` for this rule's pattern.
    ///
    /// Never fails: a sequence too short for the rule's window yields an
    /// all-clear result.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_spc::{RuleId, StatisticsSummary, WindowMode};
    ///
    /// let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
    /// let summary = StatisticsSummary::new(&values).unwrap();
    /// let result = RuleId::Trend.evaluate(&values, &summary, WindowMode::Compatible);
    /// assert_eq!(result.flagged_indices().collect::<Vec<_>>(), vec![6]);
    /// ```
    pub fn evaluate(
        self,
        values: &[f64],
        summary: &StatisticsSummary,
        mode: WindowMode,
    ) -> RuleResult {
        let flags = match self {
            RuleId::BeyondLimits => beyond_limits(values, summary),
            RuleId::NineOneSide => nine_one_side(values, summary),
            RuleId::Trend => trend(values),
            RuleId::FourteenAlternating => fourteen_alternating(values),
            RuleId::TwoOfThreeBeyond2Sigma => two_of_three_beyond_2sigma(values, summary, mode),
            RuleId::FourOfFiveBeyond1Sigma => four_of_five_beyond_1sigma(values, summary, mode),
            RuleId::FifteenWithin1Sigma => fifteen_within_1sigma(values, summary, mode),
            RuleId::EightBeyond1Sigma => eight_beyond_1sigma(values, summary, mode),
        };
        RuleResult { rule: self, flags }
    }
}

impl From<RuleId> for u8 {
    fn from(rule: RuleId) -> u8 {
        rule.number()
    }
}

impl TryFrom<u8> for RuleId {
    type Error = SpcError;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        match number {
            1..=8 => Ok(RuleId::ALL[usize::from(number - 1)]),
            other => Err(SpcError::UnknownRuleId(other)),
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// How the sliding-window rules (5 through 8) treat the end of the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowMode {
    /// Reproduces the classic detector exactly.
    ///
    /// Windows start at `0..n - w`, so the final full window is never
    /// evaluated, and Rule 8 flags `start + 8`, one past its own window.
    #[default]
    Compatible,
    /// Evaluates every full window (`0..=n - w`) and flags each at its own
    /// last index, for all four sliding rules.
    Exhaustive,
}

impl WindowMode {
    fn window_count(self, len: usize, width: usize) -> usize {
        match self {
            WindowMode::Compatible => len.saturating_sub(width),
            WindowMode::Exhaustive => (len + 1).saturating_sub(width),
        }
    }
}

/// Per-index flags produced by one rule.
///
/// `code(i)` is the rule number where the rule fired and `0` elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleResult {
    rule: RuleId,
    flags: Vec<bool>,
}

impl RuleResult {
    /// The rule that produced these flags.
    pub fn rule(&self) -> RuleId {
        self.rule
    }

    /// Number of indices, equal to the sequence length.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Returns `true` if the scanned sequence was empty.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Returns `true` if the rule fired at `index`.
    pub fn is_flagged(&self, index: usize) -> bool {
        self.flags.get(index).copied().unwrap_or(false)
    }

    /// The rule number at `index` if the rule fired there, else `0`.
    pub fn code(&self, index: usize) -> u8 {
        if self.is_flagged(index) {
            self.rule.number()
        } else {
            0
        }
    }

    /// The full code sequence, one entry per index.
    pub fn codes(&self) -> Vec<u8> {
        (0..self.flags.len()).map(|i| self.code(i)).collect()
    }

    /// Indices where the rule fired, ascending.
    pub fn flagged_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter_map(|(i, &flagged)| flagged.then_some(i))
    }

    /// Number of flagged indices.
    pub fn violation_count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Orders `value` against `reference`; NaN compares as equal and is inert.
fn direction(value: f64, reference: f64) -> Ordering {
    value.partial_cmp(&reference).unwrap_or(Ordering::Equal)
}

/// A run of same-direction observations.
///
/// `Equal` observations are inert: they neither extend nor break the run.
#[derive(Debug, Clone, Copy, Default)]
struct Run {
    direction: Option<Ordering>,
    length: usize,
}

impl Run {
    fn push(self, direction: Ordering) -> Self {
        match direction {
            Ordering::Equal => self,
            d if self.direction == Some(d) => Run {
                direction: self.direction,
                length: self.length + 1,
            },
            d => Run {
                direction: Some(d),
                length: 1,
            },
        }
    }
}

/// A run of points whose step directions alternate.
///
/// Starts at length 1 (the first point). A flat step or two consecutive
/// steps in the same direction reset the run to zero.
#[derive(Debug, Clone, Copy)]
struct Alternation {
    last_step: Option<Ordering>,
    length: usize,
}

impl Alternation {
    const START: Alternation = Alternation {
        last_step: None,
        length: 1,
    };
    const BROKEN: Alternation = Alternation {
        last_step: None,
        length: 0,
    };

    fn push(self, step: Ordering) -> Self {
        match (step, self.last_step) {
            (Ordering::Equal, _) => Self::BROKEN,
            (s, Some(prev)) if s == prev => Self::BROKEN,
            (s, _) => Alternation {
                last_step: Some(s),
                length: self.length + 1,
            },
        }
    }
}

/// Flags `start + offset` for every evaluated window that `qualifies`.
fn sliding<F>(
    values: &[f64],
    width: usize,
    offset: usize,
    mode: WindowMode,
    qualifies: F,
) -> Vec<bool>
where
    F: Fn(&[f64]) -> bool,
{
    let mut flags = vec![false; values.len()];
    let count = mode.window_count(values.len(), width);
    for (start, window) in values.windows(width).take(count).enumerate() {
        if qualifies(window) {
            if let Some(flag) = flags.get_mut(start + offset) {
                *flag = true;
            }
        }
    }
    flags
}

/// True if every point is strictly on one side of `mean` and at least
/// `required` of them are strictly beyond `distance` on that side.
fn same_side_beyond(window: &[f64], mean: f64, distance: f64, required: usize) -> bool {
    if window.iter().all(|&x| x > mean) {
        let same_side_threshold = mean + distance;
        window.iter().filter(|&&x| x > same_side_threshold).count() >= required
    } else if window.iter().all(|&x| x < mean) {
        let same_side_threshold = mean - distance;
        window.iter().filter(|&&x| x < same_side_threshold).count() >= required
    } else {
        false
    }
}

// ---------------------------------------------------------------------------
// Rule evaluators
// ---------------------------------------------------------------------------

/// Rule 1: point not strictly within `(mean - 3σ, mean + 3σ)`.
///
/// A point exactly on UCL or LCL fires. With zero variance the open
/// interval is empty, so every point fires.
fn beyond_limits(values: &[f64], summary: &StatisticsSummary) -> Vec<bool> {
    let ucl = summary.mean + CONTROL_SIGMA * summary.sample_std;
    let lcl = summary.mean - CONTROL_SIGMA * summary.sample_std;
    values.iter().map(|&x| !(x > lcl && x < ucl)).collect()
}

/// Rule 2: nine or more points strictly on the same side of the mean.
///
/// A point equal to the mean is inert; once a run has reached nine, an
/// inert point inside it is flagged along with the run.
fn nine_one_side(values: &[f64], summary: &StatisticsSummary) -> Vec<bool> {
    let mean = summary.mean;
    values
        .iter()
        .scan(Run::default(), |run, &x| {
            *run = run.push(direction(x, mean));
            Some(run.length >= SHIFT_RUN)
        })
        .collect()
}

/// Rule 3: six or more consecutive steps in the same direction.
///
/// A point equal to its predecessor is inert and keeps the run alive.
fn trend(values: &[f64]) -> Vec<bool> {
    let steps = values.windows(2).scan(Run::default(), |run, pair| {
        *run = run.push(direction(pair[1], pair[0]));
        Some(run.length >= TREND_STEPS)
    });
    std::iter::once(false)
        .chain(steps)
        .take(values.len())
        .collect()
}

/// Rule 4: fourteen or more points whose steps alternate up and down.
fn fourteen_alternating(values: &[f64]) -> Vec<bool> {
    let steps = values.windows(2).scan(Alternation::START, |run, pair| {
        *run = run.push(direction(pair[1], pair[0]));
        Some(run.length >= ALTERNATION_RUN)
    });
    std::iter::once(false)
        .chain(steps)
        .take(values.len())
        .collect()
}

/// Rule 5: in a triple on one side of the mean, two or more beyond 2σ.
fn two_of_three_beyond_2sigma(
    values: &[f64],
    summary: &StatisticsSummary,
    mode: WindowMode,
) -> Vec<bool> {
    let two_sigma = 2.0 * summary.sample_std;
    sliding(
        values,
        NEAR_LIMIT_WINDOW,
        NEAR_LIMIT_WINDOW - 1,
        mode,
        |window| same_side_beyond(window, summary.mean, two_sigma, NEAR_LIMIT_REQUIRED),
    )
}

/// Rule 6: in five points on one side of the mean, four or more beyond 1σ.
fn four_of_five_beyond_1sigma(
    values: &[f64],
    summary: &StatisticsSummary,
    mode: WindowMode,
) -> Vec<bool> {
    sliding(
        values,
        WIDE_SHIFT_WINDOW,
        WIDE_SHIFT_WINDOW - 1,
        mode,
        |window| {
            same_side_beyond(
                window,
                summary.mean,
                summary.sample_std,
                WIDE_SHIFT_REQUIRED,
            )
        },
    )
}

/// Rule 7: fifteen points strictly within `(mean - σ, mean + σ)`.
fn fifteen_within_1sigma(
    values: &[f64],
    summary: &StatisticsSummary,
    mode: WindowMode,
) -> Vec<bool> {
    let upper_1s = summary.mean + summary.sample_std;
    let lower_1s = summary.mean - summary.sample_std;
    sliding(
        values,
        REDUCED_VARIATION_WINDOW,
        REDUCED_VARIATION_WINDOW - 1,
        mode,
        |window| window.iter().all(|&x| x > lower_1s && x < upper_1s),
    )
}

/// Rule 8: eight points each at least σ from the mean, sides mixed freely.
///
/// In [`WindowMode::Compatible`] the flag lands at `start + 8`.
fn eight_beyond_1sigma(values: &[f64], summary: &StatisticsSummary, mode: WindowMode) -> Vec<bool> {
    let offset = match mode {
        WindowMode::Compatible => MIXTURE_WINDOW,
        WindowMode::Exhaustive => MIXTURE_WINDOW - 1,
    };
    sliding(values, MIXTURE_WINDOW, offset, mode, |window| {
        window
            .iter()
            .all(|&x| (summary.mean - x).abs() >= summary.sample_std)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Summary with a known mean and sigma, independent of the values.
    fn summary(mean: f64, sample_std: f64) -> StatisticsSummary {
        StatisticsSummary {
            mean,
            sample_std,
            min: mean - 3.0 * sample_std,
            max: mean + 3.0 * sample_std,
            count: 0,
        }
    }

    fn flagged(rule: RuleId, values: &[f64], s: &StatisticsSummary, mode: WindowMode) -> Vec<usize> {
        rule.evaluate(values, s, mode).flagged_indices().collect()
    }

    fn compat(rule: RuleId, values: &[f64], s: &StatisticsSummary) -> Vec<usize> {
        flagged(rule, values, s, WindowMode::Compatible)
    }

    // --- Rule identifiers ---

    #[test]
    fn test_rule_id_numbers_round_trip() {
        for (i, rule) in RuleId::ALL.iter().enumerate() {
            assert_eq!(usize::from(rule.number()), i + 1);
            assert_eq!(RuleId::try_from(rule.number()).unwrap(), *rule);
        }
    }

    #[test]
    fn test_rule_id_rejects_unknown() {
        assert_eq!(RuleId::try_from(0), Err(SpcError::UnknownRuleId(0)));
        assert_eq!(RuleId::try_from(9), Err(SpcError::UnknownRuleId(9)));
    }

    #[test]
    fn test_rule_id_serde_as_number() {
        assert_eq!(serde_json::to_string(&RuleId::Trend).unwrap(), "3");
        let rule: RuleId = serde_json::from_str("7").unwrap();
        assert_eq!(rule, RuleId::FifteenWithin1Sigma);
        assert!(serde_json::from_str::<RuleId>("12").is_err());
    }

    #[test]
    fn test_result_codes() {
        let s = summary(25.0, 1.0);
        let result = RuleId::BeyondLimits.evaluate(&[25.0, 29.0, 25.0], &s, WindowMode::Compatible);
        assert_eq!(result.codes(), vec![0, 1, 0]);
        assert_eq!(result.violation_count(), 1);
        assert_eq!(result.code(10), 0);
    }

    // --- Rule 1: Beyond limits ---

    #[test]
    fn test_rule1_point_above_ucl() {
        let s = summary(25.0, 1.0);
        assert_eq!(compat(RuleId::BeyondLimits, &[25.0, 28.5, 25.0], &s), vec![1]);
    }

    #[test]
    fn test_rule1_point_below_lcl() {
        let s = summary(25.0, 1.0);
        assert_eq!(compat(RuleId::BeyondLimits, &[25.0, 21.0, 25.0], &s), vec![1]);
    }

    #[test]
    fn test_rule1_on_limit_is_violation() {
        let s = summary(25.0, 1.0);
        assert_eq!(compat(RuleId::BeyondLimits, &[28.0, 22.0], &s), vec![0, 1]);
        assert!(compat(RuleId::BeyondLimits, &[27.999, 22.001], &s).is_empty());
    }

    #[test]
    fn test_rule1_zero_variance_flags_every_point() {
        let s = summary(5.0, 0.0);
        assert_eq!(compat(RuleId::BeyondLimits, &[5.0; 4], &s), vec![0, 1, 2, 3]);
    }

    // --- Rule 2: 9 on same side ---

    #[test]
    fn test_rule2_nine_above() {
        let s = summary(25.0, 1.0);
        assert_eq!(compat(RuleId::NineOneSide, &[26.0; 9], &s), vec![8]);
    }

    #[test]
    fn test_rule2_eight_not_enough() {
        let s = summary(25.0, 1.0);
        assert!(compat(RuleId::NineOneSide, &[26.0; 8], &s).is_empty());
    }

    #[test]
    fn test_rule2_nine_below() {
        let s = summary(25.0, 1.0);
        assert_eq!(compat(RuleId::NineOneSide, &[24.0; 9], &s), vec![8]);
    }

    #[test]
    fn test_rule2_continuation() {
        let s = summary(25.0, 1.0);
        assert_eq!(compat(RuleId::NineOneSide, &[26.0; 10], &s), vec![8, 9]);
    }

    #[test]
    fn test_rule2_point_on_mean_is_inert() {
        let s = summary(25.0, 1.0);
        // Five above, one on the mean, four above: the run reaches nine at index 9.
        let mut values = vec![26.0; 5];
        values.push(25.0);
        values.extend([26.0; 4]);
        assert_eq!(compat(RuleId::NineOneSide, &values, &s), vec![9]);
    }

    #[test]
    fn test_rule2_point_on_mean_inside_long_run_is_flagged() {
        let s = summary(25.0, 1.0);
        let mut values = vec![26.0; 9];
        values.push(25.0);
        values.push(26.0);
        assert_eq!(compat(RuleId::NineOneSide, &values, &s), vec![8, 9, 10]);
    }

    #[test]
    fn test_rule2_side_change_restarts_run() {
        let values: Vec<f64> = [10.0; 9].iter().chain([0.0; 9].iter()).copied().collect();
        let s = StatisticsSummary::new(&values).unwrap();
        assert!((s.mean - 5.0).abs() < 1e-12);
        assert_eq!(compat(RuleId::NineOneSide, &values, &s), vec![8, 17]);
    }

    // --- Rule 3: trend ---

    #[test]
    fn test_rule3_seven_increasing_fires_at_sixth_step() {
        let s = summary(4.0, 2.0);
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        assert_eq!(compat(RuleId::Trend, &values, &s), vec![6]);
    }

    #[test]
    fn test_rule3_six_points_not_enough() {
        let s = summary(25.0, 1.0);
        let values = [20.0, 21.0, 22.0, 23.0, 24.0, 25.0];
        assert!(compat(RuleId::Trend, &values, &s).is_empty());
    }

    #[test]
    fn test_rule3_decreasing_continues() {
        let s = summary(25.0, 1.0);
        let values = [30.0, 29.0, 28.0, 27.0, 26.0, 25.0, 24.0, 23.0];
        assert_eq!(compat(RuleId::Trend, &values, &s), vec![6, 7]);
    }

    #[test]
    fn test_rule3_flat_step_is_inert() {
        let s = summary(4.0, 2.0);
        let values = [1.0, 2.0, 3.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        assert_eq!(compat(RuleId::Trend, &values, &s), vec![7]);
    }

    #[test]
    fn test_rule3_reversal_restarts() {
        let s = summary(4.0, 2.0);
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 4.0, 5.0, 6.0];
        assert!(compat(RuleId::Trend, &values, &s).is_empty());
    }

    #[test]
    fn test_rule3_single_point() {
        let s = summary(1.0, 1.0);
        assert!(compat(RuleId::Trend, &[1.0], &s).is_empty());
        assert_eq!(RuleId::Trend.evaluate(&[], &s, WindowMode::Compatible).len(), 0);
    }

    // --- Rule 4: alternation ---

    fn zigzag(n: usize) -> Vec<f64> {
        (0..n).map(|i| if i % 2 == 0 { 24.0 } else { 26.0 }).collect()
    }

    #[test]
    fn test_rule4_fifteen_alternating() {
        let s = summary(25.0, 1.0);
        assert_eq!(compat(RuleId::FourteenAlternating, &zigzag(15), &s), vec![13, 14]);
    }

    #[test]
    fn test_rule4_fourteen_alternating() {
        let s = summary(25.0, 1.0);
        assert_eq!(compat(RuleId::FourteenAlternating, &zigzag(14), &s), vec![13]);
    }

    #[test]
    fn test_rule4_thirteen_not_enough() {
        let s = summary(25.0, 1.0);
        assert!(compat(RuleId::FourteenAlternating, &zigzag(13), &s).is_empty());
    }

    #[test]
    fn test_rule4_same_direction_resets_to_zero() {
        let s = summary(25.0, 1.0);
        // Two rises break the run at index 2; counting restarts from zero
        // and reaches fourteen at index 16.
        let mut values = vec![24.0, 26.0, 27.0];
        values.extend(zigzag(14));
        assert_eq!(compat(RuleId::FourteenAlternating, &values, &s), vec![16]);
    }

    #[test]
    fn test_rule4_flat_step_resets() {
        let s = summary(25.0, 1.0);
        let mut values = zigzag(10);
        values.push(26.0);
        values.extend(zigzag(6));
        assert!(compat(RuleId::FourteenAlternating, &values, &s).is_empty());
    }

    // --- Rule 5: 2 of 3 beyond 2σ ---

    #[test]
    fn test_rule5_two_of_three_above() {
        let s = summary(25.0, 1.0);
        let values = [27.5, 25.5, 27.5, 25.0];
        assert_eq!(compat(RuleId::TwoOfThreeBeyond2Sigma, &values, &s), vec![2]);
    }

    #[test]
    fn test_rule5_two_of_three_below() {
        let s = summary(25.0, 1.0);
        let values = [22.5, 24.5, 22.5, 25.0];
        assert_eq!(compat(RuleId::TwoOfThreeBeyond2Sigma, &values, &s), vec![2]);
    }

    #[test]
    fn test_rule5_point_on_mean_blocks_triple() {
        let s = summary(25.0, 1.0);
        let values = [27.5, 25.0, 27.5, 25.0];
        assert!(compat(RuleId::TwoOfThreeBeyond2Sigma, &values, &s).is_empty());
    }

    #[test]
    fn test_rule5_not_triggered_mixed_sides() {
        let s = summary(25.0, 1.0);
        let values = [27.5, 22.5, 27.5, 25.0];
        assert!(compat(RuleId::TwoOfThreeBeyond2Sigma, &values, &s).is_empty());
    }

    #[test]
    fn test_rule5_threshold_is_strict() {
        let s = summary(25.0, 1.0);
        let values = [27.0, 25.5, 27.0, 25.0];
        assert!(compat(RuleId::TwoOfThreeBeyond2Sigma, &values, &s).is_empty());
    }

    #[test]
    fn test_rule5_final_triple_only_in_exhaustive_mode() {
        let s = summary(25.0, 1.0);
        let values = [27.5, 25.5, 27.5];
        assert!(compat(RuleId::TwoOfThreeBeyond2Sigma, &values, &s).is_empty());
        assert_eq!(
            flagged(RuleId::TwoOfThreeBeyond2Sigma, &values, &s, WindowMode::Exhaustive),
            vec![2]
        );
    }

    // --- Rule 6: 4 of 5 beyond 1σ ---

    #[test]
    fn test_rule6_four_of_five_above() {
        let s = summary(25.0, 1.0);
        let values = [26.5, 26.5, 25.5, 26.5, 26.5, 25.0];
        assert_eq!(compat(RuleId::FourOfFiveBeyond1Sigma, &values, &s), vec![4]);
    }

    #[test]
    fn test_rule6_three_of_five_not_enough() {
        let s = summary(25.0, 1.0);
        let values = [26.5, 25.5, 25.5, 26.5, 26.5, 25.0];
        assert!(compat(RuleId::FourOfFiveBeyond1Sigma, &values, &s).is_empty());
    }

    #[test]
    fn test_rule6_below() {
        let s = summary(25.0, 1.0);
        let values = [23.5, 23.5, 23.5, 24.5, 23.5, 23.5, 25.0];
        assert_eq!(compat(RuleId::FourOfFiveBeyond1Sigma, &values, &s), vec![4, 5]);
    }

    // --- Rule 7: 15 within 1σ ---

    #[test]
    fn test_rule7_fifteen_within() {
        let s = summary(25.0, 1.0);
        let values: Vec<f64> = (0..16).map(|i| 24.5 + (i as f64 % 3.0) * 0.25).collect();
        assert_eq!(compat(RuleId::FifteenWithin1Sigma, &values, &s), vec![14]);
    }

    #[test]
    fn test_rule7_fifteen_points_need_exhaustive_mode() {
        let s = summary(25.0, 1.0);
        let values = vec![25.5; 15];
        assert!(compat(RuleId::FifteenWithin1Sigma, &values, &s).is_empty());
        assert_eq!(
            flagged(RuleId::FifteenWithin1Sigma, &values, &s, WindowMode::Exhaustive),
            vec![14]
        );
    }

    #[test]
    fn test_rule7_boundary_point_breaks_window() {
        let s = summary(25.0, 1.0);
        let mut values = vec![25.5; 16];
        values[7] = 26.0;
        assert!(flagged(RuleId::FifteenWithin1Sigma, &values, &s, WindowMode::Exhaustive).is_empty());
    }

    #[test]
    fn test_rule7_short_sequence_is_all_clear() {
        let s = summary(25.0, 1.0);
        let result = RuleId::FifteenWithin1Sigma.evaluate(&[25.0; 4], &s, WindowMode::Exhaustive);
        assert_eq!(result.len(), 4);
        assert_eq!(result.violation_count(), 0);
    }

    // --- Rule 8: 8 beyond 1σ on either side ---

    #[test]
    fn test_rule8_flags_one_past_window_in_compatible_mode() {
        let s = summary(25.0, 1.0);
        let values = [27.0, 23.0, 27.0, 23.0, 27.0, 23.0, 27.0, 23.0, 25.0];
        assert_eq!(compat(RuleId::EightBeyond1Sigma, &values, &s), vec![8]);
    }

    #[test]
    fn test_rule8_flags_window_end_in_exhaustive_mode() {
        let s = summary(25.0, 1.0);
        let values = [27.0, 23.0, 27.0, 23.0, 27.0, 23.0, 27.0, 23.0];
        assert!(compat(RuleId::EightBeyond1Sigma, &values, &s).is_empty());
        assert_eq!(
            flagged(RuleId::EightBeyond1Sigma, &values, &s, WindowMode::Exhaustive),
            vec![7]
        );
    }

    #[test]
    fn test_rule8_exactly_one_sigma_counts() {
        let s = summary(25.0, 1.0);
        let values = [26.0, 24.0, 26.0, 24.0, 26.0, 24.0, 26.0, 24.0];
        assert_eq!(
            flagged(RuleId::EightBeyond1Sigma, &values, &s, WindowMode::Exhaustive),
            vec![7]
        );
    }

    #[test]
    fn test_rule8_seven_not_enough() {
        let s = summary(25.0, 1.0);
        let values = [27.0, 23.0, 27.0, 23.0, 27.0, 23.0, 27.0];
        assert!(flagged(RuleId::EightBeyond1Sigma, &values, &s, WindowMode::Exhaustive).is_empty());
    }

    #[test]
    fn test_short_sequences_never_fail() {
        let s = summary(0.0, 1.0);
        for rule in RuleId::ALL {
            for mode in [WindowMode::Compatible, WindowMode::Exhaustive] {
                let result = rule.evaluate(&[0.5, -0.5], &s, mode);
                assert_eq!(result.len(), 2);
            }
        }
    }
}
