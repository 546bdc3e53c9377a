//! Control-rule violation detection.
//!
//! Scans an ordered measurement sequence for out-of-control signatures using
//! the eight classic run rules, and derives the control limits and zone table
//! a chart draws them against.
//!
//! # Pipeline
//!
//! 1. [`StatisticsSummary`](crate::StatisticsSummary) — mean and sample σ, once
//! 2. [`ControlLimits`] — UCL/LCL, ±1σ, ±2σ, zones
//! 3. [`RuleId::evaluate`] — eight independent scans, one [`RuleResult`] each
//! 4. [`aggregate`] — sparse [`ViolationMap`] of index → violated rules
//!
//! [`ControlRuleDetector`] runs all four steps from a [`DetectorConfig`](crate::DetectorConfig).
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - Nelson, L.S. (1984). "The Shewhart Control Chart — Tests for Special Causes",
//!   *Journal of Quality Technology* 16(4), pp. 237-239.

mod chart;
mod detector;
mod rules;
mod violations;

pub use chart::{ControlLimits, LimitLine, Sidedness, Zone, ZoneBand, CONTROL_SIGMA};
pub use detector::{Analysis, ControlRuleDetector, ViolatedPoint};
pub use rules::{RuleId, RuleResult, WindowMode};
pub use violations::{aggregate, ViolationMap};
