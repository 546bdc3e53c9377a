//! # u-spc
//!
//! Control-rule violation detection and process capability for statistical
//! process control (SPC).
//!
//! The crate operates on an ordered sequence of raw `f64` measurements. It
//! knows nothing about row keys, timestamps, or rendering; a chart layer
//! consumes the control limits and the sparse violation map it produces.
//!
//! ## Modules
//!
//! - [`spc`] — The eight run rules, control limits, zones, and the detector
//! - [`capability`] — Cp, Cp lower/upper, and Cpk against specification limits
//! - [`config`] — Rule selection and detector settings
//! - [`summary`] — Mean and sample standard deviation of the sequence
//! - [`error`] — Error type shared by all modules
//!
//! ## Example
//!
//! ```
//! use u_spc::{ControlRuleDetector, DetectorConfig, SpecLimits};
//!
//! let values = [10.2, 9.8, 10.1, 9.9, 10.0, 10.3, 9.7, 10.0, 14.0];
//! let detector = ControlRuleDetector::new(DetectorConfig::default()).unwrap();
//! let analysis = detector.analyze(&values).unwrap();
//!
//! for point in analysis.violated_points() {
//!     println!("{} at {}: rules {:?}", point.value, point.index, point.rules);
//! }
//!
//! let spec = SpecLimits::new(Some(8.0), Some(12.0)).unwrap();
//! let report = analysis.capability(&spec).unwrap().unwrap();
//! assert!(report.cp > 0.0);
//! ```

pub mod capability;
pub mod config;
pub mod error;
pub mod spc;
pub mod summary;

pub use capability::{compute_capability, CapabilityReport, SpecLimits};
pub use config::{DetectorConfig, RuleSelection};
pub use error::{Result, SpcError};
pub use spc::{
    aggregate, Analysis, ControlLimits, ControlRuleDetector, RuleId, RuleResult, Sidedness,
    ViolationMap, WindowMode,
};
pub use summary::StatisticsSummary;
