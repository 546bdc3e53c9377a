//! Capability indices from control limits and specification limits.
//!
//! The process width is the span between the control limits (`UCL - LCL`,
//! i.e. 6σ), and the specification width is the span the customer allows.
//!
//! | Specification | Spec width | Indices |
//! |---------------|------------|---------|
//! | LSL and USL | `USL - LSL` | Cp, Cp lower, Cp upper |
//! | LSL only | `mean - LSL` | Cp |
//! | USL only | `USL - mean` | Cp |
//!
//! # References
//!
//! - Montgomery (2019), *Introduction to Statistical Quality Control*, 8th ed.,
//!   Chapter 8.
//! - Kane (1986), "Process Capability Indices", *Journal of Quality Technology*
//!   18(1), pp. 41--52.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpcError};
use crate::spc::ControlLimits;

/// Lower and/or upper specification limits.
///
/// Both limits may be absent, in which case no capability is computed.
/// Deserialization applies the same validation as [`SpecLimits::new`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSpecLimits")]
pub struct SpecLimits {
    #[serde(skip_serializing_if = "Option::is_none")]
    lsl: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    usl: Option<f64>,
}

#[derive(Deserialize)]
struct RawSpecLimits {
    #[serde(default)]
    lsl: Option<f64>,
    #[serde(default)]
    usl: Option<f64>,
}

impl TryFrom<RawSpecLimits> for SpecLimits {
    type Error = SpcError;

    fn try_from(raw: RawSpecLimits) -> Result<Self> {
        Self::new(raw.lsl, raw.usl)
    }
}

impl SpecLimits {
    /// Creates specification limits.
    ///
    /// # Errors
    ///
    /// [`SpcError::InvalidSpecLimits`] if a limit is NaN or infinite, or if
    /// `usl <= lsl` when both are given.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_spc::SpecLimits;
    ///
    /// assert!(SpecLimits::new(Some(9.0), Some(11.0)).is_ok());
    /// assert!(SpecLimits::new(None, Some(11.0)).is_ok());
    /// assert!(SpecLimits::new(None, None).is_ok());
    /// assert!(SpecLimits::new(Some(11.0), Some(9.0)).is_err());
    /// ```
    pub fn new(lsl: Option<f64>, usl: Option<f64>) -> Result<Self> {
        if lsl.is_some_and(|l| !l.is_finite()) {
            return Err(SpcError::InvalidSpecLimits("LSL must be finite"));
        }
        if usl.is_some_and(|u| !u.is_finite()) {
            return Err(SpcError::InvalidSpecLimits("USL must be finite"));
        }
        if let (Some(l), Some(u)) = (lsl, usl) {
            if u <= l {
                return Err(SpcError::InvalidSpecLimits("USL must be greater than LSL"));
            }
        }
        Ok(Self { lsl, usl })
    }

    /// No specification limits.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn lsl(&self) -> Option<f64> {
        self.lsl
    }

    pub fn usl(&self) -> Option<f64> {
        self.usl
    }
}

/// Result of a capability calculation.
///
/// `cp_lower` and `cp_upper` are only present for two-sided specifications
/// and are omitted from serialized output otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityReport {
    /// Process mean (center line).
    pub mean: f64,
    /// Lower control limit.
    pub lcl: f64,
    /// Upper control limit.
    pub ucl: f64,
    /// `UCL - LCL`.
    pub process_width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lsl: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usl: Option<f64>,
    /// Allowed spread, see the module table.
    pub spec_width: f64,
    /// `spec_width / process_width`.
    pub cp: f64,
    /// `(mean - LSL) / (mean - LCL)`. Two-sided only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cp_lower: Option<f64>,
    /// `(USL - mean) / (UCL - mean)`. Two-sided only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cp_upper: Option<f64>,
}

impl CapabilityReport {
    /// The worse of the two one-sided indices, `min(cp_lower, cp_upper)`.
    pub fn cpk(&self) -> Option<f64> {
        match (self.cp_lower, self.cp_upper) {
            (Some(l), Some(u)) => Some(l.min(u)),
            _ => None,
        }
    }
}

/// Computes capability from control limits and specification limits.
///
/// Returns `Ok(None)` when neither LSL nor USL is given.
///
/// # Errors
///
/// [`SpcError::DegenerateProcess`] when `UCL == LCL` (zero variance), since
/// every index would divide by zero.
///
/// # Examples
///
/// ```
/// use u_spc::{compute_capability, ControlLimits, Sidedness, SpecLimits, StatisticsSummary};
///
/// let summary = StatisticsSummary::new(&[14.0, 15.0, 16.0]).unwrap();
/// let limits = ControlLimits::derive(&summary, Sidedness::Two);
/// let spec = SpecLimits::new(Some(10.0), Some(20.0)).unwrap();
///
/// let report = compute_capability(&limits, &spec).unwrap().unwrap();
/// assert!((report.process_width - 6.0).abs() < 1e-12);
/// assert!((report.cp - 10.0 / 6.0).abs() < 1e-12);
/// ```
pub fn compute_capability(
    limits: &ControlLimits,
    spec: &SpecLimits,
) -> Result<Option<CapabilityReport>> {
    if spec.lsl.is_none() && spec.usl.is_none() {
        return Ok(None);
    }

    let mean = limits.cl;
    let process_width = limits.process_width();
    if process_width == 0.0 {
        return Err(SpcError::DegenerateProcess);
    }

    let (spec_width, cp_lower, cp_upper) = match (spec.lsl, spec.usl) {
        (Some(l), Some(u)) => (
            u - l,
            Some((mean - l) / (mean - limits.lcl)),
            Some((u - mean) / (limits.ucl - mean)),
        ),
        (Some(l), None) => (mean - l, None, None),
        (None, Some(u)) => (u - mean, None, None),
        (None, None) => return Ok(None),
    };
    let cp = spec_width / process_width;
    debug!("capability: spec width {spec_width:.4}, process width {process_width:.4}, Cp {cp:.4}");

    Ok(Some(CapabilityReport {
        mean,
        lcl: limits.lcl,
        ucl: limits.ucl,
        process_width,
        lsl: spec.lsl,
        usl: spec.usl,
        spec_width,
        cp,
        cp_lower,
        cp_upper,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spc::Sidedness;
    use crate::summary::StatisticsSummary;
    use approx::assert_relative_eq;

    /// Limits with mean 15 and sigma 1: UCL 18, LCL 12.
    fn limits() -> ControlLimits {
        let summary = StatisticsSummary {
            mean: 15.0,
            sample_std: 1.0,
            min: 12.0,
            max: 18.0,
            count: 30,
        };
        ControlLimits::derive(&summary, Sidedness::Two)
    }

    // -----------------------------------------------------------------------
    // Construction tests
    // -----------------------------------------------------------------------

    #[test]
    fn spec_rejects_usl_leq_lsl() {
        assert!(SpecLimits::new(Some(10.0), Some(5.0)).is_err());
        assert!(SpecLimits::new(Some(5.0), Some(5.0)).is_err());
    }

    #[test]
    fn spec_rejects_non_finite() {
        assert!(SpecLimits::new(Some(f64::NAN), Some(1.0)).is_err());
        assert!(SpecLimits::new(Some(1.0), Some(f64::INFINITY)).is_err());
    }

    #[test]
    fn spec_accepts_one_sided_and_empty() {
        assert!(SpecLimits::new(Some(5.0), None).is_ok());
        assert!(SpecLimits::new(None, Some(5.0)).is_ok());
        assert_eq!(SpecLimits::new(None, None), Ok(SpecLimits::none()));
    }

    // -----------------------------------------------------------------------
    // Computation tests
    // -----------------------------------------------------------------------

    #[test]
    fn two_sided_capability() {
        let spec = SpecLimits::new(Some(10.0), Some(20.0)).unwrap();
        let report = compute_capability(&limits(), &spec).unwrap().unwrap();

        assert_relative_eq!(report.process_width, 6.0);
        assert_relative_eq!(report.spec_width, 10.0);
        assert_relative_eq!(report.cp, 10.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(report.cp_lower.unwrap(), 5.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(report.cp_upper.unwrap(), 5.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(report.cpk().unwrap(), 5.0 / 3.0, epsilon = 1e-12);
        assert_eq!(report.lsl, Some(10.0));
        assert_eq!(report.usl, Some(20.0));
    }

    #[test]
    fn off_center_cpk_is_worse_side() {
        let spec = SpecLimits::new(Some(9.0), Some(18.0)).unwrap();
        let report = compute_capability(&limits(), &spec).unwrap().unwrap();
        assert_relative_eq!(report.cp_lower.unwrap(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(report.cp_upper.unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(report.cpk().unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn upper_only_capability() {
        let spec = SpecLimits::new(None, Some(20.0)).unwrap();
        let report = compute_capability(&limits(), &spec).unwrap().unwrap();
        assert_relative_eq!(report.spec_width, 5.0);
        assert_relative_eq!(report.cp, 5.0 / 6.0, epsilon = 1e-12);
        assert!(report.cp_lower.is_none());
        assert!(report.cp_upper.is_none());
        assert!(report.cpk().is_none());
    }

    #[test]
    fn upper_only_report_omits_one_sided_keys() {
        let spec = SpecLimits::new(None, Some(20.0)).unwrap();
        let report = compute_capability(&limits(), &spec).unwrap().unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("cp").is_some());
        assert!(json.get("cp_lower").is_none());
        assert!(json.get("cp_upper").is_none());
        assert!(json.get("lsl").is_none());
    }

    #[test]
    fn lower_only_capability() {
        let spec = SpecLimits::new(Some(12.0), None).unwrap();
        let report = compute_capability(&limits(), &spec).unwrap().unwrap();
        assert_relative_eq!(report.spec_width, 3.0);
        assert_relative_eq!(report.cp, 0.5, epsilon = 1e-12);
        assert!(report.cp_lower.is_none());
    }

    #[test]
    fn zero_lsl_is_a_real_limit() {
        let spec = SpecLimits::new(Some(0.0), None).unwrap();
        let report = compute_capability(&limits(), &spec).unwrap().unwrap();
        assert_relative_eq!(report.spec_width, 15.0);
    }

    #[test]
    fn spec_deserialization_validates() {
        let spec: SpecLimits = serde_json::from_str(r#"{ "usl": 20.0 }"#).unwrap();
        assert_eq!(spec.usl(), Some(20.0));
        assert_eq!(spec.lsl(), None);
        assert!(serde_json::from_str::<SpecLimits>(r#"{ "lsl": 20.0, "usl": 10.0 }"#).is_err());
    }

    #[test]
    fn no_spec_limits_yields_nothing() {
        assert_eq!(compute_capability(&limits(), &SpecLimits::none()), Ok(None));
    }

    #[test]
    fn zero_variance_is_degenerate() {
        let summary = StatisticsSummary {
            mean: 15.0,
            sample_std: 0.0,
            min: 15.0,
            max: 15.0,
            count: 5,
        };
        let flat = ControlLimits::derive(&summary, Sidedness::Two);
        let spec = SpecLimits::new(Some(10.0), Some(20.0)).unwrap();
        assert_eq!(
            compute_capability(&flat, &spec),
            Err(SpcError::DegenerateProcess)
        );
        // Without a specification there is nothing to compute, degenerate or not.
        assert_eq!(compute_capability(&flat, &SpecLimits::none()), Ok(None));
    }
}
