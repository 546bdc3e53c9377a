//! Descriptive statistics of a measurement sequence.
//!
//! The summary is computed once and shared read-only by every rule
//! evaluator and by the control limits. Callers that want to exclude points
//! filter the sequence before construction.

use serde::{Deserialize, Serialize};
use u_numflow::stats;

use crate::error::{Result, SpcError};

/// Mean, sample standard deviation, and range of a measurement sequence.
///
/// # Invariants
///
/// - `count >= 2`
/// - `sample_std >= 0` and uses the `n - 1` denominator
/// - `min <= mean <= max`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSummary {
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (Bessel-corrected).
    pub sample_std: f64,
    /// Smallest measurement.
    pub min: f64,
    /// Largest measurement.
    pub max: f64,
    /// Number of measurements.
    pub count: usize,
}

impl StatisticsSummary {
    /// Minimum number of points for a defined sample standard deviation.
    pub const MIN_POINTS: usize = 2;

    /// Computes the summary of `values`.
    ///
    /// A sequence with zero variance yields `sample_std == 0.0`; the control
    /// limits then collapse onto the mean.
    ///
    /// # Errors
    ///
    /// - [`SpcError::NonFiniteValue`] if any value is NaN or infinite
    /// - [`SpcError::InsufficientData`] if fewer than 2 values are given
    ///
    /// # Examples
    ///
    /// ```
    /// use u_spc::StatisticsSummary;
    ///
    /// let summary = StatisticsSummary::new(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
    /// assert!((summary.mean - 5.0).abs() < 1e-12);
    /// assert!((summary.sample_std - 2.138_089_935_299_395).abs() < 1e-12);
    /// ```
    pub fn new(values: &[f64]) -> Result<Self> {
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(SpcError::NonFiniteValue { index });
        }
        let insufficient = || SpcError::InsufficientData {
            expected: Self::MIN_POINTS,
            actual: values.len(),
        };
        if values.len() < Self::MIN_POINTS {
            return Err(insufficient());
        }

        let mean = stats::mean(values).ok_or_else(insufficient)?;
        let sample_std = stats::std_dev(values).ok_or_else(insufficient)?;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Ok(Self {
            mean,
            sample_std,
            min,
            max,
            count: values.len(),
        })
    }
}
