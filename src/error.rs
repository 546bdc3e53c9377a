//! Error types for control-rule detection and capability analysis.

use thiserror::Error;

/// Errors surfaced by the SPC detector and capability calculator.
///
/// Rule evaluators themselves never fail: a sequence shorter than a rule's
/// window yields an all-clear result rather than an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpcError {
    /// Fewer points than the statistic requires.
    #[error("insufficient data: expected at least {expected} points, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// A measurement is NaN or infinite.
    #[error("measurement at index {index} is not finite")]
    NonFiniteValue { index: usize },

    /// Sidedness name not one of `two`, `one_upper`, `one_lower`.
    #[error("invalid sidedness `{0}`: expected \"two\", \"one_upper\", or \"one_lower\"")]
    InvalidSidedness(String),

    /// Rule identifier outside 1..=8.
    #[error("unknown rule id {0}: rules are numbered 1 through 8")]
    UnknownRuleId(u8),

    /// Process width (UCL - LCL) is zero, so capability indices are undefined.
    #[error("degenerate process: control limits coincide, capability is undefined")]
    DegenerateProcess,

    /// Specification limits are non-finite or out of order.
    #[error("invalid specification limits: {0}")]
    InvalidSpecLimits(&'static str),
}

/// Result type alias using [`SpcError`].
pub type Result<T> = std::result::Result<T, SpcError>;
