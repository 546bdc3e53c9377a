//! Control limits, sidedness, and the sigma-zone table.
//!
//! The limits are derived once from a [`StatisticsSummary`] and consumed by
//! the chart layer to draw lines and shaded zones. Sidedness only changes
//! which lines and zones are meaningful; every limit is always computed.
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - Western Electric (1956). *Statistical Quality Control Handbook*.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpcError};
use crate::summary::StatisticsSummary;

/// Number of sigma between the center line and UCL/LCL.
pub const CONTROL_SIGMA: f64 = 3.0;

/// Multiple of `UCL - CL` the outermost zones extend past the limits.
const OUTER_ZONE_SPAN: f64 = 5.0;

/// Which side(s) of the center line carry meaningful control limits.
///
/// Deserializes through [`FromStr`], so an unknown name in configuration
/// reports [`SpcError::InvalidSidedness`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Sidedness {
    /// Limits above and below the mean.
    #[default]
    Two,
    /// Only the upper limits are meaningful.
    OneUpper,
    /// Only the lower limits are meaningful.
    OneLower,
}

impl Sidedness {
    /// The name used in configuration (`two`, `one_upper`, `one_lower`).
    pub fn as_str(self) -> &'static str {
        match self {
            Sidedness::Two => "two",
            Sidedness::OneUpper => "one_upper",
            Sidedness::OneLower => "one_lower",
        }
    }

    fn shows_upper(self) -> bool {
        !matches!(self, Sidedness::OneLower)
    }

    fn shows_lower(self) -> bool {
        !matches!(self, Sidedness::OneUpper)
    }
}

impl FromStr for Sidedness {
    type Err = SpcError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "two" => Ok(Sidedness::Two),
            "one_upper" => Ok(Sidedness::OneUpper),
            "one_lower" => Ok(Sidedness::OneLower),
            other => Err(SpcError::InvalidSidedness(other.to_string())),
        }
    }
}

impl TryFrom<String> for Sidedness {
    type Error = SpcError;

    fn try_from(name: String) -> Result<Self> {
        name.parse()
    }
}

impl fmt::Display for Sidedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Control limits for an individuals chart.
///
/// # Invariants
///
/// - `lcl <= lower_2sigma <= lower_1sigma <= cl <= upper_1sigma <= upper_2sigma <= ucl`
/// - With zero variance all boundaries equal `cl`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlLimits {
    /// Upper control limit (CL + 3 sigma).
    pub ucl: f64,
    /// Center line (process mean).
    pub cl: f64,
    /// Lower control limit (CL - 3 sigma).
    pub lcl: f64,
    /// CL + 1 sigma.
    pub upper_1sigma: f64,
    /// CL - 1 sigma.
    pub lower_1sigma: f64,
    /// CL + 2 sigma.
    pub upper_2sigma: f64,
    /// CL - 2 sigma.
    pub lower_2sigma: f64,
    /// Sample standard deviation the limits were built from.
    pub sigma: f64,
    /// Which limits the chart layer should draw.
    pub sidedness: Sidedness,
}

/// One shaded band of the zone table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneBand {
    /// Beyond UCL.
    Plus2,
    /// Between +1 sigma and UCL.
    Plus1,
    /// Within 1 sigma of the mean.
    Center,
    /// Between LCL and -1 sigma.
    Minus1,
    /// Beyond LCL.
    Minus2,
}

impl ZoneBand {
    /// Chart label of the band (`+2`, `+1`, `0`, `-1`, `-2`).
    pub fn label(self) -> &'static str {
        match self {
            ZoneBand::Plus2 => "+2",
            ZoneBand::Plus1 => "+1",
            ZoneBand::Center => "0",
            ZoneBand::Minus1 => "-1",
            ZoneBand::Minus2 => "-2",
        }
    }

    /// Severity level used to pick a zone color (0, 1 or 2).
    pub fn level(self) -> u8 {
        match self {
            ZoneBand::Center => 0,
            ZoneBand::Plus1 | ZoneBand::Minus1 => 1,
            ZoneBand::Plus2 | ZoneBand::Minus2 => 2,
        }
    }
}

/// A y-range of the chart belonging to one [`ZoneBand`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Which band this range shades.
    pub band: ZoneBand,
    /// Bottom of the range.
    pub lower: f64,
    /// Top of the range.
    pub upper: f64,
}

/// A labelled horizontal line (mean, sigma lines, control limits).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LimitLine {
    /// Legend label (`Mean`, `+1S`, `UCL`, ...).
    pub label: &'static str,
    /// Y value of the line.
    pub value: f64,
}

impl ControlLimits {
    /// Derives all limits from `summary`.
    ///
    /// Every boundary is computed regardless of `sidedness`.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_spc::{ControlLimits, Sidedness, StatisticsSummary};
    ///
    /// let summary = StatisticsSummary::new(&[9.0, 10.0, 11.0]).unwrap();
    /// let limits = ControlLimits::derive(&summary, Sidedness::Two);
    /// assert!((limits.ucl - 13.0).abs() < 1e-12);
    /// assert!((limits.lcl - 7.0).abs() < 1e-12);
    /// ```
    pub fn derive(summary: &StatisticsSummary, sidedness: Sidedness) -> Self {
        let cl = summary.mean;
        let sigma = summary.sample_std;
        Self {
            ucl: cl + CONTROL_SIGMA * sigma,
            cl,
            lcl: cl - CONTROL_SIGMA * sigma,
            upper_1sigma: cl + sigma,
            lower_1sigma: cl - sigma,
            upper_2sigma: cl + 2.0 * sigma,
            lower_2sigma: cl - 2.0 * sigma,
            sigma,
            sidedness,
        }
    }

    /// Derives limits from a sidedness given by name.
    ///
    /// # Errors
    ///
    /// [`SpcError::InvalidSidedness`] if `sidedness` is not `two`,
    /// `one_upper`, or `one_lower`.
    pub fn derive_named(summary: &StatisticsSummary, sidedness: &str) -> Result<Self> {
        Ok(Self::derive(summary, sidedness.parse()?))
    }

    /// Width of the process, `UCL - LCL`.
    pub fn process_width(&self) -> f64 {
        self.ucl - self.lcl
    }

    /// The zone table, ordered from the top of the chart down.
    ///
    /// With `spacer = UCL - CL`, the outer zones extend `5 * spacer` past
    /// the control limits. For one-sided limits the zones on the
    /// uncontrolled side are dropped and the center zone absorbs their span.
    pub fn zones(&self) -> Vec<Zone> {
        let spacer = self.ucl - self.cl;
        let top = self.ucl + OUTER_ZONE_SPAN * spacer;
        let bottom = self.lcl - OUTER_ZONE_SPAN * spacer;
        let upper = self.sidedness.shows_upper();
        let lower = self.sidedness.shows_lower();

        let mut zones = Vec::with_capacity(5);
        if upper {
            zones.push(Zone {
                band: ZoneBand::Plus2,
                lower: self.ucl,
                upper: top,
            });
            zones.push(Zone {
                band: ZoneBand::Plus1,
                lower: self.upper_1sigma,
                upper: self.ucl,
            });
        }
        zones.push(Zone {
            band: ZoneBand::Center,
            lower: if lower { self.lower_1sigma } else { bottom },
            upper: if upper { self.upper_1sigma } else { top },
        });
        if lower {
            zones.push(Zone {
                band: ZoneBand::Minus1,
                lower: self.lcl,
                upper: self.lower_1sigma,
            });
            zones.push(Zone {
                band: ZoneBand::Minus2,
                lower: bottom,
                upper: self.lcl,
            });
        }
        zones
    }

    /// The labelled lines a chart should draw for this sidedness.
    pub fn visible_lines(&self) -> Vec<LimitLine> {
        let upper = self.sidedness.shows_upper();
        let lower = self.sidedness.shows_lower();
        [
            ("Mean", self.cl, true),
            ("-1S", self.lower_1sigma, lower),
            ("+1S", self.upper_1sigma, upper),
            ("UCL", self.ucl, upper),
            ("LCL", self.lcl, lower),
        ]
        .into_iter()
        .filter(|&(_, _, shown)| shown)
        .map(|(label, value, _)| LimitLine { label, value })
        .collect()
    }
}
