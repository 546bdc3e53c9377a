//! Detector configuration.
//!
//! Configuration is plain data and deserializes from any serde format, so a
//! chart layer can keep it next to its own presets:
//!
//! ```
//! use u_spc::{DetectorConfig, Sidedness, WindowMode};
//!
//! let config: DetectorConfig = serde_json::from_str(
//!     r#"{ "rules": { "exclude": [4, 8] }, "sidedness": "one_upper" }"#,
//! ).unwrap();
//! assert_eq!(config.sidedness, Sidedness::OneUpper);
//! assert_eq!(config.window_mode, WindowMode::Compatible);
//! assert_eq!(config.rules.resolve().unwrap().len(), 6);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::spc::{RuleId, Sidedness, WindowMode};

/// Which rules to evaluate, as raw rule numbers.
///
/// Numbers are validated by [`RuleSelection::resolve`], not at construction,
/// so a selection read from user input reports the offending id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSelection {
    /// Rules to evaluate. `None` selects all eight.
    pub include: Option<Vec<u8>>,
    /// Rules to skip, applied after `include`.
    pub exclude: Vec<u8>,
}

impl RuleSelection {
    /// Selects all eight rules.
    pub fn all() -> Self {
        Self::default()
    }

    /// Selects exactly `rules`.
    pub fn only(rules: impl IntoIterator<Item = u8>) -> Self {
        Self {
            include: Some(rules.into_iter().collect()),
            exclude: Vec::new(),
        }
    }

    /// Adds `rules` to the exclusion list.
    pub fn excluding(mut self, rules: impl IntoIterator<Item = u8>) -> Self {
        self.exclude.extend(rules);
        self
    }

    /// Validates every id and returns the rules to run, ascending and
    /// without duplicates.
    ///
    /// # Errors
    ///
    /// [`SpcError::UnknownRuleId`](crate::SpcError::UnknownRuleId) for the
    /// first id, in either list, outside 1..=8.
    pub fn resolve(&self) -> Result<Vec<RuleId>> {
        let excluded = self
            .exclude
            .iter()
            .map(|&n| RuleId::try_from(n))
            .collect::<Result<Vec<_>>>()?;

        let mut included = match &self.include {
            Some(numbers) => numbers
                .iter()
                .map(|&n| RuleId::try_from(n))
                .collect::<Result<Vec<_>>>()?,
            None => RuleId::ALL.to_vec(),
        };
        included.retain(|rule| !excluded.contains(rule));
        included.sort_unstable();
        included.dedup();
        Ok(included)
    }
}

/// Settings for [`ControlRuleDetector`](crate::ControlRuleDetector).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Rules to evaluate. Default: all eight.
    pub rules: RuleSelection,
    /// Sidedness recorded on the derived control limits. Default: two-sided.
    ///
    /// Sidedness never changes which rules fire.
    pub sidedness: Sidedness,
    /// End-of-sequence handling for rules 5 through 8. Default: compatible.
    pub window_mode: WindowMode,
}

impl DetectorConfig {
    /// Sets the rule selection.
    pub fn with_rules(mut self, rules: RuleSelection) -> Self {
        self.rules = rules;
        self
    }

    /// Sets the sidedness.
    pub fn with_sidedness(mut self, sidedness: Sidedness) -> Self {
        self.sidedness = sidedness;
        self
    }

    /// Sets the window mode.
    pub fn with_window_mode(mut self, window_mode: WindowMode) -> Self {
        self.window_mode = window_mode;
        self
    }
}
