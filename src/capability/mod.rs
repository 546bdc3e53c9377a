//! Process capability analysis.
//!
//! Compares the process spread implied by the control limits with the
//! spread the specification allows.
//!
//! # Indices
//!
//! - **Cp** — spec width over process width
//! - **Cp lower**, **Cp upper** — one-sided ratios for two-sided specs
//! - **Cpk** — the smaller of the two one-sided ratios
//!
//! # References
//!
//! - Montgomery (2019), *Introduction to Statistical Quality Control*, 8th ed.

mod indices;

pub use indices::{compute_capability, CapabilityReport, SpecLimits};
