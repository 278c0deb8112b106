//! Calibration Readouts
//!
//! A [`Readout`] is the copy of an estimator's derived values handed to
//! consumers. It carries enough to decide whether to apply the estimate.

use crate::constants::{RELIABILITY_HIGH_THRESHOLD, RELIABILITY_LOW_THRESHOLD};

/// Coarse reliability band
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReliabilityGrade {
    /// Fewer than two observations; nothing to trust yet
    Cold,
    /// Below [`RELIABILITY_LOW_THRESHOLD`]
    Low,
    /// Between the thresholds
    Moderate,
    /// At or above [`RELIABILITY_HIGH_THRESHOLD`]
    High,
}

/// Derived values of a normalisation estimator
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Readout {
    /// Running mean of the observations
    pub mean: f64,
    /// Mean linear deviation
    pub mld: f64,
    /// Reliability in [0, 100]
    pub reliability: f64,
    /// Observations folded in so far
    pub sample_count: u64,
}

impl Readout {
    /// Mean is still the cold-start placeholder
    pub fn is_cold(&self) -> bool {
        self.sample_count < 2
    }

    /// Reliability band, `Cold` before the second observation
    pub fn grade(&self) -> ReliabilityGrade {
        if self.is_cold() {
            ReliabilityGrade::Cold
        } else if self.reliability >= RELIABILITY_HIGH_THRESHOLD {
            ReliabilityGrade::High
        } else if self.reliability >= RELIABILITY_LOW_THRESHOLD {
            ReliabilityGrade::Moderate
        } else {
            ReliabilityGrade::Low
        }
    }

    /// Warm and at least `min_reliability`
    pub fn is_trusted(&self, min_reliability: f64) -> bool {
        !self.is_cold() && self.reliability >= min_reliability
    }
}
