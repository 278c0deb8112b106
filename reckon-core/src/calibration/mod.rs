//! Online Calibration of Raw Sensors Against a Trusted Reference
//!
//! ## Overview
//!
//! A dead-reckoning engine integrates sensors it cannot trust on their own:
//! wheel-tick counters whose metres-per-tick depends on tyre pressure, gyros
//! whose zero drifts with temperature. Whenever an independent reference
//! (GNSS speed, GNSS course) is accurate enough, this module learns the
//! relationship
//!
//! ```text
//! raw = reference / scale + bias        ⇔        reference = (raw − bias) · scale
//! ```
//!
//! one bracket at a time, without storing history.
//!
//! ## Data Flow
//!
//! ```text
//! reference (value, accuracy) ─► accuracy gate ─┐
//!                                               ├─► strategy ─► NormalisationEstimator
//! sensor value ─────────────────► armed? ───────┘    (bracket)     (mean, mld, reliability)
//! ```
//!
//! ## Channel States
//!
//! ```text
//!            accepted ref          sensor
//!   Empty ───────────────► Armed ─────────► Calibrating ◄─┐
//!     ▲                      │                  │  │      │ accepted ref: close bracket
//!     └──── rejected ref ────┴──────────────────┘  └──────┘ sensor: accumulate
//! ```
//!
//! A rejected reference (unknown accuracy or accuracy not strictly below the
//! channel limit) always returns the channel to `Empty` and discards the
//! partial bracket.
//!
//! ## Strategies
//!
//! - [`BracketRatio`] - sums of reference increments against sums of sensor
//!   increments; the scale of counters such as wheel ticks
//! - [`BracketFit`] - running least-squares line through (held reference,
//!   bracket mean) pairs; bias and scale of level sensors
//! - [`SpanStrategy`] - min/max span of instantaneous pairs; the older
//!   heuristic, kept selectable

mod calibrator;
mod normalisation;
mod readout;
mod strategy;

pub use calibrator::ScaleCalibrator;
pub use normalisation::{NormalisationEstimator, NormalisationSnapshot};
pub use readout::{Readout, ReliabilityGrade};
pub use strategy::{AxisStrategy, BracketFit, BracketRatio, SpanStrategy};

use crate::{
    constants::{DEFAULT_BIAS_ACCURACY_LIMIT, DEFAULT_SCALE_ACCURACY_LIMIT},
    errors::{CalibrationError, CalibrationResult},
    time::Timestamp,
};

/// One sample of a reference or sensor stream
///
/// Accuracy is lower-is-better. `None` means the producer could not say how
/// good the value is, and such a sample never passes an accuracy gate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorSample {
    /// When the sample was taken
    pub timestamp: Timestamp,
    /// Raw value
    pub value: f64,
    /// One-sigma accuracy, if known
    pub accuracy: Option<f64>,
}

impl SensorSample {
    /// Sample with a known accuracy
    pub fn new(timestamp: Timestamp, value: f64, accuracy: f64) -> Self {
        Self {
            timestamp,
            value,
            accuracy: Some(accuracy),
        }
    }

    /// Sample whose accuracy is unknown
    pub fn unknown(timestamp: Timestamp, value: f64) -> Self {
        Self {
            timestamp,
            value,
            accuracy: None,
        }
    }

    /// Whether this sample passes an accuracy gate
    pub fn passes(&self, accuracy_limit: f64) -> bool {
        accuracy_passes(self.accuracy, accuracy_limit)
    }
}

/// Accuracy gate shared by every channel
///
/// Accepts a known, finite, non-negative accuracy strictly below the limit.
pub(crate) fn accuracy_passes(accuracy: Option<f64>, accuracy_limit: f64) -> bool {
    matches!(accuracy, Some(a) if a.is_finite() && a >= 0.0 && a < accuracy_limit)
}

/// Which quantity a channel estimates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ChannelRole {
    /// Additive offset, in raw sensor units
    Bias,
    /// Reference units per raw sensor unit
    Scale,
}

/// Gate state of one calibration channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelState {
    /// No trusted reference since start or since the last rejection
    #[default]
    Empty,
    /// Trusted reference seen, waiting for sensor samples
    Armed,
    /// Reference and sensor both seen; accepted references close brackets
    Calibrating,
}

/// Strategy pair used by an orchestrated axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CalibrationMode {
    /// Least-squares fit over bracket means
    #[default]
    Bracket,
    /// Min/max span of instantaneous pairs
    Span,
    /// Increment ratio for the scale, least-squares fit for the bias
    Ratio,
}

/// Configuration of a single calibration channel
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelConfig {
    /// References must report an accuracy strictly below this value
    pub accuracy_limit: f64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SCALE_ACCURACY_LIMIT)
    }
}

impl ChannelConfig {
    /// Channel gated at `accuracy_limit`
    pub const fn new(accuracy_limit: f64) -> Self {
        Self { accuracy_limit }
    }

    /// Reject limits that can never accept or never reject
    pub fn validate(&self) -> CalibrationResult<()> {
        let limit = self.accuracy_limit;
        if limit.is_finite() && limit > 0.0 {
            Ok(())
        } else {
            Err(CalibrationError::InvalidAccuracyLimit { limit })
        }
    }
}

/// Configuration of one orchestrated sensor axis
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisConfig {
    /// Gate for the bias channel
    pub bias: ChannelConfig,
    /// Gate for the scale channel
    pub scale: ChannelConfig,
    /// Strategies used by both channels
    pub mode: CalibrationMode,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            bias: ChannelConfig::new(DEFAULT_BIAS_ACCURACY_LIMIT),
            scale: ChannelConfig::new(DEFAULT_SCALE_ACCURACY_LIMIT),
            mode: CalibrationMode::default(),
        }
    }
}

impl AxisConfig {
    /// Set the bias channel accuracy limit
    pub fn with_bias_limit(mut self, accuracy_limit: f64) -> Self {
        self.bias = ChannelConfig::new(accuracy_limit);
        self
    }

    /// Set the scale channel accuracy limit
    pub fn with_scale_limit(mut self, accuracy_limit: f64) -> Self {
        self.scale = ChannelConfig::new(accuracy_limit);
        self
    }

    /// Set the strategy pair
    pub fn with_mode(mut self, mode: CalibrationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Validate both channel gates
    pub fn validate(&self) -> CalibrationResult<()> {
        self.bias.validate()?;
        self.scale.validate()
    }
}
