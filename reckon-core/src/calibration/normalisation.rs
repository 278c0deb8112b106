//! Online Normalisation Estimator
//!
//! ## Overview
//!
//! Tracks the running mean, the mean linear deviation (mld) and a 0-100
//! reliability score of a scalar stream in a single pass, with four
//! accumulators and a sample count.
//!
//! ## Update Rule
//!
//! The first sample only establishes the baseline:
//! ```text
//! Σv = v,  Σmld = 0,  Σrel = 0,  n = 1,  mean = mld = reliability = 0
//! ```
//!
//! Every later sample `v`:
//! ```text
//! old   = Σv / n
//! mean  = (Σv + v) / (n + 1)
//! Σmld += |mean − v|            mld = Σmld / n        (pre-update n: smoothing lag)
//! Σrel += 100                   if mld = 0
//!         100 − 100·|old − mean| / mld   if |old − mean| < mld
//!         0                     otherwise
//! Σv   += v,  n += 1,  reliability = Σrel / n
//! ```
//!
//! Reliability rewards samples that barely move the mean compared to the
//! stream's own dispersion. A constant stream of n values reaches
//! `100·(n − 1)/n`; a stream whose mean keeps jumping by more than its
//! deviation stalls.
//!
//! ## Warm Restart
//!
//! The four accumulators are all the state there is. [`NormalisationSnapshot`]
//! captures them; [`NormalisationEstimator::from_snapshot`] seeds a new
//! estimator after checking that some sample sequence could have produced
//! them. A seed with negative accumulated reliability is accepted but treated
//! as a fault: the next sample restarts the estimator from cold.

use libm::fabs;

use crate::{
    calibration::readout::Readout,
    constants::FULL_RELIABILITY,
    errors::{CalibrationError, CalibrationResult},
};

/// Persisted accumulators of a [`NormalisationEstimator`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalisationSnapshot {
    /// Sum of all values
    pub accumulated_value: f64,
    /// Sum of absolute deviations from the running mean
    pub accumulated_mld: f64,
    /// Sum of per-sample reliability credits
    pub accumulated_reliability: f64,
    /// Number of values seen
    pub sample_count: u64,
}

/// Running mean, mean linear deviation and reliability of a scalar stream
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalisationEstimator {
    accumulated_value: f64,
    accumulated_mld: f64,
    accumulated_reliability: f64,
    sample_count: u64,
    mean: f64,
    mld: f64,
    reliability: f64,
}

impl NormalisationEstimator {
    /// Cold estimator
    pub const fn new() -> Self {
        Self {
            accumulated_value: 0.0,
            accumulated_mld: 0.0,
            accumulated_reliability: 0.0,
            sample_count: 0,
            mean: 0.0,
            mld: 0.0,
            reliability: 0.0,
        }
    }

    /// Seed from previously persisted accumulators
    pub fn from_snapshot(snapshot: NormalisationSnapshot) -> CalibrationResult<Self> {
        let NormalisationSnapshot {
            accumulated_value,
            accumulated_mld,
            accumulated_reliability,
            sample_count,
        } = snapshot;

        if !(accumulated_value.is_finite()
            && accumulated_mld.is_finite()
            && accumulated_reliability.is_finite())
        {
            return Err(CalibrationError::InvalidSnapshot {
                reason: "accumulator is not finite",
            });
        }
        if accumulated_mld < 0.0 {
            return Err(CalibrationError::InvalidSnapshot {
                reason: "negative accumulated mld",
            });
        }
        if sample_count == 0 {
            if accumulated_value != 0.0 || accumulated_mld != 0.0 || accumulated_reliability != 0.0 {
                return Err(CalibrationError::InvalidSnapshot {
                    reason: "accumulators without samples",
                });
            }
            return Ok(Self::new());
        }

        // Only samples after the first earn credit
        let credited = (sample_count - 1) as f64;
        if accumulated_reliability > FULL_RELIABILITY * credited {
            return Err(CalibrationError::InvalidSnapshot {
                reason: "reliability exceeds what the sample count allows",
            });
        }
        if accumulated_reliability < 0.0 {
            log_warn!(
                "seeded with negative accumulated reliability {}, next sample restarts",
                accumulated_reliability
            );
        }

        let count = sample_count as f64;
        let (mean, mld) = if sample_count > 1 {
            (accumulated_value / count, accumulated_mld / credited)
        } else {
            (0.0, 0.0)
        };

        Ok(Self {
            accumulated_value,
            accumulated_mld,
            accumulated_reliability,
            sample_count,
            mean,
            mld,
            reliability: accumulated_reliability / count,
        })
    }

    /// Accumulators for persistence
    pub fn snapshot(&self) -> NormalisationSnapshot {
        NormalisationSnapshot {
            accumulated_value: self.accumulated_value,
            accumulated_mld: self.accumulated_mld,
            accumulated_reliability: self.accumulated_reliability,
            sample_count: self.sample_count,
        }
    }

    /// Fold one value into the estimate
    ///
    /// The caller filters invalid readings; this never rejects anything.
    pub fn add_sensor(&mut self, value: f64) {
        if self.sample_count == 0 {
            self.restart(value);
            return;
        }
        if self.accumulated_reliability < 0.0 {
            log_warn!(
                "negative accumulated reliability {} after {} samples, restarting",
                self.accumulated_reliability,
                self.sample_count
            );
            self.restart(value);
            return;
        }

        let count = self.sample_count as f64;
        let old_mean = self.accumulated_value / count;
        let new_mean = (self.accumulated_value + value) / (count + 1.0);

        self.accumulated_mld += fabs(new_mean - value);
        self.mld = self.accumulated_mld / count;
        self.mean = new_mean;
        self.accumulated_reliability += Self::credit(fabs(old_mean - new_mean), self.mld);

        self.accumulated_value += value;
        self.sample_count += 1;
        self.reliability = self.accumulated_reliability / self.sample_count as f64;
    }

    /// Reliability earned by a sample that moved the mean by `shift`
    fn credit(shift: f64, mld: f64) -> f64 {
        if mld == 0.0 {
            FULL_RELIABILITY
        } else if shift < mld {
            FULL_RELIABILITY - (shift / mld) * FULL_RELIABILITY
        } else {
            0.0
        }
    }

    fn restart(&mut self, value: f64) {
        *self = Self {
            accumulated_value: value,
            sample_count: 1,
            ..Self::new()
        };
    }

    /// Running mean (0 until the second sample)
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Mean linear deviation
    pub fn mld(&self) -> f64 {
        self.mld
    }

    /// Reliability in [0, 100]
    pub fn reliability(&self) -> f64 {
        self.reliability
    }

    /// Number of values seen
    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    /// Sum of all values seen
    pub fn accumulated_value(&self) -> f64 {
        self.accumulated_value
    }

    /// No value seen yet
    pub fn is_cold(&self) -> bool {
        self.sample_count == 0
    }

    /// Mean, mld and reliability in one copy
    pub fn readout(&self) -> Readout {
        Readout {
            mean: self.mean,
            mld: self.mld,
            reliability: self.reliability,
            sample_count: self.sample_count,
        }
    }
}
