//! Scalar Kalman Fuser
//!
//! Blends (value, accuracy) pairs into one running estimate. Accuracy is
//! lower-is-better, so the gain `K = â / (â + a)` moves the estimate toward
//! inputs that are more accurate than the current blend.
//!
//! A fuser is cheap; make a fresh one per fused quantity instead of
//! resetting.

/// Current output of a [`KalmanFuser`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FusedEstimate {
    /// Blended value
    pub value: f64,
    /// Blended accuracy; zero until the first input
    pub accuracy: f64,
}

/// Running accuracy-weighted blend
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KalmanFuser {
    estimate: FusedEstimate,
}

impl KalmanFuser {
    /// Fuser with no input yet
    pub const fn new() -> Self {
        Self {
            estimate: FusedEstimate {
                value: 0.0,
                accuracy: 0.0,
            },
        }
    }

    /// Blend one observation
    ///
    /// Returns false, leaving the estimate untouched, when `accuracy` is not
    /// strictly positive or either argument is not finite.
    pub fn add_data(&mut self, value: f64, accuracy: f64) -> bool {
        if !(accuracy > 0.0) || !accuracy.is_finite() || !value.is_finite() {
            log_trace!("fuser input {} with accuracy {} ignored", value, accuracy);
            return false;
        }

        let current = &mut self.estimate;
        if current.accuracy == 0.0 {
            *current = FusedEstimate { value, accuracy };
            return true;
        }

        let gain = current.accuracy / (current.accuracy + accuracy);
        current.value = current.value * (1.0 - gain) + value * gain;
        current.accuracy = current.accuracy * (1.0 - gain) + accuracy * gain;
        true
    }

    /// Blend a sequence of (value, accuracy) pairs, returning how many were used
    pub fn fuse_all<I>(&mut self, observations: I) -> usize
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        observations
            .into_iter()
            .filter(|&(value, accuracy)| self.add_data(value, accuracy))
            .count()
    }

    /// Blended value, 0 before any input
    pub fn value(&self) -> f64 {
        self.estimate.value
    }

    /// Blended accuracy, 0 before any input
    pub fn accuracy(&self) -> f64 {
        self.estimate.accuracy
    }

    /// Value and accuracy together
    pub fn estimate(&self) -> FusedEstimate {
        self.estimate
    }

    /// At least one observation was accepted
    pub fn is_initialised(&self) -> bool {
        self.estimate.accuracy > 0.0
    }
}
