//! Scale Calibrator
//!
//! One calibration channel: an accuracy gate, the `Empty → Armed →
//! Calibrating` state machine and an exclusively owned
//! [`NormalisationEstimator`] fed by a [`ScaleCalibrationStrategy`].

use crate::{
    calibration::{
        accuracy_passes, BracketRatio, ChannelConfig, ChannelState, NormalisationEstimator,
        Readout,
    },
    errors::CalibrationResult,
    traits::ScaleCalibrationStrategy,
};

/// Gated calibration channel
///
/// The default strategy is [`BracketRatio`], the revised reference-to-sensor
/// ratio over brackets.
///
/// ```
/// use reckon_core::{ChannelConfig, ChannelState, ScaleCalibrator};
///
/// let mut channel: ScaleCalibrator = ScaleCalibrator::new(ChannelConfig::new(0.3)).unwrap();
///
/// assert!(channel.add_reference(0.0, Some(0.1)));
/// assert_eq!(channel.state(), ChannelState::Armed);
///
/// channel.add_sensor(40.0);
/// channel.add_sensor(60.0);
/// assert!(channel.add_reference(2.0, Some(0.1)));
/// assert_eq!(channel.estimator().sample_count(), 1);
///
/// // Too coarse: disarms and drops the open bracket
/// assert!(!channel.add_reference(2.0, Some(0.3)));
/// assert_eq!(channel.state(), ChannelState::Empty);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleCalibrator<S = BracketRatio> {
    config: ChannelConfig,
    state: ChannelState,
    strategy: S,
    estimator: NormalisationEstimator,
}

impl<S: ScaleCalibrationStrategy + Default> ScaleCalibrator<S> {
    /// Channel with a fresh strategy and a cold estimator
    pub fn new(config: ChannelConfig) -> CalibrationResult<Self> {
        Self::with_strategy(config, S::default())
    }
}

impl<S: ScaleCalibrationStrategy> ScaleCalibrator<S> {
    /// Channel with the given strategy and a cold estimator
    pub fn with_strategy(config: ChannelConfig, strategy: S) -> CalibrationResult<Self> {
        Self::with_estimator(config, strategy, NormalisationEstimator::new())
    }

    /// Channel continuing from a seeded estimator
    pub fn with_estimator(
        config: ChannelConfig,
        strategy: S,
        estimator: NormalisationEstimator,
    ) -> CalibrationResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: ChannelState::Empty,
            strategy,
            estimator,
        })
    }

    /// Offer a reference sample
    ///
    /// Returns whether the sample passed the gate. A failing sample (unknown,
    /// too coarse or non-finite) disarms the channel.
    pub fn add_reference(&mut self, value: f64, accuracy: Option<f64>) -> bool {
        if !value.is_finite() || !accuracy_passes(accuracy, self.config.accuracy_limit) {
            if self.state != ChannelState::Empty {
                log_debug!(
                    "reference {} rejected at limit {}, channel disarmed",
                    value,
                    self.config.accuracy_limit
                );
            }
            self.state = ChannelState::Empty;
            self.strategy.disarm();
            return false;
        }

        match self.state {
            ChannelState::Empty | ChannelState::Armed => {
                self.strategy.arm(value);
                self.state = ChannelState::Armed;
            }
            ChannelState::Calibrating => {
                if let Some(observation) = self.strategy.close(value) {
                    self.commit(observation);
                }
            }
        }
        true
    }

    /// Offer a sensor sample
    ///
    /// Returns whether the channel was armed and took the sample.
    pub fn add_sensor(&mut self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        match self.state {
            ChannelState::Empty => false,
            ChannelState::Armed | ChannelState::Calibrating => {
                self.strategy.sensor(value);
                self.state = ChannelState::Calibrating;
                true
            }
        }
    }

    fn commit(&mut self, observation: f64) {
        if !observation.is_finite() {
            log_debug!("non-finite bracket observation dropped");
            return;
        }
        self.estimator.add_sensor(observation);
        log_trace!(
            "bracket observation {} committed, reliability {}",
            observation,
            self.estimator.reliability()
        );
    }

    /// Running mean of the observations
    pub fn scale(&self) -> f64 {
        self.estimator.mean()
    }

    /// Mean linear deviation of the observations
    pub fn accuracy(&self) -> f64 {
        self.estimator.mld()
    }

    /// Reliability of the observations, 0-100
    pub fn calibration(&self) -> f64 {
        self.estimator.reliability()
    }

    /// Mean, mld and reliability together
    pub fn readout(&self) -> Readout {
        self.estimator.readout()
    }

    /// Current gate state
    pub fn state(&self) -> ChannelState {
        self.state
    }

    /// Strict upper bound on accepted reference accuracy
    pub fn accuracy_limit(&self) -> f64 {
        self.config.accuracy_limit
    }

    /// Estimator fed by this channel, e.g. for snapshotting
    pub fn estimator(&self) -> &NormalisationEstimator {
        &self.estimator
    }

    /// Bracket strategy in use
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub(crate) fn strategy_mut(&mut self) -> &mut S {
        &mut self.strategy
    }
}
