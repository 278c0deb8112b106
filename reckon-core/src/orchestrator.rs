//! Sensor Fusion Orchestrator
//!
//! ## Overview
//!
//! [`SensorFusion`] is bound to one physical sensor axis. It owns a bias
//! channel and a scale channel, remembers the last reference and sensor
//! timestamps, and forwards every update to the axis' [`Adjustment`]
//! capability:
//!
//! ```text
//! add_ref(t, value, accuracy) ─┬─► bias channel  ─┐
//!                              └─► scale channel ─┴─► accepted? ─► on_reference(old t, t, ...)
//!
//! add_sen(t, value, valid) ────┬─► bias channel  ─┐
//!                              └─► scale channel ─┴─► usable? ─► on_sensor(ref t, old t, t, ..., valid)
//! ```
//!
//! Both channels see every sample; each keeps its own gate. A reference
//! counts as accepted when either channel took it, a sensor sample as usable
//! when either channel was armed for it. The adjustment gets the driver's
//! validity flag; usability is only the return value of `add_sen`.
//!
//! ## Modes
//!
//! [`CalibrationMode`] picks the strategies of both channels at construction.
//! `Ratio` is meant for increment streams (ticks per fix against distance per
//! fix); its totals can be carried over a restart with
//! [`with_ratio_totals`](SensorFusion::with_ratio_totals).
//!
//! ## Concurrency
//!
//! The orchestrator is a plain single-threaded value. One axis fed from two
//! driver threads goes behind a single lock, see
//! [`SharedAxis`](crate::SharedAxis). Different axes share nothing.

use crate::{
    calibration::{
        AxisConfig, AxisStrategy, BracketRatio, CalibrationMode, ChannelRole,
        NormalisationEstimator, Readout, ScaleCalibrator, SensorSample,
    },
    errors::{CalibrationError, CalibrationResult},
    time::Timestamp,
    traits::Adjustment,
};

/// Calibration state of one sensor axis
#[derive(Debug, Clone)]
pub struct SensorFusion<A> {
    mode: CalibrationMode,
    last_reference: Option<Timestamp>,
    last_sensor: Option<Timestamp>,
    bias: ScaleCalibrator<AxisStrategy>,
    scale: ScaleCalibrator<AxisStrategy>,
    adjustment: A,
}

impl<A: Adjustment> SensorFusion<A> {
    /// Axis with cold estimators
    pub fn new(config: AxisConfig, adjustment: A) -> CalibrationResult<Self> {
        Self::with_estimators(
            config,
            adjustment,
            NormalisationEstimator::new(),
            NormalisationEstimator::new(),
        )
    }

    /// Axis continuing from seeded bias and scale estimators
    pub fn with_estimators(
        config: AxisConfig,
        adjustment: A,
        bias: NormalisationEstimator,
        scale: NormalisationEstimator,
    ) -> CalibrationResult<Self> {
        config.validate()?;
        Ok(Self {
            mode: config.mode,
            last_reference: None,
            last_sensor: None,
            bias: ScaleCalibrator::with_estimator(
                config.bias,
                AxisStrategy::for_mode(config.mode, ChannelRole::Bias),
                bias,
            )?,
            scale: ScaleCalibrator::with_estimator(
                config.scale,
                AxisStrategy::for_mode(config.mode, ChannelRole::Scale),
                scale,
            )?,
            adjustment,
        })
    }

    /// Continue the scale ratio from totals of an earlier run
    ///
    /// Only a [`CalibrationMode::Ratio`] axis keeps such totals; call before
    /// feeding samples, as any open bracket is dropped.
    pub fn with_ratio_totals(
        mut self,
        reference_accumulated: f64,
        sensor_accumulated: f64,
    ) -> CalibrationResult<Self> {
        if !reference_accumulated.is_finite() || !sensor_accumulated.is_finite() {
            return Err(CalibrationError::InvalidRatioTotals {
                reason: "non-finite totals",
            });
        }
        let AxisStrategy::Ratio(ratio) = self.scale.strategy_mut() else {
            return Err(CalibrationError::InvalidRatioTotals {
                reason: "axis does not run the ratio strategy",
            });
        };
        *ratio = BracketRatio::seeded(reference_accumulated, sensor_accumulated);
        Ok(self)
    }

    /// Offer a reference sample to both channels
    ///
    /// Returns whether at least one channel accepted it. Only accepted
    /// references advance the reference timestamp and reach the adjustment.
    pub fn add_ref(&mut self, timestamp: Timestamp, value: f64, accuracy: Option<f64>) -> bool {
        // Both channels must see the sample, so no short-circuit
        let accepted = self.bias.add_reference(value, accuracy)
            | self.scale.add_reference(value, accuracy);

        match accuracy {
            Some(accuracy) if accepted => {
                let old_reference = self.last_reference.replace(timestamp);
                if !self
                    .adjustment
                    .on_reference(old_reference, timestamp, value, accuracy)
                {
                    log_debug!("adjustment refused reference at {}", timestamp);
                }
                true
            }
            _ => false,
        }
    }

    /// [`add_ref`](Self::add_ref) for a [`SensorSample`]
    pub fn add_reference_sample(&mut self, sample: &SensorSample) -> bool {
        self.add_ref(sample.timestamp, sample.value, sample.accuracy)
    }

    /// Offer a sensor sample to both channels
    ///
    /// A sample flagged invalid by its driver is passed to the adjustment
    /// as invalid and otherwise ignored. A valid sample always advances the
    /// sensor timestamp and reaches the adjustment as valid; the return value
    /// says whether any channel was armed to use it.
    pub fn add_sen(&mut self, timestamp: Timestamp, value: f64, is_valid: bool) -> bool {
        if !is_valid {
            self.adjustment
                .on_sensor(self.last_reference, self.last_sensor, timestamp, value, false);
            return false;
        }

        let old_sensor = self.last_sensor.replace(timestamp);
        let usable = self.bias.add_sensor(value) | self.scale.add_sensor(value);
        if !usable {
            log_trace!("sensor sample at {} arrived with no channel armed", timestamp);
        }

        if !self
            .adjustment
            .on_sensor(self.last_reference, old_sensor, timestamp, value, true)
        {
            log_debug!("adjustment refused sensor sample at {}", timestamp);
        }
        usable
    }

    /// Bias readout, raw sensor units
    pub fn bias(&self) -> Readout {
        self.bias.readout()
    }

    /// Scale readout, reference units per raw unit
    pub fn scale(&self) -> Readout {
        self.scale.readout()
    }

    /// Apply the current estimates to a raw value
    ///
    /// `None` while the scale is still zero.
    pub fn correct(&self, raw: f64) -> Option<f64> {
        let scale = self.scale.scale();
        if scale == 0.0 {
            return None;
        }
        Some((raw - self.bias.scale()) * scale)
    }

    /// Timestamp of the last accepted reference
    pub fn last_reference(&self) -> Option<Timestamp> {
        self.last_reference
    }

    /// Timestamp of the last valid sensor sample
    pub fn last_sensor(&self) -> Option<Timestamp> {
        self.last_sensor
    }

    /// Channel estimating the bias
    pub fn bias_channel(&self) -> &ScaleCalibrator<AxisStrategy> {
        &self.bias
    }

    /// Channel estimating the scale
    pub fn scale_channel(&self) -> &ScaleCalibrator<AxisStrategy> {
        &self.scale
    }

    /// Strategy pair both channels run
    pub fn mode(&self) -> CalibrationMode {
        self.mode
    }

    /// Adjustment handle
    pub fn adjustment(&self) -> &A {
        &self.adjustment
    }

    /// Mutable adjustment handle
    pub fn adjustment_mut(&mut self) -> &mut A {
        &mut self.adjustment
    }

    /// Give the adjustment handle back
    pub fn into_adjustment(self) -> A {
        self.adjustment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        calibration::{ChannelState, NormalisationSnapshot},
        traits::NullAdjustment,
    };

    fn span_axis() -> SensorFusion<NullAdjustment> {
        SensorFusion::new(AxisConfig::default().with_mode(CalibrationMode::Span), NullAdjustment).unwrap()
    }

    #[test]
    fn invalid_config_rejected() {
        let config = AxisConfig::default().with_bias_limit(f64::NAN);
        assert!(matches!(
            SensorFusion::new(config, NullAdjustment),
            Err(CalibrationError::InvalidAccuracyLimit { .. })
        ));
    }

    #[test]
    fn channels_gate_independently() {
        // Bias gate 0.5, scale gate 0.3
        let mut axis = SensorFusion::new(AxisConfig::default(), NullAdjustment).unwrap();

        assert!(axis.add_ref(1.0, 10.0, Some(0.4)));
        assert_eq!(axis.bias_channel().state(), ChannelState::Armed);
        assert_eq!(axis.scale_channel().state(), ChannelState::Empty);

        assert!(!axis.add_ref(2.0, 10.0, Some(0.5)));
        assert_eq!(axis.bias_channel().state(), ChannelState::Empty);
        assert_eq!(axis.last_reference(), Some(1.0));
    }

    #[test]
    fn sensor_before_reference_is_unusable_but_timed() {
        let mut axis = span_axis();
        assert!(!axis.add_sen(0.5, 7.0, true));
        assert_eq!(axis.last_sensor(), Some(0.5));
        assert_eq!(axis.last_reference(), None);
    }

    #[test]
    fn invalid_sensor_does_not_advance() {
        let mut axis = span_axis();
        axis.add_ref(0.0, 100.0, Some(0.1));
        assert!(!axis.add_sen(0.5, 7.0, false));
        assert_eq!(axis.last_sensor(), None);
        assert_eq!(axis.scale_channel().state(), ChannelState::Armed);
    }

    #[test]
    fn correct_needs_a_scale() {
        let mut axis = span_axis();
        assert_eq!(axis.correct(12.0), None);

        for (t, (reference, raw)) in [(100.0, 7.0), (200.0, 12.0), (300.0, 17.0), (100.0, 7.0)]
            .into_iter()
            .enumerate()
        {
            axis.add_ref(t as f64, reference, Some(0.1));
            axis.add_sen(t as f64 + 0.5, raw, true);
        }

        // (12 − 2) · 20
        assert_eq!(axis.correct(12.0), Some(200.0));
        assert_eq!(axis.mode(), CalibrationMode::Span);
    }

    #[test]
    fn ratio_mode_calibrates_constant_increments() {
        let config = AxisConfig::default().with_mode(CalibrationMode::Ratio);
        let mut axis = SensorFusion::new(config, NullAdjustment).unwrap();

        // 10 m per fix, 0.5 ticks per fix
        for t in 0..5 {
            let t = f64::from(t);
            assert!(axis.add_ref(t, 10.0, Some(0.1)));
            assert!(axis.add_sen(t + 0.5, 0.5, true));
        }

        assert_eq!(axis.mode(), CalibrationMode::Ratio);
        assert_eq!(axis.scale().sample_count, 4);
        assert_eq!(axis.scale().mean, 20.0);
        assert_eq!(axis.scale_channel().strategy().ratio_totals(), Some((40.0, 2.0)));
        // No reference spread, so no bias yet
        assert!(axis.bias_channel().estimator().is_cold());
        assert_eq!(axis.correct(0.5), Some(10.0));
    }

    #[test]
    fn ratio_totals_need_a_ratio_axis() {
        let ratio = AxisConfig::default().with_mode(CalibrationMode::Ratio);
        let axis = SensorFusion::new(ratio, NullAdjustment)
            .unwrap()
            .with_ratio_totals(190.0, 9.5)
            .unwrap();
        assert_eq!(axis.scale_channel().strategy().ratio_totals(), Some((190.0, 9.5)));

        assert!(matches!(
            SensorFusion::new(ratio, NullAdjustment).unwrap().with_ratio_totals(f64::NAN, 1.0),
            Err(CalibrationError::InvalidRatioTotals { .. })
        ));
        assert!(matches!(
            span_axis().with_ratio_totals(190.0, 9.5),
            Err(CalibrationError::InvalidRatioTotals { .. })
        ));
    }

    #[test]
    fn seeded_axis_reports_seed() {
        let seed = NormalisationSnapshot {
            accumulated_value: 40.0,
            accumulated_mld: 0.0,
            accumulated_reliability: 100.0,
            sample_count: 2,
        };
        let scale = NormalisationEstimator::from_snapshot(seed).unwrap();
        let axis = SensorFusion::with_estimators(
            AxisConfig::default(),
            NullAdjustment,
            NormalisationEstimator::new(),
            scale,
        )
        .unwrap();

        assert_eq!(axis.scale().mean, 20.0);
        assert_eq!(axis.scale().reliability, 50.0);
        assert_eq!(axis.correct(1.0), Some(20.0));
    }
}
