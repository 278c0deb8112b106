//! Bracket Strategies
//!
//! Implementations of [`ScaleCalibrationStrategy`]. Each turns the samples of
//! one bracket (the sensor values between two accepted references) into at
//! most one observation for the channel's estimator.
//!
//! | Strategy         | Inputs                           | Observation                 |
//! |------------------|----------------------------------|-----------------------------|
//! | [`BracketRatio`] | reference and sensor increments  | Σref / Σsensor              |
//! | [`BracketFit`]   | held reference, bracket mean     | LSQ scale or bias           |
//! | [`SpanStrategy`] | held reference, last sensor      | span ratio or span offset   |
//!
//! All three defer (return `None`) instead of dividing by zero, and a bracket
//! without its own sensor sample yields nothing.

use crate::{
    calibration::{CalibrationMode, ChannelRole},
    constants::DEGENERATE_SPREAD_RATIO,
    traits::ScaleCalibrationStrategy,
};

/// Running ratio of reference increments to sensor increments
///
/// Every closed bracket adds its reference value and its summed sensor chunk
/// to two long-run totals; the observation is `Σreference / Σsensor`. Suited
/// to counters (wheel ticks against GNSS distance) where both streams carry
/// increments. A bracket without sensor samples is skipped, reference
/// included. A rejected reference throws away the open chunk but keeps the
/// totals.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BracketRatio {
    reference_accumulated: f64,
    sensor_accumulated: f64,
    sensor_chunk: f64,
    sensor_seen: bool,
}

impl BracketRatio {
    /// Empty totals
    pub const fn new() -> Self {
        Self::seeded(0.0, 0.0)
    }

    /// Continue from totals accumulated by an earlier run
    pub const fn seeded(reference_accumulated: f64, sensor_accumulated: f64) -> Self {
        Self {
            reference_accumulated,
            sensor_accumulated,
            sensor_chunk: 0.0,
            sensor_seen: false,
        }
    }

    /// Sum of committed reference values
    pub fn reference_accumulated(&self) -> f64 {
        self.reference_accumulated
    }

    /// Sum of committed sensor chunks
    pub fn sensor_accumulated(&self) -> f64 {
        self.sensor_accumulated
    }

    /// Sensor sum of the open bracket
    pub fn sensor_chunk(&self) -> f64 {
        self.sensor_chunk
    }

    fn clear_chunk(&mut self) {
        self.sensor_chunk = 0.0;
        self.sensor_seen = false;
    }
}

impl ScaleCalibrationStrategy for BracketRatio {
    fn arm(&mut self, _reference: f64) {
        self.clear_chunk();
    }

    fn sensor(&mut self, value: f64) {
        self.sensor_chunk += value;
        self.sensor_seen = true;
    }

    fn close(&mut self, reference: f64) -> Option<f64> {
        if !self.sensor_seen {
            log_trace!("bracket closed by {} without sensor samples", reference);
            return None;
        }
        self.sensor_accumulated += self.sensor_chunk;
        self.reference_accumulated += reference;
        self.clear_chunk();

        if self.reference_accumulated == 0.0 || self.sensor_accumulated == 0.0 {
            log_trace!(
                "ratio deferred, reference total {} sensor total {}",
                self.reference_accumulated,
                self.sensor_accumulated
            );
            return None;
        }
        Some(self.reference_accumulated / self.sensor_accumulated)
    }

    fn disarm(&mut self) {
        self.clear_chunk();
    }
}

/// Least-squares line through bracket means
///
/// Each closed bracket contributes the pair (reference that opened it, mean of
/// its sensor samples). The pairs are summarised by five running sums, and
/// the line `sensor = reference / scale + bias` is refitted on every new pair.
/// A channel in the [`ChannelRole::Scale`] role reports `scale`, one in the
/// [`ChannelRole::Bias`] role reports `bias`.
///
/// At least two pairs with distinct references are needed; before that, or
/// while the references barely differ, the bracket is deferred.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BracketFit {
    role: ChannelRole,
    held: Option<f64>,
    chunk_sum: f64,
    chunk_count: u32,
    pairs: u64,
    sum_reference: f64,
    sum_sensor: f64,
    sum_reference_sq: f64,
    sum_cross: f64,
}

impl BracketFit {
    /// No pairs yet
    pub const fn new(role: ChannelRole) -> Self {
        Self {
            role,
            held: None,
            chunk_sum: 0.0,
            chunk_count: 0,
            pairs: 0,
            sum_reference: 0.0,
            sum_sensor: 0.0,
            sum_reference_sq: 0.0,
            sum_cross: 0.0,
        }
    }

    /// Quantity this fit reports
    pub fn role(&self) -> ChannelRole {
        self.role
    }

    /// Pairs committed so far
    pub fn pairs(&self) -> u64 {
        self.pairs
    }

    fn clear_chunk(&mut self) {
        self.chunk_sum = 0.0;
        self.chunk_count = 0;
    }

    /// Commit the open bracket, if it has a reference and a sensor sample
    fn commit(&mut self) -> bool {
        let Some(reference) = self.held else {
            return false;
        };
        if self.chunk_count == 0 {
            return false;
        }
        let sensor = self.chunk_sum / f64::from(self.chunk_count);

        self.pairs += 1;
        self.sum_reference += reference;
        self.sum_sensor += sensor;
        self.sum_reference_sq += reference * reference;
        self.sum_cross += reference * sensor;
        true
    }

    fn fit(&self) -> Option<f64> {
        let n = self.pairs as f64;
        let magnitude = n * self.sum_reference_sq;
        let spread = magnitude - self.sum_reference * self.sum_reference;
        if !(spread > DEGENERATE_SPREAD_RATIO * magnitude) {
            log_trace!("fit deferred, reference spread {} over {} pairs", spread, self.pairs);
            return None;
        }

        match self.role {
            ChannelRole::Scale => {
                let covariance = n * self.sum_cross - self.sum_reference * self.sum_sensor;
                if covariance == 0.0 {
                    return None;
                }
                Some(spread / covariance)
            }
            ChannelRole::Bias => Some(
                (self.sum_sensor * self.sum_reference_sq - self.sum_reference * self.sum_cross)
                    / spread,
            ),
        }
    }
}

impl ScaleCalibrationStrategy for BracketFit {
    fn arm(&mut self, reference: f64) {
        self.held = Some(reference);
        self.clear_chunk();
    }

    fn sensor(&mut self, value: f64) {
        self.chunk_sum += value;
        self.chunk_count = self.chunk_count.saturating_add(1);
    }

    fn close(&mut self, reference: f64) -> Option<f64> {
        let committed = self.commit();
        self.held = Some(reference);
        self.clear_chunk();

        if committed && self.pairs >= 2 {
            self.fit()
        } else {
            None
        }
    }

    fn disarm(&mut self) {
        self.held = None;
        self.clear_chunk();
    }
}

/// Min/max span of instantaneous reference/sensor pairs
///
/// The older heuristic: each closed bracket pairs the reference that opened
/// it with its latest sensor value, and widens the observed reference and
/// sensor ranges. Only a pair that widens a range produces an observation:
///
/// ```text
/// scale = (ref_max − ref_min) / (sen_max − sen_min)
/// bias  = sen_min − ref_min / scale
/// ```
///
/// Repeating values already inside the span teach nothing, so a channel fed
/// a periodic signal stops observing after the first period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpanStrategy {
    role: ChannelRole,
    held: Option<f64>,
    last: Option<f64>,
    reference_min: f64,
    reference_max: f64,
    sensor_min: f64,
    sensor_max: f64,
}

impl SpanStrategy {
    /// Empty spans
    pub const fn new(role: ChannelRole) -> Self {
        Self {
            role,
            held: None,
            last: None,
            reference_min: f64::INFINITY,
            reference_max: f64::NEG_INFINITY,
            sensor_min: f64::INFINITY,
            sensor_max: f64::NEG_INFINITY,
        }
    }

    /// Quantity this strategy reports
    pub fn role(&self) -> ChannelRole {
        self.role
    }

    /// Observed reference range, once a pair was seen
    pub fn reference_span(&self) -> Option<(f64, f64)> {
        (self.reference_min <= self.reference_max).then_some((self.reference_min, self.reference_max))
    }

    /// Observed sensor range, once a pair was seen
    pub fn sensor_span(&self) -> Option<(f64, f64)> {
        (self.sensor_min <= self.sensor_max).then_some((self.sensor_min, self.sensor_max))
    }

    fn observe(&mut self, reference: f64, sensor: f64) -> Option<f64> {
        // Both ranges must be updated, so no short-circuit
        let widened = widen(&mut self.reference_min, &mut self.reference_max, reference)
            | widen(&mut self.sensor_min, &mut self.sensor_max, sensor);
        if !widened {
            return None;
        }

        let reference_span = self.reference_max - self.reference_min;
        let sensor_span = self.sensor_max - self.sensor_min;
        if !(reference_span > 0.0 && sensor_span > 0.0) {
            return None;
        }

        let ratio = reference_span / sensor_span;
        match self.role {
            ChannelRole::Scale => Some(ratio),
            ChannelRole::Bias => Some(self.sensor_min - self.reference_min / ratio),
        }
    }
}

fn widen(min: &mut f64, max: &mut f64, value: f64) -> bool {
    let mut widened = false;
    if value < *min {
        *min = value;
        widened = true;
    }
    if value > *max {
        *max = value;
        widened = true;
    }
    widened
}

impl ScaleCalibrationStrategy for SpanStrategy {
    fn arm(&mut self, reference: f64) {
        self.held = Some(reference);
        self.last = None;
    }

    fn sensor(&mut self, value: f64) {
        self.last = Some(value);
    }

    fn close(&mut self, reference: f64) -> Option<f64> {
        // The sensor value belongs to the bracket being closed only
        let observation = match (self.held, self.last.take()) {
            (Some(held), Some(last)) => self.observe(held, last),
            _ => None,
        };
        self.held = Some(reference);
        observation
    }

    fn disarm(&mut self) {
        self.held = None;
        self.last = None;
    }
}

/// Strategy of one orchestrated channel, chosen by [`CalibrationMode`]
///
/// | Mode                         | Bias channel     | Scale channel    |
/// |------------------------------|------------------|------------------|
/// | [`CalibrationMode::Ratio`]   | [`BracketFit`]   | [`BracketRatio`] |
/// | [`CalibrationMode::Bracket`] | [`BracketFit`]   | [`BracketFit`]   |
/// | [`CalibrationMode::Span`]    | [`SpanStrategy`] | [`SpanStrategy`] |
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisStrategy {
    /// Reference-to-sensor increment ratio, scale only
    Ratio(BracketRatio),
    /// Bracket-mean least squares
    Fit(BracketFit),
    /// Min/max span
    Span(SpanStrategy),
}

impl AxisStrategy {
    /// Strategy for `role` under `mode`
    pub const fn for_mode(mode: CalibrationMode, role: ChannelRole) -> Self {
        match (mode, role) {
            (CalibrationMode::Ratio, ChannelRole::Scale) => Self::Ratio(BracketRatio::new()),
            (CalibrationMode::Ratio | CalibrationMode::Bracket, _) => Self::Fit(BracketFit::new(role)),
            (CalibrationMode::Span, _) => Self::Span(SpanStrategy::new(role)),
        }
    }

    /// Quantity the wrapped strategy reports
    pub fn role(&self) -> ChannelRole {
        match self {
            Self::Ratio(_) => ChannelRole::Scale,
            Self::Fit(fit) => fit.role(),
            Self::Span(span) => span.role(),
        }
    }

    /// Reference and sensor totals, for a ratio strategy
    pub fn ratio_totals(&self) -> Option<(f64, f64)> {
        match self {
            Self::Ratio(ratio) => Some((ratio.reference_accumulated(), ratio.sensor_accumulated())),
            Self::Fit(_) | Self::Span(_) => None,
        }
    }
}

impl ScaleCalibrationStrategy for AxisStrategy {
    fn arm(&mut self, reference: f64) {
        match self {
            Self::Ratio(ratio) => ratio.arm(reference),
            Self::Fit(fit) => fit.arm(reference),
            Self::Span(span) => span.arm(reference),
        }
    }

    fn sensor(&mut self, value: f64) {
        match self {
            Self::Ratio(ratio) => ratio.sensor(value),
            Self::Fit(fit) => fit.sensor(value),
            Self::Span(span) => span.sensor(value),
        }
    }

    fn close(&mut self, reference: f64) -> Option<f64> {
        match self {
            Self::Ratio(ratio) => ratio.close(reference),
            Self::Fit(fit) => fit.close(reference),
            Self::Span(span) => span.close(reference),
        }
    }

    fn disarm(&mut self) {
        match self {
            Self::Ratio(ratio) => ratio.disarm(),
            Self::Fit(fit) => fit.disarm(),
            Self::Span(span) => span.disarm(),
        }
    }
}
