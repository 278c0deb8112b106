//! Common test utilities for calibration integration tests
//!
//! This module provides:
//! - A recording adjustment double that logs every hook call
//! - A deterministic linear-sensor generator with LCG noise
//! - A driver that plays (reference, raw) rounds into an axis

#![allow(dead_code)]

use reckon_core::{Adjustment, SensorFusion, Timestamp};

/// One adjustment hook call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hook {
    Reference {
        old: Option<Timestamp>,
        new: Timestamp,
        value: f64,
        accuracy: f64,
    },
    Sensor {
        old_reference: Option<Timestamp>,
        old_sensor: Option<Timestamp>,
        new: Timestamp,
        value: f64,
        is_valid: bool,
    },
}

/// Adjustment that records every call
#[derive(Debug, Default)]
pub struct RecordingAdjustment {
    pub hooks: Vec<Hook>,
    /// Answer false to every hook
    pub refuse: bool,
}

impl RecordingAdjustment {
    pub fn references(&self) -> impl Iterator<Item = &Hook> {
        self.hooks.iter().filter(|hook| matches!(hook, Hook::Reference { .. }))
    }

    pub fn sensors(&self) -> impl Iterator<Item = &Hook> {
        self.hooks.iter().filter(|hook| matches!(hook, Hook::Sensor { .. }))
    }
}

impl Adjustment for RecordingAdjustment {
    fn on_reference(
        &mut self,
        old: Option<Timestamp>,
        new: Timestamp,
        value: f64,
        accuracy: f64,
    ) -> bool {
        self.hooks.push(Hook::Reference { old, new, value, accuracy });
        !self.refuse
    }

    fn on_sensor(
        &mut self,
        old_reference: Option<Timestamp>,
        old_sensor: Option<Timestamp>,
        new: Timestamp,
        value: f64,
        is_valid: bool,
    ) -> bool {
        self.hooks.push(Hook::Sensor {
            old_reference,
            old_sensor,
            new,
            value,
            is_valid,
        });
        is_valid && !self.refuse
    }
}

/// Sensor following `raw = reference / scale + bias + noise`
pub struct LinearSensor {
    pub scale: f64,
    pub bias: f64,
    /// Peak noise added to the raw value
    pub noise: f64,
    seed: u32,
}

impl LinearSensor {
    pub fn new(scale: f64, bias: f64, noise: f64) -> Self {
        Self {
            scale,
            bias,
            noise,
            seed: 42,
        }
    }

    /// Uniform in [0, 1]
    fn random_float(&mut self) -> f64 {
        self.seed = self.seed.wrapping_mul(1664525).wrapping_add(1013904223);
        f64::from(self.seed) / f64::from(u32::MAX)
    }

    /// Uniform in [-amplitude, amplitude]
    fn random_noise(&mut self, amplitude: f64) -> f64 {
        (self.random_float() * 2.0 - 1.0) * amplitude
    }

    /// Raw reading for a true reference value
    pub fn read(&mut self, reference: f64) -> f64 {
        reference / self.scale + self.bias + self.random_noise(self.noise)
    }

    /// `count` rounds with references drawn from [low, high]
    pub fn rounds(&mut self, count: usize, low: f64, high: f64) -> Vec<(f64, f64)> {
        (0..count)
            .map(|_| {
                let reference = low + (high - low) * self.random_float();
                (reference, self.read(reference))
            })
            .collect()
    }
}

/// Play rounds of AddRef (at t) then AddSen (at t + 0.5), one second apart
pub fn drive<A: Adjustment>(
    axis: &mut SensorFusion<A>,
    rounds: &[(f64, f64)],
    accuracy: Option<f64>,
) {
    for (t, &(reference, raw)) in rounds.iter().enumerate() {
        let t = t as f64;
        axis.add_ref(t, reference, accuracy);
        axis.add_sen(t + 0.5, raw, true);
    }
}

/// The rounds of the reference end-to-end scenario
pub const SCENARIO: [(f64, f64); 5] = [
    (100.0, 7.0),
    (200.0, 12.0),
    (300.0, 17.0),
    (100.0, 7.0),
    (200.0, 12.0),
];

pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}
