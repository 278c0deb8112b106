//! Thread-Shared Axis
//!
//! When the reference driver and the sensor driver of one axis run on
//! different threads, every `add_ref`/`add_sen` must see both channels and
//! both timestamps at once. [`SharedAxis`] holds the orchestrator behind one
//! mutex and keeps the lock for the whole call.
//!
//! ```text
//! GNSS thread ───► add_ref ──┐
//!                            ├──► Mutex<SensorFusion> (one call at a time)
//! wheel thread ──► add_sen ──┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    calibration::Readout, orchestrator::SensorFusion, time::Timestamp, traits::Adjustment,
};

/// Cloneable handle to one orchestrated axis
#[derive(Debug)]
pub struct SharedAxis<A> {
    inner: Arc<Mutex<SensorFusion<A>>>,
}

impl<A> Clone for SharedAxis<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: Adjustment> SharedAxis<A> {
    /// Share an axis
    pub fn new(axis: SensorFusion<A>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(axis)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SensorFusion<A>> {
        // Every update leaves the axis consistent, so a poisoned lock is still usable
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// [`SensorFusion::add_ref`] under the axis lock
    pub fn add_ref(&self, timestamp: Timestamp, value: f64, accuracy: Option<f64>) -> bool {
        self.lock().add_ref(timestamp, value, accuracy)
    }

    /// [`SensorFusion::add_sen`] under the axis lock
    pub fn add_sen(&self, timestamp: Timestamp, value: f64, is_valid: bool) -> bool {
        self.lock().add_sen(timestamp, value, is_valid)
    }

    /// Bias readout
    pub fn bias(&self) -> Readout {
        self.lock().bias()
    }

    /// Scale readout
    pub fn scale(&self) -> Readout {
        self.lock().scale()
    }

    /// [`SensorFusion::correct`] under the axis lock
    pub fn correct(&self, raw: f64) -> Option<f64> {
        self.lock().correct(raw)
    }

    /// Run `f` with exclusive access to the axis
    pub fn with<R>(&self, f: impl FnOnce(&mut SensorFusion<A>) -> R) -> R {
        f(&mut self.lock())
    }
}
