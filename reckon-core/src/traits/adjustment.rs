//! Adjustment Capability
//!
//! The adjustment capability is the collaborator that converts raw samples
//! into physically meaningful ones (wheel ticks into metres, gyro counts into
//! degrees) once calibration is good enough. It lives outside this crate.
//!
//! The orchestrator calls one hook per reference update it accepted and one
//! hook per sensor update, passing the previous and new timestamps so the
//! collaborator can integrate over the interval. The returned flag is only
//! logged; calibration state never depends on it.
//!
//! ## Handles
//!
//! The orchestrator holds a handle, never the collaborator itself:
//! - `&mut T` lends an adjustment to one axis for the axis' lifetime
//! - `Arc<Mutex<T>>` (std) shares one adjustment between axes on
//!   different threads

use crate::time::Timestamp;

/// Hooks invoked by [`SensorFusion`](crate::SensorFusion) on every update
pub trait Adjustment {
    /// An accepted reference sample
    ///
    /// `old_reference` is `None` for the first accepted reference.
    fn on_reference(
        &mut self,
        old_reference: Option<Timestamp>,
        new_reference: Timestamp,
        value: f64,
        accuracy: f64,
    ) -> bool;

    /// A sensor sample, valid or not
    ///
    /// `is_valid` is the flag the driver passed to
    /// [`add_sen`](crate::SensorFusion::add_sen). A valid sample reaches this
    /// hook whether or not a calibration channel was armed to use it.
    fn on_sensor(
        &mut self,
        old_reference: Option<Timestamp>,
        old_sensor: Option<Timestamp>,
        new_sensor: Timestamp,
        value: f64,
        is_valid: bool,
    ) -> bool;
}

impl<T: Adjustment + ?Sized> Adjustment for &mut T {
    fn on_reference(
        &mut self,
        old_reference: Option<Timestamp>,
        new_reference: Timestamp,
        value: f64,
        accuracy: f64,
    ) -> bool {
        (**self).on_reference(old_reference, new_reference, value, accuracy)
    }

    fn on_sensor(
        &mut self,
        old_reference: Option<Timestamp>,
        old_sensor: Option<Timestamp>,
        new_sensor: Timestamp,
        value: f64,
        is_valid: bool,
    ) -> bool {
        (**self).on_sensor(old_reference, old_sensor, new_sensor, value, is_valid)
    }
}

#[cfg(feature = "std")]
impl<T: Adjustment + ?Sized> Adjustment for std::sync::Arc<std::sync::Mutex<T>> {
    fn on_reference(
        &mut self,
        old_reference: Option<Timestamp>,
        new_reference: Timestamp,
        value: f64,
        accuracy: f64,
    ) -> bool {
        // A poisoned lock still holds a usable adjustment; the panic happened elsewhere
        let mut inner = self.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        inner.on_reference(old_reference, new_reference, value, accuracy)
    }

    fn on_sensor(
        &mut self,
        old_reference: Option<Timestamp>,
        old_sensor: Option<Timestamp>,
        new_sensor: Timestamp,
        value: f64,
        is_valid: bool,
    ) -> bool {
        let mut inner = self.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        inner.on_sensor(old_reference, old_sensor, new_sensor, value, is_valid)
    }
}

/// Adjustment that accepts every update and does nothing
///
/// For axes that only need the calibration readouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullAdjustment;

impl Adjustment for NullAdjustment {
    fn on_reference(&mut self, _: Option<Timestamp>, _: Timestamp, _: f64, _: f64) -> bool {
        true
    }

    fn on_sensor(
        &mut self,
        _: Option<Timestamp>,
        _: Option<Timestamp>,
        _: Timestamp,
        _: f64,
        is_valid: bool,
    ) -> bool {
        is_valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counting {
        references: usize,
        sensors: usize,
    }

    impl Adjustment for Counting {
        fn on_reference(&mut self, _: Option<Timestamp>, _: Timestamp, _: f64, _: f64) -> bool {
            self.references += 1;
            true
        }

        fn on_sensor(
            &mut self,
            _: Option<Timestamp>,
            _: Option<Timestamp>,
            _: Timestamp,
            _: f64,
            _: bool,
        ) -> bool {
            self.sensors += 1;
            false
        }
    }

    fn drive<A: Adjustment>(mut adjustment: A) -> (bool, bool) {
        (
            adjustment.on_reference(None, 1.0, 10.0, 0.1),
            adjustment.on_sensor(Some(1.0), None, 1.5, 3.0, true),
        )
    }

    #[test]
    fn borrowed_handle_forwards_to_owner() {
        let mut counting = Counting::default();
        assert_eq!(drive(&mut counting), (true, false));
        assert_eq!(counting.references, 1);
        assert_eq!(counting.sensors, 1);
    }

    #[test]
    fn null_adjustment_echoes_validity() {
        let mut null = NullAdjustment;
        assert!(null.on_reference(None, 0.0, 1.0, 0.1));
        assert!(null.on_sensor(None, None, 0.0, 1.0, true));
        assert!(!null.on_sensor(None, None, 0.0, 1.0, false));
    }

    #[cfg(feature = "std")]
    #[test]
    fn shared_handle_locks_owner() {
        use std::sync::{Arc, Mutex};

        let shared = Arc::new(Mutex::new(Counting::default()));
        let mut first = Arc::clone(&shared);
        let mut second = Arc::clone(&shared);

        first.on_reference(None, 1.0, 10.0, 0.1);
        second.on_reference(Some(1.0), 2.0, 11.0, 0.1);

        let counting = shared.lock().unwrap();
        assert_eq!(counting.references, 2);
    }
}
