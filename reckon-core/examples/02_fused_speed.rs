//! Fused Speed Example
//!
//! Two calibrated wheel axes share one adjustment stage, and their corrected
//! speeds are blended by the scalar fuser.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_fused_speed
//! ```

use std::sync::{Arc, Mutex};

use reckon_core::{Adjustment, AxisConfig, KalmanFuser, SensorFusion, Timestamp};

/// Counts how often the adjustment stage was asked to integrate
#[derive(Default)]
struct Odometer {
    references: usize,
    sensor_intervals: f64,
}

impl Adjustment for Odometer {
    fn on_reference(&mut self, _: Option<Timestamp>, _: Timestamp, _: f64, _: f64) -> bool {
        self.references += 1;
        true
    }

    fn on_sensor(
        &mut self,
        _: Option<Timestamp>,
        old_sensor: Option<Timestamp>,
        new_sensor: Timestamp,
        _: f64,
        is_valid: bool,
    ) -> bool {
        if let (Some(old), true) = (old_sensor, is_valid) {
            self.sensor_intervals += new_sensor - old;
        }
        is_valid
    }
}

fn main() {
    println!("Reckon Fused Speed Example");
    println!("==========================\n");

    let odometer = Arc::new(Mutex::new(Odometer::default()));
    let mut left = SensorFusion::new(AxisConfig::default(), Arc::clone(&odometer))
        .expect("default limits are valid");
    let mut right = SensorFusion::new(AxisConfig::default(), Arc::clone(&odometer))
        .expect("default limits are valid");

    let speeds = [6.0, 14.0, 22.0, 9.0, 18.0, 27.0, 12.0];
    for (i, &speed) in speeds.iter().enumerate() {
        let t = i as f64;
        left.add_ref(t, speed, Some(0.1));
        right.add_ref(t, speed, Some(0.1));
        left.add_sen(t + 0.5, speed / 20.0 + 2.0, true);
        right.add_sen(t + 0.5, speed / 25.0 - 1.0, true);
    }

    let (Some(left_speed), Some(right_speed)) =
        (left.correct(17.0 / 20.0 + 2.0), right.correct(17.0 / 25.0 - 1.0))
    else {
        println!("Not calibrated yet");
        return;
    };

    let mut fuser = KalmanFuser::new();
    fuser.add_data(left_speed, left.scale().mld.max(0.01));
    fuser.add_data(right_speed, right.scale().mld.max(0.01));

    println!("Left:  {:.2} m/s", left_speed);
    println!("Right: {:.2} m/s", right_speed);
    println!("Fused: {:.2} m/s (accuracy {:.3})", fuser.value(), fuser.accuracy());

    let odometer = odometer.lock().unwrap_or_else(|e| e.into_inner());
    println!(
        "Adjustment saw {} references and {:.1}s of sensor intervals",
        odometer.references, odometer.sensor_intervals
    );
}
