//! Wheel Speed Calibration Example
//!
//! Calibrates a wheel-tick speed sensor against GNSS speed while driving,
//! then uses the learnt bias and scale to turn raw ticks into m/s.
//!
//! ## What You'll Learn
//!
//! - Creating an axis with an accuracy gate per channel
//! - Feeding interleaved reference and sensor samples
//! - Reading bias, scale and reliability
//! - Correcting raw readings once the scale is known
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_wheel_speed
//! ```

use reckon_core::{AxisConfig, NullAdjustment, SensorFusion};

fn main() {
    println!("Reckon Wheel Speed Calibration Example");
    println!("======================================\n");

    // True sensor: raw = speed / 20 + 2 (ticks per sample)
    let raw_for = |speed: f64| speed / 20.0 + 2.0;

    let mut axis = SensorFusion::new(AxisConfig::default(), NullAdjustment)
        .expect("default limits are valid");

    // GNSS speed in m/s with its reported accuracy
    let drive = [
        (5.0, Some(0.1)),
        (12.0, Some(0.1)),
        (20.0, Some(0.15)),
        (8.0, Some(0.1)),
        (15.0, None), // tunnel: accuracy unknown
        (15.5, Some(0.1)),
        (25.0, Some(0.1)),
        (10.0, Some(0.1)),
    ];

    for (i, &(speed, accuracy)) in drive.iter().enumerate() {
        let t = i as f64;
        let accepted = axis.add_ref(t, speed, accuracy);
        let raw = raw_for(speed);
        axis.add_sen(t + 0.5, raw, true);

        let scale = axis.scale();
        println!(
            "t={:3.1}s GNSS {:5.1} m/s {:9} raw {:5.2}  scale {:6.2} ({:5.1}%)",
            t,
            speed,
            if accepted { "accepted" } else { "rejected" },
            raw,
            scale.mean,
            scale.reliability,
        );
    }

    println!();
    println!("Bias:  {:.3} ticks ({:?})", axis.bias().mean, axis.bias().grade());
    println!("Scale: {:.3} m/s per tick ({:?})", axis.scale().mean, axis.scale().grade());

    if let Some(speed) = axis.correct(raw_for(17.0)) {
        println!("Raw {:.2} ticks → {:.2} m/s", raw_for(17.0), speed);
    }
}
