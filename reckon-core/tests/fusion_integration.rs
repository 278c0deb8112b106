//! Integration tests for fusing calibrated axes
//!
//! Tests:
//! - Blending corrected readings of several axes with the scalar fuser
//! - Sharing one axis between driver threads
//! - Sharing one adjustment between axes on different threads
//! - Warm restart through serialised snapshots

mod common;

use std::{
    sync::{Arc, Mutex},
    thread,
};

use reckon_core::{
    AxisConfig, CalibrationMode, KalmanFuser, NormalisationEstimator, NormalisationSnapshot,
    NullAdjustment, SensorFusion, SharedAxis,
};

use common::{assert_close, drive, LinearSensor, RecordingAdjustment, SCENARIO};

#[test]
fn corrected_axes_fuse_toward_more_accurate_one() {
    // Two wheel-speed axes calibrated against the same reference
    let mut left_sensor = LinearSensor::new(20.0, 2.0, 0.01);
    let mut right_sensor = LinearSensor::new(25.0, -1.0, 0.2);
    let references = [60.0, 180.0, 300.0, 120.0, 240.0, 90.0, 270.0, 150.0];

    let mut left = SensorFusion::new(AxisConfig::default(), NullAdjustment).unwrap();
    let mut right = SensorFusion::new(AxisConfig::default(), NullAdjustment).unwrap();
    let left_rounds: Vec<_> = references.iter().map(|&r| (r, left_sensor.read(r))).collect();
    let right_rounds: Vec<_> = references.iter().map(|&r| (r, right_sensor.read(r))).collect();
    drive(&mut left, &left_rounds, Some(0.1));
    drive(&mut right, &right_rounds, Some(0.1));

    let truth = 200.0;
    let left_value = left.correct(left_sensor.read(truth)).unwrap();
    let right_value = right.correct(right_sensor.read(truth)).unwrap();

    let mut fuser = KalmanFuser::new();
    let used = fuser.fuse_all([
        (left_value, left.scale().mld.max(0.01)),
        (right_value, right.scale().mld.max(0.01)),
    ]);

    assert_eq!(used, 2);
    let (low, high) = if left_value <= right_value {
        (left_value, right_value)
    } else {
        (right_value, left_value)
    };
    assert!(fuser.value() >= low && fuser.value() <= high);
    assert_close(fuser.value(), truth, 10.0);
}

#[test]
fn fuser_matches_hand_computed_blend() {
    let mut fuser = KalmanFuser::new();
    assert!(fuser.add_data(10.0, 1.0));
    assert!(fuser.add_data(20.0, 1.0));
    assert!(!fuser.add_data(1000.0, 0.0));

    assert_eq!(fuser.value(), 15.0);
    assert_eq!(fuser.accuracy(), 1.0);
}

#[test]
fn shared_axis_serialises_driver_threads() {
    let config = AxisConfig::default().with_mode(CalibrationMode::Span);
    let axis = SharedAxis::new(SensorFusion::new(config, NullAdjustment).unwrap());

    // Reference thread runs the whole scenario first, then the sensor
    // thread only sees an armed axis
    let reference = {
        let axis = axis.clone();
        thread::spawn(move || {
            for (t, &(value, _)) in SCENARIO.iter().enumerate() {
                axis.add_ref(t as f64, value, Some(0.1));
            }
        })
    };
    reference.join().unwrap();

    let sensor = {
        let axis = axis.clone();
        thread::spawn(move || axis.add_sen(10.0, 7.0, true))
    };
    assert!(sensor.join().unwrap());
    assert_eq!(axis.with(|fusion| fusion.last_reference()), Some(4.0));
}

#[test]
fn one_adjustment_shared_by_two_axes() {
    let recorder = Arc::new(Mutex::new(RecordingAdjustment::default()));

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let recorder = Arc::clone(&recorder);
            thread::spawn(move || {
                let mut axis = SensorFusion::new(AxisConfig::default(), recorder).unwrap();
                drive(&mut axis, &SCENARIO, Some(0.1));
                axis.scale().mean
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 20.0);
    }
    let recorder = recorder.lock().unwrap();
    assert_eq!(recorder.references().count(), 10);
    assert_eq!(recorder.sensors().count(), 10);
}

#[test]
fn warm_restart_through_json() {
    let mut axis = SensorFusion::new(AxisConfig::default(), NullAdjustment).unwrap();
    drive(&mut axis, &SCENARIO, Some(0.1));

    let saved = serde_json::to_string(&axis.scale_channel().estimator().snapshot()).unwrap();
    let snapshot: NormalisationSnapshot = serde_json::from_str(&saved).unwrap();
    let scale = NormalisationEstimator::from_snapshot(snapshot).unwrap();

    let restored = SensorFusion::with_estimators(
        AxisConfig::default(),
        NullAdjustment,
        axis.bias_channel().estimator().clone(),
        scale,
    )
    .unwrap();

    assert_eq!(restored.scale(), axis.scale());
    assert_eq!(restored.bias(), axis.bias());
}

#[test]
fn axis_config_json_shape() {
    let config: AxisConfig = serde_json::from_str(
        r#"{"bias":{"accuracy_limit":0.8},"scale":{"accuracy_limit":0.2},"mode":"span"}"#,
    )
    .unwrap();

    assert_eq!(config, AxisConfig::default().with_bias_limit(0.8).with_scale_limit(0.2).with_mode(CalibrationMode::Span));
}
