//! Integration tests for FOPDT identification
//!
//! Synthetic step tests generated from known parameters are fed back through the
//! estimators and the selector.

use approx::assert_relative_eq;

use fopdtsim::identification::{crossing_times, static_gain};
use fopdtsim::prelude::*;
use fopdtsim::signal::uniform_grid;
use fopdtsim::utils::constants::{SMITH_FRACTIONS, SUNDARESAN_FRACTIONS};

fn synthetic_record(params: FopdtParameters, amplitude: f64, dt: f64, horizon: f64) -> StepTestRecord {
    let time = uniform_grid(0.0, horizon, dt).unwrap();
    let output = params
        .ideal_response(&time, amplitude)
        .iter()
        .map(|y| y + 50.0)
        .collect();
    StepTestRecord::new(amplitude, time, output).unwrap()
}

fn ramp_record() -> StepTestRecord {
    let time: Vec<f64> = (0..6).map(|t| t as f64).collect();
    StepTestRecord::new(5.0, time, vec![0.0, 0.0, 1.0, 2.0, 2.5, 2.5]).unwrap()
}

#[test]
fn test_estimators_recover_known_model() {
    let truth = FopdtParameters::new(2.0, 10.0, 5.0);
    let record = synthetic_record(truth, 1.0, 0.02, 120.0);

    for method in [Method::Smith, Method::Sundaresan, Method::Reference] {
        let params = method.estimate(&record).unwrap();
        assert_relative_eq!(params.k, truth.k, max_relative = 0.01);
        assert_relative_eq!(params.tau, truth.tau, max_relative = 0.05);
        assert_relative_eq!(params.theta, truth.theta, max_relative = 0.05);
        assert!(params.is_physical(), "{method}: {params}");
    }
}

#[test]
fn test_static_gain_is_exact() {
    let truth = FopdtParameters::new(-0.8, 4.0, 1.0);
    let record = synthetic_record(truth, 2.5, 0.05, 80.0);
    let expected = record.output_change() / 2.5;
    assert_eq!(static_gain(&record), expected);
    assert_relative_eq!(static_gain(&record), -0.8, max_relative = 1e-6);
}

#[test]
fn test_crossing_times_are_ordered() {
    let record = synthetic_record(FopdtParameters::new(1.0, 3.0, 2.0), 1.0, 0.1, 40.0);
    for fractions in [SMITH_FRACTIONS, SUNDARESAN_FRACTIONS] {
        let (t1, t2) = crossing_times(&record, fractions).unwrap();
        assert!(t1 < t2);
        assert!(t1 >= 2.0);
    }
}

#[test]
fn test_ramp_scenario() {
    let record = ramp_record();

    let reference = identify_reference(&record).unwrap();
    assert_eq!(reference, FopdtParameters::new(0.5, 2.0, 1.0));

    let smith = smith(&record).unwrap();
    assert_relative_eq!(smith.tau, 1.5, epsilon = 1e-12);
    assert_relative_eq!(smith.theta, 1.5, epsilon = 1e-12);

    let sundaresan = sundaresan(&record).unwrap();
    assert_relative_eq!(sundaresan.tau, 4.0 / 3.0, epsilon = 1e-12);
    assert_relative_eq!(sundaresan.theta, 2.6 - 1.16, epsilon = 1e-12);
}

#[test]
fn test_fit_errors_are_non_negative() {
    let record = ramp_record();
    for method in [Method::Smith, Method::Sundaresan, Method::Reference] {
        let result = identify(&record, method, 2).unwrap();
        assert!(result.error >= 0.0);
        assert!(result.error.is_finite());
    }
}

#[test]
fn test_identify_best_picks_smallest_error() {
    let truth = FopdtParameters::new(1.5, 8.0, 3.0);
    let record = synthetic_record(truth, 2.0, 0.1, 100.0);

    let best = identify_best(&record, 2).unwrap();
    for method in Method::ESTIMATORS {
        let candidate = identify(&record, method, 2).unwrap();
        assert!(best.error <= candidate.error);
    }
    assert_relative_eq!(best.params.tau, truth.tau, max_relative = 0.05);
}

#[test]
fn test_identify_best_without_response() {
    let time = uniform_grid(0.0, 10.0, 1.0).unwrap();
    let output = vec![3.0; time.len()];
    let record = StepTestRecord::new(1.0, time, output).unwrap();

    match identify_best(&record, 2) {
        Err(FopdtError::NoValidModel { failures }) => {
            assert_eq!(failures.len(), Method::ESTIMATORS.len());
            assert!(failures
                .iter()
                .all(|f| f.kind() == ErrorKind::ThresholdNotFound));
        }
        other => panic!("expected NoValidModel, got {other:?}"),
    }
}
