//! Integration tests for transfer-function algebra and Padé delays

use approx::assert_relative_eq;
use num_complex::Complex64;

use fopdtsim::lti::{pade_coefficients, pade_delay};
use fopdtsim::prelude::*;
use fopdtsim::signal::uniform_grid;

#[test]
fn test_series_multiplies_polynomials() {
    // (s + 1)/(s + 2) * 1/(s + 3) = (s + 1)/(s^2 + 5s + 6)
    let a = TransferFunction::new(vec![1.0, 1.0], vec![1.0, 2.0]).unwrap();
    let b = TransferFunction::new(vec![1.0], vec![1.0, 3.0]).unwrap();

    let ab = series(&a, &b);
    assert_eq!(ab.num(), &[1.0, 1.0]);
    assert_eq!(ab.den(), &[1.0, 5.0, 6.0]);
    assert_eq!(&a * &b, ab);
}

#[test]
fn test_feedback_formula() {
    // G = 1/(s + 1), H = 2/(s + 4)
    // num = (s + 4), den = (s + 1)(s + 4) + 2 = s^2 + 5s + 6
    let g = TransferFunction::new(vec![1.0], vec![1.0, 1.0]).unwrap();
    let h = TransferFunction::new(vec![2.0], vec![1.0, 4.0]).unwrap();

    let cl = feedback(&g, &h).unwrap();
    assert_eq!(cl.num(), &[1.0, 4.0]);
    assert_eq!(cl.den(), &[1.0, 5.0, 6.0]);
}

#[test]
fn test_unity_feedback_of_first_order_lag() {
    // K/(tau s + 1) closed with unity feedback: DC gain K/(1 + K), pole -(1 + K)/tau
    for (k, tau) in [(1.0, 1.0), (2.0, 10.0), (0.5, 3.0)] {
        let g = TransferFunction::first_order(k, tau).unwrap();
        let cl = g.unity_feedback().unwrap();

        assert_relative_eq!(cl.dc_gain(), k / (1.0 + k), epsilon = 1e-12);
        let poles = cl.poles();
        assert_eq!(poles.len(), 1);
        assert_relative_eq!(poles[0].re, -(1.0 + k) / tau, epsilon = 1e-10);
        assert!(cl.is_stable());
    }
}

#[test]
fn test_feedback_rejects_cancelling_denominator() {
    // den = 1 + (-1) = 0
    let g = TransferFunction::gain(-1.0).unwrap();
    let h = TransferFunction::unity();
    assert!(matches!(feedback(&g, &h), Err(FopdtError::ZeroDenominator)));
}

#[test]
fn test_pade_coefficients() {
    let (num, den) = pade_coefficients(2.0, 1).unwrap();
    // (1 - s)/(1 + s) normalized by the leading denominator coefficient
    assert_relative_eq!(num[0], -1.0, epsilon = 1e-12);
    assert_relative_eq!(num[1], 1.0, epsilon = 1e-12);
    assert_relative_eq!(den[0], 1.0, epsilon = 1e-12);
    assert_relative_eq!(den[1], 1.0, epsilon = 1e-12);

    assert_eq!(pade_coefficients(0.0, 4).unwrap(), (vec![1.0], vec![1.0]));
    assert_eq!(pade_coefficients(1.5, 0).unwrap(), (vec![1.0], vec![1.0]));
    assert!(matches!(
        pade_coefficients(-0.1, 2),
        Err(FopdtError::NegativeDeadTime { .. })
    ));
}

#[test]
fn test_pade_delay_is_all_pass_with_unit_dc_gain() {
    for order in 1..=8 {
        let delay = pade_delay(1.5, order).unwrap();
        assert_eq!(delay.order(), order);
        assert_relative_eq!(delay.dc_gain(), 1.0, epsilon = 1e-10);
        for w in [0.1, 1.0, 10.0] {
            let magnitude = delay.evaluate(Complex64::new(0.0, w)).norm();
            assert_relative_eq!(magnitude, 1.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_delayed_step_response_approaches_shifted_step() {
    // With a 6th order approximation the delayed lag is close to the ideal curve
    let params = FopdtParameters::new(1.0, 5.0, 2.0);
    let tf = params.transfer_function(6).unwrap();
    let times = uniform_grid(0.0, 40.0, 0.5).unwrap();

    let simulated = simulate_step(&tf, &times, 1.0).unwrap();
    let ideal = params.ideal_response(&times, 1.0);
    for (s, i) in simulated.iter().zip(&ideal) {
        assert!((s - i).abs() < 0.02, "simulated {s}, ideal {i}");
    }
}

#[test]
fn test_display() {
    let tf = TransferFunction::new(vec![1.0, 3.0], vec![1.0, 0.0, 4.0]).unwrap();
    assert_eq!(tf.to_string(), "(1s + 3) / (1s^2 + 4)");
}
