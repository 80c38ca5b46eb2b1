//! Padé approximation of a pure time delay
//!
//! `exp(-theta*s)` has no finite-dimensional realization. The (n, n) Padé approximant
//! replaces it by a rational function of equal numerator and denominator degree whose
//! Taylor expansion matches the delay up to order 2n.
//!
//! References:
//! - Golub, G. H., & Van Loan, C. F. (1996). Matrix Computations (3rd ed.). Section 11.3

use super::TransferFunction;
use crate::error::{FopdtError, Result};

/// Coefficients `(num, den)` of the (order, order) Padé approximant of `exp(-theta*s)`
///
/// Both polynomials are in descending powers and normalized so the leading denominator
/// coefficient is 1. `theta == 0` or `order == 0` gives the identity `[1] / [1]`.
pub fn pade_coefficients(theta: f64, order: usize) -> Result<(Vec<f64>, Vec<f64>)> {
    if !theta.is_finite() {
        return Err(FopdtError::NonFinite {
            field: "theta",
            index: 0,
        });
    }
    if theta < 0.0 {
        return Err(FopdtError::NegativeDeadTime { theta });
    }
    if theta == 0.0 || order == 0 {
        return Ok((vec![1.0], vec![1.0]));
    }

    let n = order;
    let mut num = vec![0.0; n + 1];
    let mut den = vec![0.0; n + 1];
    num[n] = 1.0;
    den[n] = 1.0;

    // Accumulated coefficient of s^k
    let mut cn = 1.0;
    let mut cd = 1.0;
    for k in 1..=n {
        let ratio = (n - k + 1) as f64 / (2 * n - k + 1) as f64 / k as f64;
        cn *= -theta * ratio;
        cd *= theta * ratio;
        num[n - k] = cn;
        den[n - k] = cd;
    }

    let lead = den[0];
    let num = num.iter().map(|c| c / lead).collect();
    let den = den.iter().map(|c| c / lead).collect();
    Ok((num, den))
}

/// Padé approximation of `exp(-theta*s)` as a transfer function
///
/// # Errors
///
/// `NegativeDeadTime` if `theta < 0`, `NonFinite` if `theta` is NaN or infinite.
pub fn pade_delay(theta: f64, order: usize) -> Result<TransferFunction> {
    let (num, den) = pade_coefficients(theta, order)?;
    TransferFunction::new(num, den)
}
