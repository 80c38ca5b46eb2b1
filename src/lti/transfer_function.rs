//! Rational transfer functions and their composition
//!
//!   H(s) = B(s) / A(s) = (b_n s^n + ... + b_0) / (a_m s^m + ... + a_0)
//!
//! Polynomials are specified in **descending powers** of s. Leading zeros are trimmed on
//! construction, so `den()[0]` is never zero. Strict properness is not required for the
//! algebra; only [`TransferFunction::to_state_space`] rejects improper systems.

use std::fmt;
use std::ops::Mul;

use num_complex::Complex64;
use serde::Serialize;

use super::polynomial;
use super::StateSpace;
use crate::error::{FopdtError, Result};

/// SISO rational transfer function `num(s) / den(s)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferFunction {
    num: Vec<f64>,
    den: Vec<f64>,
}

impl TransferFunction {
    /// Create a transfer function from coefficient vectors in descending powers
    ///
    /// # Errors
    ///
    /// - `EmptyPolynomial` if either vector is empty
    /// - `NonFinite` if a coefficient is NaN or infinite
    /// - `ZeroDenominator` if every denominator coefficient is zero
    pub fn new(num: Vec<f64>, den: Vec<f64>) -> Result<Self> {
        if num.is_empty() {
            return Err(FopdtError::EmptyPolynomial { which: "numerator" });
        }
        if den.is_empty() {
            return Err(FopdtError::EmptyPolynomial {
                which: "denominator",
            });
        }
        if let Some(index) = num.iter().position(|c| !c.is_finite()) {
            return Err(FopdtError::NonFinite {
                field: "numerator",
                index,
            });
        }
        if let Some(index) = den.iter().position(|c| !c.is_finite()) {
            return Err(FopdtError::NonFinite {
                field: "denominator",
                index,
            });
        }
        if polynomial::is_zero(&den) {
            return Err(FopdtError::ZeroDenominator);
        }

        Ok(Self {
            num: polynomial::trim_leading_zeros(&num),
            den: polynomial::trim_leading_zeros(&den),
        })
    }

    /// The identity `1/1`
    pub fn unity() -> Self {
        Self {
            num: vec![1.0],
            den: vec![1.0],
        }
    }

    /// Static gain `k/1`
    pub fn gain(k: f64) -> Result<Self> {
        Self::new(vec![k], vec![1.0])
    }

    /// First-order lag `k/(tau*s + 1)`
    ///
    /// `tau == 0` collapses to the static gain `k`.
    pub fn first_order(k: f64, tau: f64) -> Result<Self> {
        Self::new(vec![k], vec![tau, 1.0])
    }

    pub fn num(&self) -> &[f64] {
        &self.num
    }

    pub fn den(&self) -> &[f64] {
        &self.den
    }

    /// Degree of the denominator
    pub fn order(&self) -> usize {
        polynomial::degree(&self.den)
    }

    /// Numerator degree does not exceed denominator degree
    pub fn is_proper(&self) -> bool {
        polynomial::degree(&self.num) <= polynomial::degree(&self.den)
    }

    /// Value of `H(s)` at a complex frequency
    pub fn evaluate(&self, s: Complex64) -> Complex64 {
        polynomial::evaluate(&self.num, s) / polynomial::evaluate(&self.den, s)
    }

    /// Steady-state gain `H(0)`
    ///
    /// Infinite (or NaN for `0/0`) when the denominator has a root at the origin.
    pub fn dc_gain(&self) -> f64 {
        polynomial::constant_term(&self.num) / polynomial::constant_term(&self.den)
    }

    /// Roots of the denominator
    pub fn poles(&self) -> Vec<Complex64> {
        polynomial::roots(&self.den)
    }

    /// Roots of the numerator (none for a zero numerator)
    pub fn zeros(&self) -> Vec<Complex64> {
        if polynomial::is_zero(&self.num) {
            return Vec::new();
        }
        polynomial::roots(&self.num)
    }

    /// Every pole lies strictly in the left half-plane
    pub fn is_stable(&self) -> bool {
        self.poles().iter().all(|p| p.re < 0.0)
    }

    /// Series connection `self * other`
    pub fn series(&self, other: &TransferFunction) -> TransferFunction {
        // Product of nonzero leading coefficients stays nonzero
        TransferFunction {
            num: polynomial::trim_leading_zeros(&polynomial::convolve(&self.num, &other.num)),
            den: polynomial::trim_leading_zeros(&polynomial::convolve(&self.den, &other.den)),
        }
    }

    /// Negative feedback loop with `self` in the forward path and `h` in the return path
    ///
    ///   num = G.num * H.den
    ///   den = G.den * H.den + G.num * H.num
    ///
    /// # Errors
    ///
    /// `ZeroDenominator` if the closed-loop denominator cancels to the zero polynomial.
    pub fn feedback(&self, h: &TransferFunction) -> Result<TransferFunction> {
        let num = polynomial::convolve(&self.num, &h.den);
        let den = polynomial::add(
            &polynomial::convolve(&self.den, &h.den),
            &polynomial::convolve(&self.num, &h.num),
        );
        if polynomial::is_zero(&den) {
            return Err(FopdtError::ZeroDenominator);
        }
        Ok(TransferFunction {
            num: polynomial::trim_leading_zeros(&num),
            den: polynomial::trim_leading_zeros(&den),
        })
    }

    /// Negative unity feedback: `num = G.num`, `den = G.den + G.num`
    pub fn unity_feedback(&self) -> Result<TransferFunction> {
        self.feedback(&TransferFunction::unity())
    }

    /// Controllable canonical state-space realization
    ///
    /// # Errors
    ///
    /// `ImproperSystem` if the numerator degree exceeds the denominator degree.
    pub fn to_state_space(&self) -> Result<StateSpace> {
        if !self.is_proper() {
            return Err(FopdtError::ImproperSystem {
                num_degree: polynomial::degree(&self.num),
                den_degree: polynomial::degree(&self.den),
            });
        }
        Ok(StateSpace::from_coefficients(&self.num, &self.den))
    }
}

impl Mul for &TransferFunction {
    type Output = TransferFunction;

    fn mul(self, rhs: &TransferFunction) -> TransferFunction {
        self.series(rhs)
    }
}

impl Mul for TransferFunction {
    type Output = TransferFunction;

    fn mul(self, rhs: TransferFunction) -> TransferFunction {
        self.series(&rhs)
    }
}

impl fmt::Display for TransferFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}) / ({})",
            format_polynomial(&self.num),
            format_polynomial(&self.den)
        )
    }
}

fn format_polynomial(p: &[f64]) -> String {
    let n = polynomial::degree(p);
    let terms: Vec<String> = p
        .iter()
        .enumerate()
        .filter(|(_, c)| **c != 0.0)
        .map(|(i, &c)| match n - i {
            0 => format!("{c}"),
            1 => format!("{c}s"),
            power => format!("{c}s^{power}"),
        })
        .collect();
    if terms.is_empty() {
        "0".to_string()
    } else {
        terms.join(" + ")
    }
}

/// Series connection `a * b`
pub fn series(a: &TransferFunction, b: &TransferFunction) -> TransferFunction {
    a.series(b)
}

/// Negative feedback of `g` through `h`
pub fn feedback(g: &TransferFunction, h: &TransferFunction) -> Result<TransferFunction> {
    g.feedback(h)
}
