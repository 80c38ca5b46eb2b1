//! State-space realization of a SISO transfer function
//!
//!   dx/dt = Ax + Bu
//!   y = Cx + Du

use nalgebra::{DMatrix, DVector};

/// SISO state-space model with dynamically sized matrices
///
/// Produced by [`TransferFunction::to_state_space`](super::TransferFunction::to_state_space)
/// in controllable canonical form (the same realization as `scipy.signal.tf2ss`).
#[derive(Debug, Clone, PartialEq)]
pub struct StateSpace {
    /// State matrix (N×N)
    a: DMatrix<f64>,
    /// Input vector (N)
    b: DVector<f64>,
    /// Output vector (N)
    c: DVector<f64>,
    /// Feedthrough
    d: f64,
}

impl StateSpace {
    /// Realize a proper transfer function
    ///
    /// `num` and `den` are in descending powers with `den[0] != 0` and
    /// `num.len() <= den.len()`; callers validate this.
    pub(crate) fn from_coefficients(num: &[f64], den: &[f64]) -> Self {
        let lead = den[0];
        let den_norm: Vec<f64> = den.iter().map(|&x| x / lead).collect();
        let mut num_norm: Vec<f64> = num.iter().map(|&x| x / lead).collect();
        while num_norm.len() < den_norm.len() {
            num_norm.insert(0, 0.0);
        }

        let n = den_norm.len() - 1;

        // Direct feedthrough when numerator and denominator have the same degree
        let d = num_norm[0];

        // Strictly proper remainder num - D*den, without its (zero) leading coefficient
        let c_coeffs: Vec<f64> = (1..=n)
            .map(|i| num_norm[i] - d * den_norm[i])
            .collect();

        let mut a = DMatrix::zeros(n, n);
        let mut b = DVector::zeros(n);
        if n > 0 {
            // First row: -a_{n-1}, ..., -a_0; identity on the subdiagonal
            for j in 0..n {
                a[(0, j)] = -den_norm[j + 1];
            }
            for i in 1..n {
                a[(i, i - 1)] = 1.0;
            }
            b[0] = 1.0;
        }

        Self {
            a,
            b,
            c: DVector::from_vec(c_coeffs),
            d,
        }
    }

    /// Number of states
    pub fn order(&self) -> usize {
        self.b.len()
    }

    pub fn a_matrix(&self) -> &DMatrix<f64> {
        &self.a
    }

    pub fn b_vector(&self) -> &DVector<f64> {
        &self.b
    }

    pub fn c_vector(&self) -> &DVector<f64> {
        &self.c
    }

    pub fn d_value(&self) -> f64 {
        self.d
    }

    /// Returns true if there is direct feedthrough (D != 0)
    pub fn has_passthrough(&self) -> bool {
        self.d != 0.0
    }

    /// Compute state derivative: dx/dt = Ax + Bu
    pub fn derivative(&self, state: &DVector<f64>, input: f64) -> DVector<f64> {
        &self.a * state + &self.b * input
    }

    /// Compute output: y = Cx + Du
    pub fn output(&self, state: &DVector<f64>, input: f64) -> f64 {
        self.c.dot(state) + self.d * input
    }
}
