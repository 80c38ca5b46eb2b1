//! Real polynomial helpers
//!
//! Coefficients are stored in descending powers of s:
//! `[c_n, c_{n-1}, ..., c_0]` represents `c_n*s^n + ... + c_0`.

use nalgebra::DMatrix;
use num_complex::Complex64;

/// Product of two polynomials (discrete convolution of the coefficient sequences)
pub fn convolve(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &ai) in a.iter().enumerate() {
        for (j, &bj) in b.iter().enumerate() {
            out[i + j] += ai * bj;
        }
    }
    out
}

/// Sum of two polynomials, aligned on the constant term
pub fn add(a: &[f64], b: &[f64]) -> Vec<f64> {
    let n = a.len().max(b.len());
    let mut out = vec![0.0; n];
    for (i, &ai) in a.iter().enumerate() {
        out[n - a.len() + i] += ai;
    }
    for (i, &bi) in b.iter().enumerate() {
        out[n - b.len() + i] += bi;
    }
    out
}

/// Drop leading zero coefficients, keeping at least one coefficient
pub fn trim_leading_zeros(p: &[f64]) -> Vec<f64> {
    match p.iter().position(|&c| c != 0.0) {
        Some(first) => p[first..].to_vec(),
        None => vec![0.0],
    }
}

/// True if every coefficient is zero (or there are none)
pub fn is_zero(p: &[f64]) -> bool {
    p.iter().all(|&c| c == 0.0)
}

/// Degree of a trimmed polynomial
pub fn degree(p: &[f64]) -> usize {
    p.len().saturating_sub(1)
}

/// Evaluate at a complex point (Horner's scheme)
pub fn evaluate(p: &[f64], s: Complex64) -> Complex64 {
    p.iter()
        .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * s + c)
}

/// Value at s = 0 (the constant coefficient)
pub fn constant_term(p: &[f64]) -> f64 {
    p.last().copied().unwrap_or(0.0)
}

/// Roots as eigenvalues of the companion matrix
///
/// `p` must be trimmed (nonzero leading coefficient). Constants have no roots.
pub fn roots(p: &[f64]) -> Vec<Complex64> {
    let n = degree(p);
    if n == 0 {
        return Vec::new();
    }

    let lead = p[0];
    let mut companion = DMatrix::<f64>::zeros(n, n);
    for j in 0..n {
        companion[(0, j)] = -p[j + 1] / lead;
    }
    for i in 1..n {
        companion[(i, i - 1)] = 1.0;
    }

    companion.complex_eigenvalues().iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_convolve() {
        // (s + 1)(s + 2) = s^2 + 3s + 2
        assert_eq!(convolve(&[1.0, 1.0], &[1.0, 2.0]), vec![1.0, 3.0, 2.0]);
        // 2 * (3s + 1)
        assert_eq!(convolve(&[2.0], &[3.0, 1.0]), vec![6.0, 2.0]);
        assert!(convolve(&[], &[1.0]).is_empty());
    }

    #[test]
    fn test_add_aligns_constant_terms() {
        // (s^2 + 1) + (2s + 3)
        assert_eq!(add(&[1.0, 0.0, 1.0], &[2.0, 3.0]), vec![1.0, 2.0, 4.0]);
        assert_eq!(add(&[5.0], &[1.0, 1.0]), vec![1.0, 6.0]);
    }

    #[test]
    fn test_trim() {
        assert_eq!(trim_leading_zeros(&[0.0, 0.0, 2.0, 0.0]), vec![2.0, 0.0]);
        assert_eq!(trim_leading_zeros(&[0.0, 0.0]), vec![0.0]);
        assert!(is_zero(&[0.0, 0.0]));
        assert!(!is_zero(&[0.0, 1e-300]));
    }

    #[test]
    fn test_evaluate() {
        let p = [1.0, 3.0, 2.0];
        let v = evaluate(&p, Complex64::new(1.0, 0.0));
        assert_relative_eq!(v.re, 6.0);
        assert_relative_eq!(v.im, 0.0);
        assert_eq!(constant_term(&p), 2.0);
    }

    #[test]
    fn test_roots() {
        let mut r: Vec<f64> = roots(&[2.0, 6.0, 4.0]).iter().map(|z| z.re).collect();
        r.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_relative_eq!(r[0], -2.0, epsilon = 1e-10);
        assert_relative_eq!(r[1], -1.0, epsilon = 1e-10);

        // s^2 + 1 has roots ±j
        let r = roots(&[1.0, 0.0, 1.0]);
        assert_eq!(r.len(), 2);
        for z in r {
            assert_relative_eq!(z.re, 0.0, epsilon = 1e-10);
            assert_relative_eq!(z.im.abs(), 1.0, epsilon = 1e-10);
        }

        assert!(roots(&[3.0]).is_empty());
    }
}
