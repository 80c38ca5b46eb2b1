//! PID tuning rules for FOPDT models
//!
//! Controllers are in ideal (ISA) form
//!
//!   C(s) = Kp (1 + 1/(Ti s) + Td s)
//!
//! # References
//! - Ziegler, J. G., & Nichols, N. B. (1942). "Optimum settings for automatic controllers".
//!   Transactions of the ASME, 64, 759-768.
//! - Chien, K. L., Hrones, J. A., & Reswick, J. B. (1952). "On the automatic control of
//!   generalized passive systems". Transactions of the ASME, 74, 175-185.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FopdtError, Result};
use crate::identification::FopdtParameters;
use crate::lti::TransferFunction;
use crate::utils::constants::CHR_OVERSHOOT_FACTOR;

/// Ideal-form PID gains
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    /// Proportional gain
    pub kp: f64,
    /// Integral time
    pub ti: f64,
    /// Derivative time
    pub td: f64,
}

impl PidGains {
    /// Create gains, rejecting non-finite values
    pub fn new(kp: f64, ti: f64, td: f64) -> Result<Self> {
        for (field, value) in [("kp", kp), ("ti", ti), ("td", td)] {
            if !value.is_finite() {
                return Err(FopdtError::NonFinite { field, index: 0 });
            }
        }
        Ok(Self { kp, ti, td })
    }

    /// Parallel-form integral gain `Kp / Ti`
    pub fn ki(&self) -> f64 {
        self.kp / self.ti
    }

    /// Parallel-form derivative gain `Kp * Td`
    pub fn kd(&self) -> f64 {
        self.kp * self.td
    }

    /// `Kp + Kp/(Ti s) + Kp Td s = Kp (Ti Td s^2 + Ti s + 1) / (Ti s)`
    ///
    /// The result is improper whenever `Td != 0`; it is only simulated in series with a
    /// plant of relative degree two or more.
    ///
    /// # Errors
    ///
    /// `DegenerateParameter` if `Ti == 0`.
    pub fn transfer_function(&self) -> Result<TransferFunction> {
        if self.ti == 0.0 {
            return Err(FopdtError::DegenerateParameter {
                parameter: "ti",
                value: self.ti,
            });
        }
        TransferFunction::new(
            vec![self.kp * self.ti * self.td, self.kp * self.ti, self.kp],
            vec![self.ti, 0.0],
        )
    }
}

impl fmt::Display for PidGains {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Kp = {:.4}, Ti = {:.4}, Td = {:.4}", self.kp, self.ti, self.td)
    }
}

fn check_divisors(params: &FopdtParameters) -> Result<()> {
    if params.k == 0.0 {
        return Err(FopdtError::DegenerateParameter {
            parameter: "k",
            value: params.k,
        });
    }
    if params.theta == 0.0 {
        return Err(FopdtError::DegenerateParameter {
            parameter: "theta",
            value: params.theta,
        });
    }
    Ok(())
}

/// Ziegler-Nichols open-loop (reaction curve) rule
///
///   Kp = 1.2 τ / (K θ),  Ti = 2 θ,  Td = 0.5 θ
pub fn ziegler_nichols_open_loop(params: &FopdtParameters) -> Result<PidGains> {
    check_divisors(params)?;
    let FopdtParameters { k, tau, theta } = *params;
    PidGains::new(1.2 * tau / (k * theta), 2.0 * theta, 0.5 * theta)
}

/// CHR set-point rule, with `Kp` scaled by `overshoot_factor`
///
///   Kp = factor · 0.95 τ / (K θ),  Ti = 1.357 τ,  Td = 0.473 θ
pub fn chr_overshoot(params: &FopdtParameters, overshoot_factor: f64) -> Result<PidGains> {
    check_divisors(params)?;
    let FopdtParameters { k, tau, theta } = *params;
    let kp = 0.95 * tau / (k * theta);
    PidGains::new(overshoot_factor * kp, 1.357 * tau, 0.473 * theta)
}

/// User-supplied gains, only checked for finiteness
pub fn manual(kp: f64, ti: f64, td: f64) -> Result<PidGains> {
    PidGains::new(kp, ti, td)
}

fn default_overshoot_factor() -> f64 {
    CHR_OVERSHOOT_FACTOR
}

/// Tuning rule selector
///
/// Deserializes from `{"method": "zn"}`, `{"method": "chr", "overshoot_factor": 1.2}` or
/// `{"method": "manual", "kp": .., "ti": .., "td": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum TuningRule {
    #[serde(rename = "zn")]
    ZieglerNichols,
    Chr {
        #[serde(default = "default_overshoot_factor")]
        overshoot_factor: f64,
    },
    Manual { kp: f64, ti: f64, td: f64 },
}

impl TuningRule {
    /// CHR with the default overshoot factor
    pub fn chr() -> Self {
        TuningRule::Chr {
            overshoot_factor: CHR_OVERSHOOT_FACTOR,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TuningRule::ZieglerNichols => "Ziegler-Nichols",
            TuningRule::Chr { .. } => "CHR",
            TuningRule::Manual { .. } => "Manual",
        }
    }

    /// Gains for `params` under this rule
    pub fn gains(&self, params: &FopdtParameters) -> Result<PidGains> {
        match *self {
            TuningRule::ZieglerNichols => ziegler_nichols_open_loop(params),
            TuningRule::Chr { overshoot_factor } => chr_overshoot(params, overshoot_factor),
            TuningRule::Manual { kp, ti, td } => manual(kp, ti, td),
        }
    }
}

impl fmt::Display for TuningRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
