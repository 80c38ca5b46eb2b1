//! FOPDT identification from step-test records
//!
//! A first-order-plus-dead-time model
//!
//!   G(s) = K e^(-θs) / (τs + 1)
//!
//! is estimated from the times at which the zero-shifted output crosses fixed fractions of
//! its final change. Two competing graphical rules (Smith, Sundaresan) are scored by the RMSE
//! between the measured response and the simulated response of the fitted model with the
//! delay rationalized by a Padé approximant; [`select_best`] keeps the better one. A third,
//! reference estimator reads the dead time directly off the first departure from baseline.
//!
//! All times are measured from the first sample, where the step is applied.

mod estimators;
mod selector;

pub use estimators::{crossing_times, identify_reference, smith, static_gain, sundaresan};
pub use selector::{identify_best, identify_best_with_settings, select_best};

use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{FopdtError, Result};
use crate::lti::{pade_delay, TransferFunction};
use crate::settings::SimulationSettings;
use crate::signal::{rmse, StepTestRecord};
use crate::simulate::simulate_step_with;

/// Identification rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// t1 at 28.3 %, t2 at 63.2 %
    Smith,
    /// t1 at 35.3 %, t2 at 85.3 %
    Sundaresan,
    /// Dead time from the first departure, time constant at 63.21 %
    Reference,
}

impl Method {
    /// Competing estimators in tie-break preference order
    pub const ESTIMATORS: [Method; 2] = [Method::Sundaresan, Method::Smith];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Smith => "Smith",
            Method::Sundaresan => "Sundaresan",
            Method::Reference => "Reference",
        }
    }

    /// Rank used to break ties between equal fit errors (lower wins)
    pub fn preference(&self) -> usize {
        match self {
            Method::Sundaresan => 0,
            Method::Smith => 1,
            Method::Reference => 2,
        }
    }

    /// Run this rule's estimator on `record`
    pub fn estimate(&self, record: &StepTestRecord) -> Result<FopdtParameters> {
        match self {
            Method::Smith => smith(record),
            Method::Sundaresan => sundaresan(record),
            Method::Reference => identify_reference(record),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static gain, time constant and dead time of a FOPDT model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FopdtParameters {
    /// Static gain
    pub k: f64,
    /// Time constant
    pub tau: f64,
    /// Dead time
    pub theta: f64,
}

impl FopdtParameters {
    pub fn new(k: f64, tau: f64, theta: f64) -> Self {
        Self { k, tau, theta }
    }

    /// Finite, with non-negative time constant and dead time
    pub fn is_physical(&self) -> bool {
        self.k.is_finite()
            && self.tau.is_finite()
            && self.theta.is_finite()
            && self.tau >= 0.0
            && self.theta >= 0.0
    }

    /// `K/(τs + 1)` in series with the order-`pade_order` Padé approximant of `e^(-θs)`
    ///
    /// # Errors
    ///
    /// `NegativeDeadTime` if `theta < 0`; `NonFinite` for non-finite parameters.
    pub fn transfer_function(&self, pade_order: usize) -> Result<TransferFunction> {
        let delay = pade_delay(self.theta, pade_order)?;
        let lag = TransferFunction::first_order(self.k, self.tau)?;
        Ok(delay.series(&lag))
    }

    /// Exact response to a step of `amplitude` applied at `times[0]`, with the true delay
    pub fn ideal_response(&self, times: &[f64], amplitude: f64) -> Vec<f64> {
        let Some(&t0) = times.first() else {
            return Vec::new();
        };
        let gain = self.k * amplitude;
        times
            .iter()
            .map(|&t| {
                let elapsed = t - t0 - self.theta;
                if elapsed < 0.0 {
                    0.0
                } else if self.tau == 0.0 {
                    gain
                } else {
                    gain * (1.0 - (-elapsed / self.tau).exp())
                }
            })
            .collect()
    }
}

impl fmt::Display for FopdtParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "K = {:.4}, tau = {:.4}, theta = {:.4}",
            self.k, self.tau, self.theta
        )
    }
}

/// Outcome of one estimator: its parameters and their fit error
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdentificationResult {
    pub method: Method,
    pub params: FopdtParameters,
    /// RMSE between the zero-shifted measurement and the model's simulated response
    pub error: f64,
}

impl fmt::Display for IdentificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} (RMSE {:.6})", self.method, self.params, self.error)
    }
}

/// RMSE between `record`'s zero-shifted output and the step response of `params`
///
/// The model is simulated at the record's own sample times for a step of the record's
/// amplitude, with the dead time replaced by an order-`pade_order` Padé approximant.
pub fn fit_error(
    record: &StepTestRecord,
    params: &FopdtParameters,
    pade_order: usize,
    settings: &SimulationSettings,
) -> Result<f64> {
    let model = params.transfer_function(pade_order)?;
    let simulated = simulate_step_with(&model, record.time(), record.step_amplitude(), settings)?;
    Ok(rmse(&record.response().zero_shifted(), &simulated))
}

/// Estimate parameters with `method` and score them
///
/// # Errors
///
/// Estimation errors are returned as-is. A fit that cannot be simulated (for example a
/// negative dead time) is wrapped in `FitFailed`, which keeps the estimated parameters.
pub fn identify(
    record: &StepTestRecord,
    method: Method,
    pade_order: usize,
) -> Result<IdentificationResult> {
    identify_with_settings(record, method, pade_order, &SimulationSettings::default())
}

/// [`identify`] with explicit simulation settings
pub fn identify_with_settings(
    record: &StepTestRecord,
    method: Method,
    pade_order: usize,
    settings: &SimulationSettings,
) -> Result<IdentificationResult> {
    let params = method.estimate(record)?;
    if !params.is_physical() {
        warn!("{method} produced non-physical parameters: {params}");
    }

    let error =
        fit_error(record, &params, pade_order, settings).map_err(|source| FopdtError::FitFailed {
            method,
            params,
            source: Box::new(source),
        })?;

    Ok(IdentificationResult {
        method,
        params,
        error,
    })
}
