//! Closed-loop evaluation of a PID controller on a FOPDT plant
//!
//!   r ──(+)── C(s) ── K e^(-θs)/(τs + 1) ──┬── y
//!        └(-)──────────────────────────────┘

use log::debug;
use serde::Serialize;

use crate::error::Result;
use crate::identification::FopdtParameters;
use crate::lti::TransferFunction;
use crate::settings::SimulationSettings;
use crate::simulate::simulate_step_with;
use crate::tuning::PidGains;

/// Unit set-point step response of the closed loop
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosedLoopResponse {
    pub time: Vec<f64>,
    pub output: Vec<f64>,
    /// Peak overshoot over the final value, in percent (never negative)
    pub overshoot_percent: f64,
}

impl ClosedLoopResponse {
    pub fn final_value(&self) -> f64 {
        self.output.last().copied().unwrap_or(0.0)
    }

    pub fn peak(&self) -> f64 {
        self.output.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// `max(0, (peak - final) / final * 100)`, and 0 when the final value is 0
pub fn overshoot_percent(output: &[f64]) -> f64 {
    let Some(&final_value) = output.last() else {
        return 0.0;
    };
    if final_value == 0.0 {
        return 0.0;
    }
    let peak = output.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    ((peak - final_value) / final_value * 100.0).max(0.0)
}

/// Unity-feedback loop `series(PID, plant)` with the dead time rationalized at `pade_order`
pub fn closed_loop_transfer_function(
    params: &FopdtParameters,
    gains: &PidGains,
    pade_order: usize,
) -> Result<TransferFunction> {
    let controller = gains.transfer_function()?;
    let plant = params.transfer_function(pade_order)?;
    controller.series(&plant).unity_feedback()
}

/// Simulate the closed loop's unit-step response over `time_grid`
pub fn evaluate(
    params: &FopdtParameters,
    gains: &PidGains,
    pade_order: usize,
    time_grid: &[f64],
) -> Result<ClosedLoopResponse> {
    evaluate_with_settings(
        params,
        gains,
        pade_order,
        time_grid,
        &SimulationSettings::default(),
    )
}

/// [`evaluate`] with explicit simulation settings
pub fn evaluate_with_settings(
    params: &FopdtParameters,
    gains: &PidGains,
    pade_order: usize,
    time_grid: &[f64],
    settings: &SimulationSettings,
) -> Result<ClosedLoopResponse> {
    let system = closed_loop_transfer_function(params, gains, pade_order)?;
    let output = simulate_step_with(&system, time_grid, 1.0, settings)?;
    let overshoot = overshoot_percent(&output);

    debug!(
        "closed loop with {gains} on {params}: order {}, overshoot {overshoot:.2} %",
        system.order()
    );

    Ok(ClosedLoopResponse {
        time: time_grid.to_vec(),
        output,
        overshoot_percent: overshoot,
    })
}
