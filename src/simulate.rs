//! Step-response simulation of rational transfer functions
//!
//! The transfer function is realized in state-space form and integrated from rest with a
//! constant input, starting at the first sample time. Integration runs over a uniform
//! internal grid at least as fine as the finest sample spacing; the output is then
//! resampled onto the requested (possibly non-uniform) sample times by linear
//! interpolation.

use log::debug;
use nalgebra::DVector;

use crate::error::{FopdtError, Result};
use crate::lti::{StateSpace, TransferFunction};
use crate::settings::{SimulationSettings, SolverType};
use crate::signal::{interpolate, validate_time_axis};
use crate::solvers::{ExplicitSolver, SolverError, SolverStepResult, RK4, RKDP54};

/// Response of `tf` to a step of height `step_scale` applied at `sample_times[0]`
///
/// Uses [`SimulationSettings::default`] (adaptive Dormand-Prince).
///
/// # Errors
///
/// - Data errors for a malformed time axis, a non-finite scale or an improper `tf`
/// - `Integration`, `Diverged` or `StepBudgetExceeded` if the integrator cannot converge
pub fn simulate_step(
    tf: &TransferFunction,
    sample_times: &[f64],
    step_scale: f64,
) -> Result<Vec<f64>> {
    simulate_step_with(tf, sample_times, step_scale, &SimulationSettings::default())
}

/// [`simulate_step`] with explicit solver settings
pub fn simulate_step_with(
    tf: &TransferFunction,
    sample_times: &[f64],
    step_scale: f64,
    settings: &SimulationSettings,
) -> Result<Vec<f64>> {
    settings.validate()?;
    validate_time_axis(sample_times)?;
    if !step_scale.is_finite() {
        return Err(FopdtError::NonFinite {
            field: "step_scale",
            index: 0,
        });
    }

    let ss = tf.to_state_space()?;

    // Static systems need no integration
    if ss.order() == 0 {
        let y = ss.output(&DVector::zeros(0), step_scale);
        return Ok(vec![y; sample_times.len()]);
    }

    let grid = internal_grid(sample_times, settings);
    let x0 = DVector::zeros(ss.order());

    let outputs = match settings.solver {
        SolverType::RK4 => integrate(RK4::new(x0), &ss, &grid, step_scale, settings)?,
        SolverType::RKDP54 => integrate(
            RKDP54::with_tolerances(x0, settings.atol, settings.rtol),
            &ss,
            &grid,
            step_scale,
            settings,
        )?,
    };

    Ok(sample_times
        .iter()
        .map(|&t| interpolate(&grid, &outputs, t))
        .collect())
}

/// Uniform grid from the first to the last sample time
///
/// Spacing is the finest sample spacing divided by the oversampling factor, bounded by
/// `max_internal_samples` points.
fn internal_grid(sample_times: &[f64], settings: &SimulationSettings) -> Vec<f64> {
    let t0 = sample_times[0];
    let span = sample_times[sample_times.len() - 1] - t0;
    let min_spacing = sample_times
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold(f64::INFINITY, f64::min);

    let wanted = (span / min_spacing * settings.oversampling as f64).ceil() as usize;
    let intervals = wanted.clamp(1, settings.max_internal_samples - 1);
    if intervals < wanted {
        debug!(
            "internal grid capped at {} points ({} requested)",
            intervals + 1,
            wanted + 1
        );
    }

    let mut grid: Vec<f64> = (0..=intervals)
        .map(|k| t0 + span * k as f64 / intervals as f64)
        .collect();
    // Land exactly on the final sample
    grid[intervals] = t0 + span;
    grid
}

/// Integrate `ss` from rest under constant input `u`, recording the output at every grid point
fn integrate<S: ExplicitSolver>(
    mut solver: S,
    ss: &StateSpace,
    grid: &[f64],
    u: f64,
    settings: &SimulationSettings,
) -> Result<Vec<f64>> {
    let mut outputs = Vec::with_capacity(grid.len());
    outputs.push(ss.output(solver.state(), u));

    let mut t = grid[0];
    let mut dt = settings.dt;
    let mut steps = 0usize;
    let mut rejected = 0usize;

    for &target in &grid[1..] {
        while t < target {
            if steps >= settings.max_steps {
                return Err(FopdtError::StepBudgetExceeded {
                    max_steps: settings.max_steps,
                    time: t,
                });
            }
            steps += 1;

            // Never step past the next grid point
            let remaining = target - t;
            let limited = dt >= remaining;
            let h = if limited { remaining } else { dt };

            solver.buffer(h);
            let mut result = SolverStepResult::default();
            for _ in 0..solver.stages() {
                result = solver
                    .step(|x, _| ss.derivative(x, u), h)
                    .map_err(|source| FopdtError::Integration { time: t, source })?;
            }

            if solver.is_adaptive() {
                let scale = result.scale.unwrap_or(1.0);
                if !result.success {
                    rejected += 1;
                    solver
                        .revert()
                        .map_err(|source| FopdtError::Integration { time: t, source })?;
                    dt = h * scale;
                    if dt < settings.dt_min {
                        return Err(FopdtError::Integration {
                            time: t,
                            source: SolverError::TimestepTooSmall {
                                dt,
                                dt_min: settings.dt_min,
                            },
                        });
                    }
                    continue;
                }
                // A step shortened to hit the grid says nothing against the previous size
                dt = if limited { dt.max(h * scale) } else { h * scale };
            }

            t = if limited { target } else { t + h };

            if solver.state().iter().any(|x| !x.is_finite()) {
                return Err(FopdtError::Diverged { time: t });
            }
        }
        outputs.push(ss.output(solver.state(), u));
    }

    debug!(
        "integrated order-{} system over {} grid points: {} steps, {} rejected",
        ss.order(),
        grid.len(),
        steps,
        rejected
    );
    Ok(outputs)
}
