//! Threshold-crossing estimators
//!
//! References:
//! - Smith, C. L. (1972). Digital Computer Process Control. Intext.
//! - Sundaresan, K. R., & Krishnaswamy, P. R. (1978). "Estimation of time delay, time
//!   constant parameters in time, frequency, and Laplace domains". Canadian Journal of
//!   Chemical Engineering, 56(2), 257-262.

use log::debug;

use super::FopdtParameters;
use crate::error::{FopdtError, Result};
use crate::signal::StepTestRecord;
use crate::utils::constants::{REFERENCE_TAU_FRACTION, SMITH_FRACTIONS, SUNDARESAN_FRACTIONS};

/// `K = (output[-1] - output[0]) / step_amplitude`
pub fn static_gain(record: &StepTestRecord) -> f64 {
    record.output_change() / record.step_amplitude()
}

/// Index of the first sample whose zero-shifted output reaches `fraction` of the final change
///
/// "Reaches" follows the direction of the change: `>=` for a rising output, `<=` for a
/// falling one.
fn crossing_index(record: &StepTestRecord, fraction: f64) -> Result<usize> {
    let change = record.output_change();
    if change == 0.0 {
        return Err(FopdtError::ThresholdNotFound { fraction, change });
    }

    let baseline = record.response().first_value();
    let level = fraction * change;
    let reached = |y: &f64| {
        let shifted = y - baseline;
        if change > 0.0 {
            shifted >= level
        } else {
            shifted <= level
        }
    };

    record
        .output()
        .iter()
        .position(reached)
        .ok_or(FopdtError::ThresholdNotFound { fraction, change })
}

/// Time since the first sample at which `fraction` of the change is reached
fn crossing_time(record: &StepTestRecord, fraction: f64) -> Result<f64> {
    let index = crossing_index(record, fraction)?;
    let time = record.time();
    Ok(time[index] - time[0])
}

/// Crossing times `(t1, t2)` for a pair of fractions
pub fn crossing_times(record: &StepTestRecord, fractions: (f64, f64)) -> Result<(f64, f64)> {
    let t1 = crossing_time(record, fractions.0)?;
    let t2 = crossing_time(record, fractions.1)?;
    Ok((t1, t2))
}

/// Smith: `tau = 1.5 (t2 - t1)`, `theta = t2 - tau` with t1, t2 at 28.3 % and 63.2 %
///
/// Parameters are not clamped; a fast initial rise gives a negative dead time.
pub fn smith(record: &StepTestRecord) -> Result<FopdtParameters> {
    let k = static_gain(record);
    let (t1, t2) = crossing_times(record, SMITH_FRACTIONS)?;
    let tau = 1.5 * (t2 - t1);
    let theta = t2 - tau;

    debug!("Smith: t1 = {t1}, t2 = {t2} -> K = {k}, tau = {tau}, theta = {theta}");
    Ok(FopdtParameters::new(k, tau, theta))
}

/// Sundaresan: `tau = 2/3 (t2 - t1)`, `theta = 1.3 t1 - 0.29 t2` with t1, t2 at 35.3 % and 85.3 %
pub fn sundaresan(record: &StepTestRecord) -> Result<FopdtParameters> {
    let k = static_gain(record);
    let (t1, t2) = crossing_times(record, SUNDARESAN_FRACTIONS)?;
    let tau = (2.0 / 3.0) * (t2 - t1);
    let theta = 1.3 * t1 - 0.29 * t2;

    debug!("Sundaresan: t1 = {t1}, t2 = {t2} -> K = {k}, tau = {tau}, theta = {theta}");
    Ok(FopdtParameters::new(k, tau, theta))
}

/// Reference estimate read directly off the record
///
/// `theta` is the time of the last baseline sample before the output first departs from
/// `output[0]`; `tau` is the time at which 63.21 % of the change is reached, minus `theta`.
///
/// # Errors
///
/// - `NoDeparture` if the output never leaves its initial value
/// - `ThresholdNotFound` if the 63.21 % level is never reached
pub fn identify_reference(record: &StepTestRecord) -> Result<FopdtParameters> {
    let k = static_gain(record);
    let output = record.output();
    let time = record.time();
    let baseline = output[0];

    // output[0] is the baseline itself, so a departure is at index 1 or later
    let departure = output
        .iter()
        .position(|&y| y != baseline)
        .ok_or(FopdtError::NoDeparture { baseline })?;
    let theta = time[departure - 1] - time[0];

    let tau = crossing_time(record, REFERENCE_TAU_FRACTION)? - theta;

    debug!("Reference: departure at index {departure} -> K = {k}, tau = {tau}, theta = {theta}");
    Ok(FopdtParameters::new(k, tau, theta))
}
