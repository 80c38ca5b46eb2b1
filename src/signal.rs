//! Sampled signals and step-test records
//!
//! A [`SampledSignal`] is a strictly increasing time axis with one value per sample.
//! A [`StepTestRecord`] adds the amplitude of the input step that produced the response.

use serde::Serialize;

use crate::error::{FopdtError, Result};
use crate::utils::constants::MIN_SAMPLES;

/// Check that `time` is a usable time axis: at least two finite, strictly increasing samples
pub fn validate_time_axis(time: &[f64]) -> Result<()> {
    if time.len() < MIN_SAMPLES {
        return Err(FopdtError::TooFewSamples {
            len: time.len(),
            min: MIN_SAMPLES,
        });
    }
    check_finite("time", time)?;
    for (index, pair) in time.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(FopdtError::NonMonotonicTime {
                index: index + 1,
                previous: pair[0],
                current: pair[1],
            });
        }
    }
    Ok(())
}

fn check_finite(field: &'static str, values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(FopdtError::NonFinite { field, index }),
        None => Ok(()),
    }
}

/// Evenly spaced times `start, start + step, ...` strictly below `stop`
pub fn uniform_grid(start: f64, stop: f64, step: f64) -> Result<Vec<f64>> {
    if !(step.is_finite() && step > 0.0) {
        return Err(FopdtError::InvalidSetting {
            name: "step",
            value: step,
        });
    }
    if !start.is_finite() {
        return Err(FopdtError::InvalidSetting {
            name: "start",
            value: start,
        });
    }
    if !stop.is_finite() {
        return Err(FopdtError::InvalidSetting {
            name: "stop",
            value: stop,
        });
    }

    let count = ((stop - start) / step).ceil().max(0.0) as usize;
    let grid: Vec<f64> = (0..count).map(|k| start + step * k as f64).collect();
    validate_time_axis(&grid)?;
    Ok(grid)
}

/// Linear interpolation of `(points, values)` at `x`, extrapolating past both ends
///
/// `points` must be strictly increasing with at least two entries.
pub fn interpolate(points: &[f64], values: &[f64], x: f64) -> f64 {
    let n = points.len();
    let idx = points.partition_point(|&p| p < x);

    let (i0, i1) = match idx {
        0 => (0, 1),
        i if i >= n => (n - 2, n - 1),
        i => (i - 1, i),
    };

    let (x0, x1) = (points[i0], points[i1]);
    let t = (x - x0) / (x1 - x0);
    values[i0] + t * (values[i1] - values[i0])
}

/// Root-mean-square difference between two equally long sequences
pub fn rmse(measured: &[f64], simulated: &[f64]) -> f64 {
    let n = measured.len().min(simulated.len());
    if n == 0 {
        return 0.0;
    }
    let sum: f64 = measured
        .iter()
        .zip(simulated)
        .map(|(m, s)| (m - s) * (m - s))
        .sum();
    (sum / n as f64).sqrt()
}

/// Time-ordered samples of a scalar signal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampledSignal {
    time: Vec<f64>,
    values: Vec<f64>,
}

impl SampledSignal {
    /// Create a signal, validating the time axis, lengths and finiteness
    pub fn new(time: Vec<f64>, values: Vec<f64>) -> Result<Self> {
        if time.len() != values.len() {
            return Err(FopdtError::LengthMismatch {
                time: time.len(),
                output: values.len(),
            });
        }
        validate_time_axis(&time)?;
        check_finite("output", &values)?;
        Ok(Self { time, values })
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Always false; a signal holds at least two samples
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn first_value(&self) -> f64 {
        self.values[0]
    }

    pub fn last_value(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    /// Largest sample value
    pub fn peak(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Value at `t` by linear interpolation, extrapolating at the boundaries
    pub fn value_at(&self, t: f64) -> f64 {
        interpolate(&self.time, &self.values, t)
    }

    /// Values at each of `times`
    pub fn resample(&self, times: &[f64]) -> Vec<f64> {
        times.iter().map(|&t| self.value_at(t)).collect()
    }

    /// Values shifted so the first sample is zero
    pub fn zero_shifted(&self) -> Vec<f64> {
        let baseline = self.first_value();
        self.values.iter().map(|v| v - baseline).collect()
    }
}

/// Measured response of a process to a step of known amplitude applied at the first sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepTestRecord {
    step_amplitude: f64,
    response: SampledSignal,
}

impl StepTestRecord {
    /// Create a record
    ///
    /// # Errors
    ///
    /// - `ZeroStepAmplitude` if `step_amplitude == 0`
    /// - `NonFinite` if the amplitude or any sample is not finite
    /// - `LengthMismatch`, `TooFewSamples`, `NonMonotonicTime` for malformed arrays
    pub fn new(step_amplitude: f64, time: Vec<f64>, output: Vec<f64>) -> Result<Self> {
        if !step_amplitude.is_finite() {
            return Err(FopdtError::NonFinite {
                field: "step_amplitude",
                index: 0,
            });
        }
        if step_amplitude == 0.0 {
            return Err(FopdtError::ZeroStepAmplitude);
        }
        let response = SampledSignal::new(time, output)?;
        Ok(Self {
            step_amplitude,
            response,
        })
    }

    pub fn step_amplitude(&self) -> f64 {
        self.step_amplitude
    }

    pub fn time(&self) -> &[f64] {
        self.response.time()
    }

    pub fn output(&self) -> &[f64] {
        self.response.values()
    }

    pub fn response(&self) -> &SampledSignal {
        &self.response
    }

    pub fn len(&self) -> usize {
        self.response.len()
    }

    pub fn is_empty(&self) -> bool {
        self.response.is_empty()
    }

    /// Final minus initial output
    pub fn output_change(&self) -> f64 {
        self.response.last_value() - self.response.first_value()
    }

    /// Span from first to last sample
    pub fn duration(&self) -> f64 {
        let time = self.time();
        time[time.len() - 1] - time[0]
    }

    /// Mean spacing between samples
    pub fn mean_spacing(&self) -> f64 {
        self.duration() / (self.len() - 1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_time_axis_validation() {
        assert!(validate_time_axis(&[0.0, 1.0, 2.5]).is_ok());
        assert_eq!(
            validate_time_axis(&[0.0]),
            Err(FopdtError::TooFewSamples { len: 1, min: 2 })
        );
        assert_eq!(
            validate_time_axis(&[0.0, 1.0, 1.0]),
            Err(FopdtError::NonMonotonicTime {
                index: 2,
                previous: 1.0,
                current: 1.0
            })
        );
        assert_eq!(
            validate_time_axis(&[0.0, f64::NAN]),
            Err(FopdtError::NonFinite {
                field: "time",
                index: 1
            })
        );
    }

    #[test]
    fn test_interpolate_and_extrapolate() {
        let points = [0.0, 1.0, 3.0];
        let values = [0.0, 2.0, 4.0];

        assert_relative_eq!(interpolate(&points, &values, 0.5), 1.0);
        assert_relative_eq!(interpolate(&points, &values, 2.0), 3.0);
        assert_relative_eq!(interpolate(&points, &values, 3.0), 4.0);
        // Beyond the ends the outer segments are extended
        assert_relative_eq!(interpolate(&points, &values, -1.0), -2.0);
        assert_relative_eq!(interpolate(&points, &values, 5.0), 6.0);
    }

    #[test]
    fn test_rmse() {
        assert_eq!(rmse(&[1.0, 2.0], &[1.0, 2.0]), 0.0);
        assert_relative_eq!(rmse(&[0.0, 0.0], &[3.0, 4.0]), (12.5_f64).sqrt());
    }

    #[test]
    fn test_uniform_grid() {
        let grid = uniform_grid(0.0, 1.0, 0.25).unwrap();
        assert_eq!(grid, vec![0.0, 0.25, 0.5, 0.75]);

        assert!(uniform_grid(0.0, 1.0, 0.0).is_err());
        assert!(matches!(
            uniform_grid(0.0, 0.5, 1.0),
            Err(FopdtError::TooFewSamples { len: 1, .. })
        ));
    }

    #[test]
    fn test_record_validation() {
        let record = StepTestRecord::new(2.0, vec![0.0, 1.0, 2.0], vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(record.output_change(), 2.0);
        assert_eq!(record.mean_spacing(), 1.0);
        assert_eq!(record.response().zero_shifted(), vec![0.0, 1.0, 2.0]);

        assert_eq!(
            StepTestRecord::new(0.0, vec![0.0, 1.0], vec![0.0, 1.0]),
            Err(FopdtError::ZeroStepAmplitude)
        );
        assert_eq!(
            StepTestRecord::new(1.0, vec![0.0, 1.0], vec![0.0]),
            Err(FopdtError::LengthMismatch { time: 2, output: 1 })
        );
        assert!(matches!(
            StepTestRecord::new(1.0, vec![0.0, 1.0], vec![0.0, f64::INFINITY]),
            Err(FopdtError::NonFinite { field: "output", index: 1 })
        ));
    }
}
