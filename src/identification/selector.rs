//! Model selection by fit error

use log::{info, warn};

use super::{identify_with_settings, IdentificationResult, Method};
use crate::error::{FopdtError, Result};
use crate::settings::SimulationSettings;
use crate::signal::StepTestRecord;

/// Pick the candidate with the smallest fit error
///
/// Ties go to the preferred method ([`Method::preference`]: Sundaresan before Smith).
/// Failed candidates are skipped.
///
/// # Errors
///
/// `NoValidModel` carrying every failure if no candidate succeeded.
pub fn select_best<I>(candidates: I) -> Result<IdentificationResult>
where
    I: IntoIterator<Item = Result<IdentificationResult>>,
{
    let mut best: Option<IdentificationResult> = None;
    let mut failures = Vec::new();

    for candidate in candidates {
        match candidate {
            Ok(result) => {
                let better = match &best {
                    None => true,
                    Some(current) => {
                        result.error < current.error
                            || (result.error == current.error
                                && result.method.preference() < current.method.preference())
                    }
                };
                if better {
                    best = Some(result);
                }
            }
            Err(err) => {
                warn!("skipping failed estimator: {err}");
                failures.push(err);
            }
        }
    }

    match best {
        Some(result) => {
            info!("selected {result}");
            Ok(result)
        }
        None => Err(FopdtError::NoValidModel { failures }),
    }
}

/// Run every competing estimator on `record` and keep the best fit
pub fn identify_best(record: &StepTestRecord, pade_order: usize) -> Result<IdentificationResult> {
    identify_best_with_settings(record, pade_order, &SimulationSettings::default())
}

/// [`identify_best`] with explicit simulation settings
pub fn identify_best_with_settings(
    record: &StepTestRecord,
    pade_order: usize,
    settings: &SimulationSettings,
) -> Result<IdentificationResult> {
    select_best(
        Method::ESTIMATORS
            .iter()
            .map(|&method| identify_with_settings(record, method, pade_order, settings)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identification::FopdtParameters;

    fn candidate(method: Method, error: f64) -> Result<IdentificationResult> {
        Ok(IdentificationResult {
            method,
            params: FopdtParameters::new(1.0, 1.0, 1.0),
            error,
        })
    }

    #[test]
    fn test_lower_error_wins() {
        let best = select_best(vec![
            candidate(Method::Sundaresan, 0.3),
            candidate(Method::Smith, 0.1),
        ])
        .unwrap();
        assert_eq!(best.method, Method::Smith);
    }

    #[test]
    fn test_tie_prefers_sundaresan() {
        for order in [
            vec![candidate(Method::Smith, 0.2), candidate(Method::Sundaresan, 0.2)],
            vec![candidate(Method::Sundaresan, 0.2), candidate(Method::Smith, 0.2)],
        ] {
            assert_eq!(select_best(order).unwrap().method, Method::Sundaresan);
        }
    }

    #[test]
    fn test_failures_are_skipped() {
        let best = select_best(vec![
            Err(FopdtError::NegativeDeadTime { theta: -1.0 }),
            candidate(Method::Sundaresan, 5.0),
        ])
        .unwrap();
        assert_eq!(best.method, Method::Sundaresan);
    }

    #[test]
    fn test_all_failed() {
        let err = select_best(vec![
            Err(FopdtError::ThresholdNotFound {
                fraction: 0.353,
                change: 0.0,
            }),
            Err(FopdtError::ThresholdNotFound {
                fraction: 0.283,
                change: 0.0,
            }),
        ])
        .unwrap_err();
        match err {
            FopdtError::NoValidModel { failures } => assert_eq!(failures.len(), 2),
            other => panic!("unexpected {other:?}"),
        }

        assert_eq!(
            select_best(Vec::new()).unwrap_err(),
            FopdtError::NoValidModel { failures: vec![] }
        );
    }

    #[test]
    fn test_identify_best_with_negative_dead_time() {
        // Smith yields theta = -1 on this record; Sundaresan stays valid
        let time: Vec<f64> = (0..=10).map(|t| t as f64).collect();
        let output = vec![0.0, 1.0, 1.1, 1.2, 1.5, 2.0, 2.5, 2.8, 3.0, 3.0, 3.0];
        let record = StepTestRecord::new(1.0, time, output).unwrap();

        let best = identify_best(&record, 2).unwrap();
        assert_eq!(best.method, Method::Sundaresan);
        assert!(best.params.theta > 0.0);
    }
}
