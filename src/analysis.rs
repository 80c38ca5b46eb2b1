//! End-to-end pipeline: identify, select, tune, evaluate

use log::{info, warn};
use serde::Serialize;

use crate::closed_loop::{evaluate_with_settings, ClosedLoopResponse};
use crate::config::AnalysisConfig;
use crate::error::{FopdtError, Result};
use crate::identification::{
    identify_with_settings, select_best, FopdtParameters, IdentificationResult, Method,
};
use crate::settings::SimulationSettings;
use crate::signal::StepTestRecord;
use crate::simulate::simulate_step_with;
use crate::tuning::{PidGains, TuningRule};

/// A tuned controller and its closed-loop step response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerDesign {
    pub rule: TuningRule,
    pub gains: PidGains,
    pub response: ClosedLoopResponse,
}

/// A tuning rule that could not be applied to the selected model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerFailure {
    pub rule: TuningRule,
    pub error: FopdtError,
}

/// Zero-shifted measurement next to the simulated model responses, on the record's time axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelResponses {
    pub time: Vec<f64>,
    pub measured: Vec<f64>,
    pub selected: Vec<f64>,
    pub reference: Vec<f64>,
}

/// Everything computed for one step-test record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    /// Competing estimators that produced a fit, in preference order
    pub candidates: Vec<IdentificationResult>,
    /// Competing estimators that failed
    pub failures: Vec<FopdtError>,
    /// Best candidate by fit error
    pub selected: IdentificationResult,
    /// Reference estimate scored at the reference Padé order
    pub reference: IdentificationResult,
    pub responses: ModelResponses,
    /// Ziegler-Nichols and CHR designs for the selected model
    pub controllers: Vec<ControllerDesign>,
    /// Automatic rules the selected model is degenerate for
    pub controller_failures: Vec<ControllerFailure>,
}

impl Analysis {
    /// Design for the given rule, if it was part of the analysis
    pub fn controller(&self, name: &str) -> Option<&ControllerDesign> {
        self.controllers.iter().find(|c| c.rule.name() == name)
    }
}

/// Tune a controller for `params` and simulate its closed loop over `time_grid`
pub fn design_controller(
    params: &FopdtParameters,
    rule: &TuningRule,
    time_grid: &[f64],
    pade_order: usize,
    settings: &SimulationSettings,
) -> Result<ControllerDesign> {
    let gains = rule.gains(params)?;
    let response = evaluate_with_settings(params, &gains, pade_order, time_grid, settings)?;
    info!(
        "{rule}: {gains}, overshoot {:.2} %",
        response.overshoot_percent
    );
    Ok(ControllerDesign {
        rule: *rule,
        gains,
        response,
    })
}

/// Run the full pipeline on `record`
///
/// 1. Score both competing estimators at the identification Padé order and keep the best
/// 2. Score the reference estimator at the reference Padé order
/// 3. Tune Ziegler-Nichols and CHR controllers for the selected model and evaluate them
///
/// # Errors
///
/// `NoValidModel` if both competing estimators fail; a failing reference fit is returned
/// as-is. A rule that cannot be applied to the selected model (zero dead time, zero time
/// constant) is recorded in `controller_failures` and the other designs are kept.
pub fn analyze(record: &StepTestRecord, config: &AnalysisConfig) -> Result<Analysis> {
    config.validate()?;
    let settings = &config.simulation;

    let results: Vec<Result<IdentificationResult>> = Method::ESTIMATORS
        .iter()
        .map(|&method| {
            identify_with_settings(record, method, config.identification_pade_order, settings)
        })
        .collect();
    let selected = select_best(results.iter().cloned())?;

    let mut candidates = Vec::new();
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(candidate) => candidates.push(candidate),
            Err(err) => failures.push(err),
        }
    }

    let reference =
        identify_with_settings(record, Method::Reference, config.reference_pade_order, settings)?;
    info!("reference: {reference}");
    if reference.error < selected.error {
        warn!(
            "reference fit (RMSE {:.6}) beats the selected {} fit (RMSE {:.6})",
            reference.error, selected.method, selected.error
        );
    }

    let responses = ModelResponses {
        time: record.time().to_vec(),
        measured: record.response().zero_shifted(),
        selected: simulate_step_with(
            &selected
                .params
                .transfer_function(config.identification_pade_order)?,
            record.time(),
            record.step_amplitude(),
            settings,
        )?,
        reference: simulate_step_with(
            &reference
                .params
                .transfer_function(config.reference_pade_order)?,
            record.time(),
            record.step_amplitude(),
            settings,
        )?,
    };

    let time_grid = config.evaluation.times(record)?;
    let rules = [
        TuningRule::ZieglerNichols,
        TuningRule::Chr {
            overshoot_factor: config.chr_overshoot_factor,
        },
    ];
    let mut controllers = Vec::new();
    let mut controller_failures = Vec::new();
    for rule in rules {
        match design_controller(
            &selected.params,
            &rule,
            &time_grid,
            config.evaluation_pade_order,
            settings,
        ) {
            Ok(design) => controllers.push(design),
            Err(error) => {
                warn!("{rule} not applicable to {}: {error}", selected.params);
                controller_failures.push(ControllerFailure { rule, error });
            }
        }
    }

    Ok(Analysis {
        candidates,
        failures,
        selected,
        reference,
        responses,
        controllers,
        controller_failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EvaluationGrid;
    use crate::signal::uniform_grid;

    fn record() -> StepTestRecord {
        let params = FopdtParameters::new(2.0, 10.0, 3.0);
        let time = uniform_grid(0.0, 100.0, 0.5).unwrap();
        let output = params.ideal_response(&time, 1.5);
        StepTestRecord::new(1.5, time, output).unwrap()
    }

    #[test]
    fn test_analyze() {
        let config = AnalysisConfig {
            evaluation: EvaluationGrid::new(150.0, 0.5),
            ..Default::default()
        };
        let analysis = analyze(&record(), &config).unwrap();

        assert_eq!(analysis.candidates.len(), 2);
        assert!(analysis.failures.is_empty());
        assert!(analysis.controller_failures.is_empty());
        assert_eq!(analysis.reference.method, Method::Reference);
        assert_eq!(analysis.responses.measured.len(), analysis.responses.time.len());

        let zn = analysis.controller("Ziegler-Nichols").unwrap();
        let chr = analysis.controller("CHR").unwrap();
        assert_eq!(zn.response.time.len(), 300);
        assert!(zn.response.overshoot_percent >= 0.0);
        assert!(chr.response.overshoot_percent >= 0.0);
        // Integral action removes the steady-state error
        assert!((zn.response.final_value() - 1.0).abs() < 0.05);
    }

    #[test]
    fn test_manual_design() {
        let params = FopdtParameters::new(2.0, 10.0, 3.0);
        let grid = uniform_grid(0.0, 200.0, 1.0).unwrap();
        let design = design_controller(
            &params,
            &TuningRule::Manual {
                kp: 0.5,
                ti: 10.0,
                td: 0.0,
            },
            &grid,
            6,
            &SimulationSettings::default(),
        )
        .unwrap();
        assert_eq!(design.gains.kp, 0.5);
        assert!((design.response.final_value() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_dead_time_keeps_identification() {
        // Smith reads t1 = 1, t2 = 3: tau = 3, theta = 0, which neither automatic rule accepts
        let output = [0.0, 0.30, 0.45, 0.64, 0.75, 0.84, 0.9, 0.94, 0.96, 0.98]
            .into_iter()
            .chain(std::iter::repeat(1.0))
            .take(21)
            .collect();
        let time = uniform_grid(0.0, 21.0, 1.0).unwrap();
        let record = StepTestRecord::new(1.0, time, output).unwrap();

        let analysis = analyze(&record, &AnalysisConfig::default()).unwrap();
        assert_eq!(analysis.selected.method, Method::Smith);
        assert_eq!(analysis.selected.params.theta, 0.0);
        assert!(analysis.controllers.is_empty());
        assert_eq!(analysis.controller_failures.len(), 2);
        for failure in &analysis.controller_failures {
            assert_eq!(
                failure.error,
                FopdtError::DegenerateParameter {
                    parameter: "theta",
                    value: 0.0
                }
            );
        }
    }

    #[test]
    fn test_zero_time_constant_keeps_other_rule() {
        // Instant jump: tau = 0, so CHR has Ti = 0 while Ziegler-Nichols still applies
        let time = uniform_grid(0.0, 6.0, 1.0).unwrap();
        let record =
            StepTestRecord::new(1.0, time, vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]).unwrap();

        let analysis = analyze(&record, &AnalysisConfig::default()).unwrap();
        assert_eq!(analysis.selected.params.tau, 0.0);
        assert!(analysis.controller("Ziegler-Nichols").is_some());
        assert_eq!(analysis.controller_failures.len(), 1);
        let failure = &analysis.controller_failures[0];
        assert_eq!(failure.rule.name(), "CHR");
        assert_eq!(
            failure.error,
            FopdtError::DegenerateParameter {
                parameter: "ti",
                value: 0.0
            }
        );

        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["controller_failures"][0]["error"]["kind"], "degenerate_system");
    }

    #[test]
    fn test_flat_record_has_no_model() {
        let record =
            StepTestRecord::new(1.0, vec![0.0, 1.0, 2.0], vec![1.0, 1.0, 1.0]).unwrap();
        match analyze(&record, &AnalysisConfig::default()) {
            Err(FopdtError::NoValidModel { failures }) => assert_eq!(failures.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }
}
