//! Analysis configuration
//!
//! Loaded from JSON; every field is optional and falls back to its default.
//!
//! ```json
//! {
//!   "identification_pade_order": 2,
//!   "evaluation": { "horizon": 600.0, "step": 0.5 },
//!   "simulation": { "solver": "RKDP54", "rtol": 1e-6 }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DatasetError, FopdtError, Result};
use crate::settings::SimulationSettings;
use crate::signal::{uniform_grid, StepTestRecord};
use crate::utils::constants::{
    CHR_OVERSHOOT_FACTOR, PADE_ORDER_HIGH_FIDELITY, PADE_ORDER_IDENTIFICATION,
};

/// Time grid for closed-loop evaluation
///
/// Unset fields follow the record: the horizon defaults to its duration, the step to its
/// mean sample spacing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationGrid {
    pub horizon: Option<f64>,
    pub step: Option<f64>,
}

impl EvaluationGrid {
    pub fn new(horizon: f64, step: f64) -> Self {
        Self {
            horizon: Some(horizon),
            step: Some(step),
        }
    }

    /// `0, step, 2 step, ...` strictly below the horizon
    pub fn times(&self, record: &StepTestRecord) -> Result<Vec<f64>> {
        let horizon = self.horizon.unwrap_or_else(|| record.duration());
        let step = self.step.unwrap_or_else(|| record.mean_spacing());
        if !(horizon.is_finite() && horizon > 0.0) {
            return Err(FopdtError::InvalidSetting {
                name: "horizon",
                value: horizon,
            });
        }
        uniform_grid(0.0, horizon, step)
    }
}

/// Settings of the full identification and tuning pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Padé order while scoring the competing estimators
    pub identification_pade_order: usize,
    /// Padé order of the reference model
    pub reference_pade_order: usize,
    /// Padé order of the plant in closed-loop evaluation
    pub evaluation_pade_order: usize,
    /// CHR proportional gain multiplier
    pub chr_overshoot_factor: f64,
    pub evaluation: EvaluationGrid,
    pub simulation: SimulationSettings,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            identification_pade_order: PADE_ORDER_IDENTIFICATION,
            reference_pade_order: PADE_ORDER_HIGH_FIDELITY,
            evaluation_pade_order: PADE_ORDER_HIGH_FIDELITY,
            chr_overshoot_factor: CHR_OVERSHOOT_FACTOR,
            evaluation: EvaluationGrid::default(),
            simulation: SimulationSettings::default(),
        }
    }
}

impl AnalysisConfig {
    /// Parse a JSON document
    pub fn from_json(json: &str) -> std::result::Result<Self, DatasetError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> std::result::Result<Self, DatasetError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn to_json(&self) -> std::result::Result<String, DatasetError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.chr_overshoot_factor.is_finite() {
            return Err(FopdtError::InvalidSetting {
                name: "chr_overshoot_factor",
                value: self.chr_overshoot_factor,
            });
        }
        for (name, value) in [
            ("evaluation.horizon", self.evaluation.horizon),
            ("evaluation.step", self.evaluation.step),
        ] {
            if let Some(value) = value {
                if !(value.is_finite() && value > 0.0) {
                    return Err(FopdtError::InvalidSetting { name, value });
                }
            }
        }
        self.simulation.validate()
    }
}
