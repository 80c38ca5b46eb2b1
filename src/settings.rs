//! Simulation settings types.

use serde::{Deserialize, Serialize};

use crate::error::{FopdtError, Result};
use crate::utils::constants::{
    SIM_INTERNAL_SAMPLES_MAX, SIM_OVERSAMPLING, SIM_STEPS_MAX, SIM_TIMESTEP, SIM_TIMESTEP_MIN,
    SOL_TOLERANCE_LTE_ABS, SOL_TOLERANCE_LTE_REL,
};

/// Available ODE solvers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SolverType {
    /// Classical RK4 (4th order, fixed step)
    RK4,
    /// Dormand-Prince 5(4), adaptive
    #[default]
    RKDP54,
}

impl SolverType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SolverType::RK4 => "RK4",
            SolverType::RKDP54 => "RKDP54",
        }
    }
}

/// Step-response simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// ODE solver type
    pub solver: SolverType,

    /// Fixed step for RK4, initial step for RKDP54
    pub dt: f64,

    /// Minimum time step before an adaptive integration gives up
    pub dt_min: f64,

    /// Absolute tolerance for adaptive stepping
    pub atol: f64,

    /// Relative tolerance for adaptive stepping
    pub rtol: f64,

    /// Internal grid points per finest sample interval
    pub oversampling: usize,

    /// Cap on internal grid points
    pub max_internal_samples: usize,

    /// Cap on accepted plus rejected steps
    pub max_steps: usize,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            solver: SolverType::RKDP54,
            dt: SIM_TIMESTEP,
            dt_min: SIM_TIMESTEP_MIN,
            atol: SOL_TOLERANCE_LTE_ABS,
            rtol: SOL_TOLERANCE_LTE_REL,
            oversampling: SIM_OVERSAMPLING,
            max_internal_samples: SIM_INTERNAL_SAMPLES_MAX,
            max_steps: SIM_STEPS_MAX,
        }
    }
}

impl SimulationSettings {
    /// Fixed-step RK4 with the given step
    pub fn fixed_step(dt: f64) -> Self {
        Self {
            solver: SolverType::RK4,
            dt,
            ..Self::default()
        }
    }

    /// Reject settings the integrator cannot work with
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("dt", self.dt),
            ("dt_min", self.dt_min),
            ("atol", self.atol),
            ("rtol", self.rtol),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(FopdtError::InvalidSetting { name, value });
            }
        }
        let counts = [
            ("oversampling", self.oversampling),
            ("max_internal_samples", self.max_internal_samples),
            ("max_steps", self.max_steps),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(FopdtError::InvalidSetting {
                    name,
                    value: value as f64,
                });
            }
        }
        if self.max_internal_samples < 2 {
            return Err(FopdtError::InvalidSetting {
                name: "max_internal_samples",
                value: self.max_internal_samples as f64,
            });
        }
        Ok(())
    }
}
