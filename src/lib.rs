//! fopdtsim - FOPDT process identification and PID tuning
//!
//! Identifies a First-Order-Plus-Dead-Time model
//!
//!   G(s) = K e^(-θs) / (τs + 1)
//!
//! from a recorded step test, then tunes PID controllers for it and evaluates them in
//! closed loop.
//!
//! # Architecture
//!
//! - [`lti`]: rational transfer functions, series/feedback composition, Padé delays
//! - [`simulate`]: step responses by state-space integration with the [`solvers`]
//! - [`identification`]: Smith, Sundaresan and reference estimators, model selection
//! - [`tuning`]: Ziegler-Nichols, CHR and manual PID gains
//! - [`closed_loop`]: unity-feedback loop simulation and overshoot
//! - [`analysis`]: the whole pipeline for one record, driven by [`config`]
//!
//! Every computation is a pure function over immutable values; nothing is shared between
//! calls, so independent records can be analyzed on separate threads.
//!
//! # Example
//!
//! ```rust
//! use fopdtsim::prelude::*;
//!
//! // Step of amplitude 5 applied at t = 0
//! let time: Vec<f64> = (0..6).map(|t| t as f64).collect();
//! let output = vec![0.0, 0.0, 1.0, 2.0, 2.5, 2.5];
//! let record = StepTestRecord::new(5.0, time, output).unwrap();
//!
//! let reference = identify_reference(&record).unwrap();
//! assert_eq!(reference.k, 0.5);
//!
//! let gains = ziegler_nichols_open_loop(&reference).unwrap();
//! assert!(gains.kp > 0.0);
//! ```

pub mod analysis;
pub mod closed_loop;
pub mod config;
pub mod dataset;
pub mod error;
pub mod identification;
pub mod lti;
pub mod settings;
pub mod signal;
pub mod simulate;
pub mod solvers;
pub mod tuning;
pub mod utils;

pub use error::{DatasetError, ErrorKind, FopdtError, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::analysis::{
        analyze, design_controller, Analysis, ControllerDesign, ControllerFailure,
    };
    pub use crate::closed_loop::{evaluate, overshoot_percent, ClosedLoopResponse};
    pub use crate::config::{AnalysisConfig, EvaluationGrid};
    pub use crate::error::{DatasetError, ErrorKind, FopdtError, Result};
    pub use crate::identification::{
        fit_error, identify, identify_best, identify_reference, select_best, smith, sundaresan,
        FopdtParameters, IdentificationResult, Method,
    };
    pub use crate::lti::{feedback, pade_delay, series, TransferFunction};
    pub use crate::settings::{SimulationSettings, SolverType};
    pub use crate::signal::{SampledSignal, StepTestRecord};
    pub use crate::simulate::{simulate_step, simulate_step_with};
    pub use crate::tuning::{
        chr_overshoot, manual, ziegler_nichols_open_loop, PidGains, TuningRule,
    };
}
