//! Identification, tuning and simulation constants

/// Fraction of the final output change marking the reference time-constant point
pub const REFERENCE_TAU_FRACTION: f64 = 0.6321;

/// Smith method crossing fractions (t1, t2)
pub const SMITH_FRACTIONS: (f64, f64) = (0.283, 0.632);

/// Sundaresan method crossing fractions (t1, t2)
pub const SUNDARESAN_FRACTIONS: (f64, f64) = (0.353, 0.853);

/// Default Padé order while searching for the best-fitting model
pub const PADE_ORDER_IDENTIFICATION: usize = 2;

/// Default Padé order for the reference model and controller evaluation
pub const PADE_ORDER_HIGH_FIDELITY: usize = 6;

/// Default CHR overshoot factor applied to the proportional gain
pub const CHR_OVERSHOOT_FACTOR: f64 = 1.2;

/// Minimum number of samples in a signal
pub const MIN_SAMPLES: usize = 2;

/// Default simulation timestep (initial step for adaptive solvers)
pub const SIM_TIMESTEP: f64 = 0.01;

/// Minimum timestep for adaptive solvers
pub const SIM_TIMESTEP_MIN: f64 = 1e-12;

/// Default absolute tolerance for local truncation error
pub const SOL_TOLERANCE_LTE_ABS: f64 = 1e-9;

/// Default relative tolerance for local truncation error
pub const SOL_TOLERANCE_LTE_REL: f64 = 1e-6;

/// Default refinement of the internal simulation grid over the finest sample spacing
pub const SIM_OVERSAMPLING: usize = 2;

/// Upper bound on internal grid points per simulation
pub const SIM_INTERNAL_SAMPLES_MAX: usize = 1_000_000;

/// Upper bound on accepted plus rejected solver steps per simulation
pub const SIM_STEPS_MAX: usize = 10_000_000;
