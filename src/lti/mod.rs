//! Linear time-invariant system algebra
//!
//! Rational transfer functions, their series and feedback composition, Padé rationalization
//! of dead time, and the state-space realization used by the simulator.

pub mod polynomial;

mod pade;
mod statespace;
mod transfer_function;

pub use pade::{pade_coefficients, pade_delay};
pub use statespace::StateSpace;
pub use transfer_function::{feedback, series, TransferFunction};
