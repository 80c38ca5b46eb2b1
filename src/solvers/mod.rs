//! Numerical integration solvers
//!
//! Explicit Runge-Kutta integrators used by the step-response simulator:
//! - RK4: classic fixed-step 4th order method
//! - RKDP54: Dormand-Prince 5(4) embedded pair with adaptive timestep control

mod base;
mod rk4;
mod rkdp54;

pub use base::*;
pub use rk4::RK4;
pub use rkdp54::RKDP54;
