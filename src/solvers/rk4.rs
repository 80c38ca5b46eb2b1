//! Classic 4th-order Runge-Kutta solver (RK4)

use nalgebra::DVector;
use std::collections::VecDeque;

use super::{ExplicitSolver, Solver, SolverError, SolverStepResult};

/// Classic 4th-order Runge-Kutta solver
///
/// Four-stage, 4th order, fixed timestep. Used by the simulator when a reproducible
/// step size is wanted; the timestep must resolve the fastest pole of the realized
/// system (high-order Padé delays have fast poles).
///
/// # References
/// - Kutta, W. (1901). "Beitrag zur näherungsweisen Integration totaler
///   Differentialgleichungen". Zeitschrift für Mathematik und Physik, 46, 435-453.
#[derive(Debug, Clone)]
pub struct RK4 {
    state: DVector<f64>,
    initial: DVector<f64>,
    history: VecDeque<DVector<f64>>,
    slopes: Vec<DVector<f64>>,
    stage: usize,
}

impl RK4 {
    /// Create a new RK4 solver with the given initial state
    pub fn new(initial: DVector<f64>) -> Self {
        let n = initial.len();
        Self {
            state: initial.clone(),
            initial,
            history: VecDeque::with_capacity(2),
            slopes: vec![DVector::zeros(n); 4],
            stage: 0,
        }
    }
}

impl Solver for RK4 {
    fn state(&self) -> &DVector<f64> {
        &self.state
    }

    fn set_state(&mut self, state: DVector<f64>) {
        self.state = state;
    }

    fn buffer(&mut self, _dt: f64) {
        if self.history.len() >= 2 {
            self.history.pop_back();
        }
        self.history.push_front(self.state.clone());
        self.stage = 0;
    }

    fn revert(&mut self) -> Result<(), SolverError> {
        self.state = self.history.pop_front().ok_or(SolverError::EmptyHistory)?;
        self.stage = 0;
        Ok(())
    }

    fn reset(&mut self) {
        self.state = self.initial.clone();
        self.history.clear();
        self.stage = 0;
    }

    fn order(&self) -> usize {
        4
    }

    fn stages(&self) -> usize {
        4
    }

    fn is_adaptive(&self) -> bool {
        false
    }
}

impl ExplicitSolver for RK4 {
    fn step<F>(&mut self, mut f: F, dt: f64) -> Result<SolverStepResult, SolverError>
    where
        F: FnMut(&DVector<f64>, f64) -> DVector<f64>,
    {
        let x0 = self.history.front().ok_or(SolverError::EmptyHistory)?;

        // c = [0, 1/2, 1/2, 1], b = [1/6, 1/3, 1/3, 1/6]
        let c = [0.0, 0.5, 0.5, 1.0];
        let b = [1.0 / 6.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 6.0];

        if self.stage >= 4 {
            return Err(SolverError::InvalidStage {
                stage: self.stage,
                max_stages: 4,
            });
        }

        self.slopes[self.stage] = f(&self.state, c[self.stage] * dt);

        if self.stage < 3 {
            self.state = match self.stage {
                0 => x0 + dt * 0.5 * &self.slopes[0],
                1 => x0 + dt * 0.5 * &self.slopes[1],
                _ => x0 + dt * &self.slopes[2],
            };
            self.stage += 1;
        } else {
            self.state = x0
                + dt * (b[0] * &self.slopes[0]
                    + b[1] * &self.slopes[1]
                    + b[2] * &self.slopes[2]
                    + b[3] * &self.slopes[3]);
            self.stage = 0;
        }

        Ok(SolverStepResult::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rk4_exponential_decay() {
        // dx/dt = -x, x(0) = 1
        let mut solver = RK4::new(DVector::from_vec(vec![1.0]));

        let dt = 0.1;
        for _ in 0..10 {
            solver.buffer(dt);
            for _ in 0..4 {
                let result = solver.step(|x, _t| -x, dt).unwrap();
                assert!(result.success);
            }
        }

        assert_relative_eq!(solver.state()[0], (-1.0_f64).exp(), epsilon = 1e-6);
    }

    #[test]
    fn test_rk4_forced_first_order() {
        // dx/dt = -x + 1, x(0) = 0 => x(t) = 1 - exp(-t)
        let mut solver = RK4::new(DVector::zeros(1));

        let dt = 0.05;
        for _ in 0..40 {
            solver.buffer(dt);
            for _ in 0..4 {
                solver
                    .step(|x, _t| x.map(|v| 1.0 - v), dt)
                    .unwrap();
            }
        }

        assert_relative_eq!(solver.state()[0], 1.0 - (-2.0_f64).exp(), epsilon = 1e-7);
    }

    #[test]
    fn test_rk4_step_without_buffer() {
        let mut solver = RK4::new(DVector::zeros(1));
        assert_eq!(
            solver.step(|x, _t| -x, 0.1).unwrap_err(),
            SolverError::EmptyHistory
        );
    }

    #[test]
    fn test_rk4_revert_and_reset() {
        let mut solver = RK4::new(DVector::from_vec(vec![1.0]));
        solver.buffer(0.1);
        for _ in 0..4 {
            solver.step(|x, _t| -x, 0.1).unwrap();
        }
        assert!(solver.state()[0] < 1.0);

        solver.revert().unwrap();
        assert_eq!(solver.state()[0], 1.0);
        assert_eq!(solver.revert(), Err(SolverError::EmptyHistory));

        solver.set_state(DVector::from_vec(vec![3.0]));
        solver.reset();
        assert_eq!(solver.state()[0], 1.0);
    }
}
