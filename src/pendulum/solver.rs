//! Adaptive-step ODE integration sampled on a fixed time grid
//!
//! Stepping and error control are done by [`rkf78`]'s embedded
//! Runge–Kutta–Fehlberg 7(8) pair. The solver is restarted at every grid
//! point and integrates exactly up to the next one, so every sample is a
//! solver endpoint and no interpolation is involved.

use std::cell::Cell;

use log::debug;
use nalgebra::SVector;
use rkf78::{OdeSystem, Rkf78, Tolerances};

use crate::configuration::config::SolverConfig;
use crate::error::{Result, SimError};

/// Tolerances and step limits
#[derive(Debug, Clone, PartialEq)]
pub struct SolverParameters {
    pub atol: f64, // absolute error tolerance
    pub rtol: f64, // relative error tolerance
    pub h0: f64, // first trial step of every interval
    pub max_steps: usize, // step budget between two grid points
}

impl Default for SolverParameters {
    fn default() -> Self {
        SolverConfig::default().into()
    }
}

impl From<SolverConfig> for SolverParameters {
    fn from(cfg: SolverConfig) -> Self {
        Self {
            atol: cfg.atol,
            rtol: cfg.rtol,
            h0: cfg.h0,
            max_steps: cfg.max_steps,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStats {
    pub accepted_steps: usize,
    pub rejected_steps: usize,
    pub fn_evals: usize,
}

/// `n` evenly spaced samples from `start` to `end` inclusive
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Adapts a closure over nalgebra vectors to the array-based [`OdeSystem`].
/// Remembers the first time a non-finite derivative was produced.
struct VectorField<F, const D: usize> {
    f: F,
    non_finite_at: Cell<Option<f64>>,
}

impl<F, const D: usize> OdeSystem<D> for VectorField<F, D>
where
    F: Fn(f64, &SVector<f64, D>) -> SVector<f64, D>,
{
    fn rhs(&self, t: f64, y: &[f64; D], dydt: &mut [f64; D]) {
        let dy = (self.f)(t, &SVector::from(*y));
        if self.non_finite_at.get().is_none() && dy.iter().any(|v| !v.is_finite()) {
            self.non_finite_at.set(Some(t));
        }
        dydt.copy_from_slice(dy.as_slice());
    }
}

pub struct GridSolver {
    pub params: SolverParameters,
    pub stats: SolverStats,
}

impl GridSolver {
    pub fn new(params: SolverParameters) -> Self {
        Self {
            params,
            stats: SolverStats::default(),
        }
    }

    /// Integrate `dy/dt = f(t, y)` from `y0` at `grid[0]` and return the state
    /// at every grid point (the first entry is `y0`)
    pub fn solve<const D: usize, F>(&mut self, f: F, y0: SVector<f64, D>, grid: &[f64]) -> Result<Vec<SVector<f64, D>>>
    where
        F: Fn(f64, &SVector<f64, D>) -> SVector<f64, D>,
    {
        let (&t0, rest) = grid.split_first().ok_or(SimError::EmptyGrid)?;
        for (index, pair) in grid.windows(2).enumerate() {
            if !(pair[1] > pair[0]) {
                return Err(SimError::UnorderedGrid { index: index + 1 });
            }
        }

        let field = VectorField { f, non_finite_at: Cell::new(None) };

        let mut out = Vec::with_capacity(grid.len());
        out.push(y0);

        let mut t = t0;
        let mut y: [f64; D] = y0.into();

        for &t_next in rest {
            // check the interval start before handing it to the stepper
            let mut dydt = [0.0; D];
            field.rhs(t, &y, &mut dydt);
            self.stats.fn_evals += 1;
            if let Some(t_bad) = field.non_finite_at.get() {
                return Err(SimError::NonFinite { t: t_bad });
            }

            let mut stepper = Rkf78::new(Tolerances::new(self.params.atol, self.params.rtol));
            let h0 = self.params.h0.abs().min(t_next - t);
            let result = stepper.integrate(&field, t, &y, t_next, h0);

            let accepted = stepper.stats.accepted_steps as usize;
            let rejected = stepper.stats.rejected_steps as usize;
            self.stats.accepted_steps += accepted;
            self.stats.rejected_steps += rejected;
            self.stats.fn_evals += stepper.stats.fn_evals as usize;

            if let Some(t_bad) = field.non_finite_at.get() {
                return Err(SimError::NonFinite { t: t_bad });
            }
            let (_, y_next) = result.map_err(|e| SimError::Integration { t, reason: format!("{e:?}") })?;

            let steps = accepted + rejected;
            if steps > self.params.max_steps {
                return Err(SimError::StepLimit { t: t_next, steps });
            }

            t = t_next;
            y = y_next;
            out.push(SVector::from(y));
        }

        debug!(
            "solver finished: {} accepted, {} rejected, {} evaluations",
            self.stats.accepted_steps, self.stats.rejected_steps, self.stats.fn_evals
        );
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;
    use std::f64::consts::PI;

    #[test]
    fn linspace_includes_both_ends() {
        let g = linspace(0.0, 50.0, 1000);
        assert_eq!(g.len(), 1000);
        assert_eq!(g[0], 0.0);
        assert_eq!(g[999], 50.0);
        assert!((g[1] - 50.0 / 999.0).abs() < 1e-12);
        assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn harmonic_oscillator_returns_after_one_period() {
        let grid = linspace(0.0, 2.0 * PI, 50);
        let mut solver = GridSolver::new(SolverParameters::default());
        let ys = solver
            .solve(|_t, y: &Vector2<f64>| Vector2::new(y[1], -y[0]), Vector2::new(1.0, 0.0), &grid)
            .unwrap();

        assert_eq!(ys.len(), grid.len());
        for (t, y) in grid.iter().zip(&ys) {
            assert!((y[0] - t.cos()).abs() < 1e-6, "x({t}) = {}", y[0]);
            assert!((y[1] + t.sin()).abs() < 1e-6, "v({t}) = {}", y[1]);
        }
        assert!(solver.stats.accepted_steps > 0);
    }

    #[test]
    fn exponential_growth_matches_closed_form() {
        let grid = linspace(0.0, 2.0, 11);
        let mut solver = GridSolver::new(SolverParameters::default());
        let ys = solver
            .solve(|_t, y: &SVector<f64, 1>| *y, SVector::<f64, 1>::new(1.0), &grid)
            .unwrap();
        let last = ys[10][0];
        assert!((last - 2f64.exp()).abs() < 1e-6 * 2f64.exp());
    }

    #[test]
    fn grid_point_just_past_a_step_multiple_is_reached() {
        // 1.8 is six steps of 0.3; the grid ends one ulp beyond it
        let end = f64::from_bits(1.8f64.to_bits() + 1);
        let params = SolverParameters { h0: 0.3, ..SolverParameters::default() };
        let mut solver = GridSolver::new(params);

        let ys = solver
            .solve(|_t, _y: &Vector2<f64>| Vector2::zeros(), Vector2::new(1.0, -2.0), &[0.0, end])
            .unwrap();

        assert_eq!(ys.len(), 2);
        assert_eq!(ys[1], Vector2::new(1.0, -2.0));
    }

    #[test]
    fn empty_grid_is_an_error() {
        let mut solver = GridSolver::new(SolverParameters::default());
        let r = solver.solve(|_t, y: &Vector2<f64>| *y, Vector2::zeros(), &[]);
        assert!(matches!(r, Err(SimError::EmptyGrid)));
    }

    #[test]
    fn grid_must_increase() {
        let mut solver = GridSolver::new(SolverParameters::default());
        let r = solver.solve(|_t, y: &Vector2<f64>| *y, Vector2::zeros(), &[0.0, 1.0, 1.0]);
        assert!(matches!(r, Err(SimError::UnorderedGrid { index: 2 })));
    }

    #[test]
    fn non_finite_derivative_is_reported() {
        let mut solver = GridSolver::new(SolverParameters::default());
        let r = solver.solve(
            |_t, _y: &Vector2<f64>| Vector2::new(f64::NAN, 0.0),
            Vector2::zeros(),
            &[0.0, 1.0],
        );
        assert!(matches!(r, Err(SimError::NonFinite { .. })));
    }

    #[test]
    fn step_budget_is_enforced() {
        let params = SolverParameters {
            max_steps: 3,
            h0: 1e-6,
            ..SolverParameters::default()
        };
        let mut solver = GridSolver::new(params);
        let r = solver.solve(|_t, y: &Vector2<f64>| Vector2::new(y[1], -y[0]), Vector2::new(1.0, 0.0), &[0.0, 100.0]);
        assert!(matches!(r, Err(SimError::StepLimit { .. })));
    }
}
