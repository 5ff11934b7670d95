//! Build the double pendulum ensemble from configuration and solve it
//!
//! All pendulums share one time grid and one set of derived equations; each
//! gets its own constants and initial state from the configuration table.

use log::info;
use nalgebra::Vector4;

use crate::configuration::config::{PendulumConfig, RenderConfig};
use crate::error::{Result, SimError};
use crate::pendulum::equations::{EquationsOfMotion, PendulumParams, PendulumState};
use crate::pendulum::solver::{linspace, GridSolver, SolverParameters};
use crate::pendulum::trajectory::Trajectory;

/// One pendulum of the ensemble: constants plus initial state
#[derive(Debug, Clone, PartialEq)]
pub struct PendulumSetup {
    pub params: PendulumParams,
    pub initial: PendulumState,
}

pub struct PendulumScenario {
    pub pendulums: Vec<PendulumSetup>,
    pub grid: Vec<f64>,
    pub solver: SolverParameters,
    pub render: RenderConfig,
}

impl PendulumScenario {
    pub fn build_scenario(cfg: PendulumConfig) -> Result<Self> {
        if !(cfg.t_end > 0.0 && cfg.t_end.is_finite()) {
            return Err(SimError::InvalidParameter { name: "t_end", value: cfg.t_end });
        }
        if cfg.samples == 0 {
            return Err(SimError::EmptyGrid);
        }

        let pendulums = cfg
            .pendulums
            .iter()
            .map(|spec| {
                Ok(PendulumSetup {
                    params: PendulumParams::new(cfg.g, spec.m1, spec.m2, spec.l1, spec.l2)?,
                    initial: Vector4::new(spec.theta1, spec.omega1, spec.theta2, spec.omega2),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            pendulums,
            grid: linspace(0.0, cfg.t_end, cfg.samples),
            solver: cfg.solver.into(),
            render: cfg.render,
        })
    }

    /// Integrate every pendulum over the full grid
    pub fn simulate(&self, eom: &EquationsOfMotion) -> Result<Vec<Trajectory>> {
        info!(
            "integrating {} pendulums over {} samples to t = {}",
            self.pendulums.len(),
            self.grid.len(),
            self.grid.last().copied().unwrap_or(0.0)
        );

        let trajectories = self
            .pendulums
            .iter()
            .map(|setup| solve_pendulum(eom, setup, &self.grid, &self.solver))
            .collect::<Result<Vec<_>>>()?;

        info!("integration done");
        Ok(trajectories)
    }
}

/// Integrate a single pendulum over `grid`
pub fn solve_pendulum(
    eom: &EquationsOfMotion,
    setup: &PendulumSetup,
    grid: &[f64],
    solver: &SolverParameters,
) -> Result<Trajectory> {
    let mut gs = GridSolver::new(solver.clone());
    let params = setup.params;
    let states = gs.solve(|t, s| eom.derivative(t, &params, s), setup.initial, grid)?;
    Ok(Trajectory::new(grid.to_vec(), states))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds_five_pendulums() {
        let scenario = PendulumScenario::build_scenario(PendulumConfig::default()).unwrap();
        assert_eq!(scenario.pendulums.len(), 5);
        assert_eq!(scenario.grid.len(), 1000);
        assert_eq!(*scenario.grid.last().unwrap(), 50.0);
        assert_eq!(scenario.pendulums[0].initial, Vector4::new(3.0, 2.0, 1.0, 1.0));
    }

    #[test]
    fn rejects_bad_horizon() {
        let cfg = PendulumConfig { t_end: 0.0, ..PendulumConfig::default() };
        assert!(PendulumScenario::build_scenario(cfg).is_err());
    }
}
