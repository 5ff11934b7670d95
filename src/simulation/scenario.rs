//! Build a fully-initialized N-body scenario from configuration
//!
//! Takes an `NBodyConfig` (YAML-facing) and produces the runtime bundle:
//! - numerical parameters (`Parameters`)
//! - system state (`System` with bodies at t = 0)
//! - active force set (`ForceSet`)
//! - playback settings for the viewer

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::configuration::config::{BodyConfig, NBodyConfig, PlaybackConfig, SpawnConfig};
use crate::error::{Result, SimError};
use crate::simulation::forces::{ForceSet, SoftenedGravity};
use crate::simulation::integrator::step;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, NVec2, System};

/// Runtime bundle constructed from an [`NBodyConfig`]: parameters, current
/// system state, the set of active force laws and playback settings
pub struct NBodyScenario {
    pub parameters: Parameters,
    pub system: System,
    pub forces: ForceSet,
    pub playback: PlaybackConfig,
}

impl NBodyScenario {
    pub fn build_scenario(cfg: NBodyConfig) -> Result<Self> {
        // Parameters (runtime) from ParametersConfig
        let p_cfg = cfg.parameters;
        let parameters = Parameters {
            dt: p_cfg.dt,
            max_speed: p_cfg.max_speed,
            G: p_cfg.G,
            strength: p_cfg.strength,
            softening: p_cfg.softening,
        };
        check_positive("dt", parameters.dt)?;
        check_positive("max_speed", parameters.max_speed)?;

        let bodies = if cfg.bodies.is_empty() {
            spawn_bodies(&cfg.spawn)?
        } else {
            cfg.bodies.iter().map(body_from_config).collect::<Result<Vec<_>>>()?
        };
        info!("n-body scenario with {} bodies", bodies.len());

        // Forces: construct a ForceSet and register softened gravity
        let forces = ForceSet::new().with(SoftenedGravity::from_parameters(&parameters));

        Ok(Self {
            parameters,
            system: System::new(bodies),
            forces,
            playback: cfg.playback,
        })
    }

    /// Advance the system by one frame
    pub fn advance(&mut self) {
        let Self {
            system,
            forces,
            parameters,
            ..
        } = &mut *self;
        step(system, forces, parameters);

        for (i, b) in self.system.bodies.iter().enumerate() {
            log::trace!("t = {:.1} body {}: x = {:?} v = {:?} m = {}", self.system.t, i, b.x, b.v, b.m);
        }
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(SimError::InvalidParameter { name, value })
    }
}

fn body_from_config(bc: &BodyConfig) -> Result<Body> {
    check_positive("m", bc.m)?;
    Ok(Body::new(NVec2::new(bc.x[0], bc.x[1]), NVec2::new(bc.v[0], bc.v[1]), bc.m))
}

/// Random bodies at rest: positions uniform over the spawn square, integer
/// masses uniform over `mass_min..=mass_max`
pub fn spawn_bodies(spawn: &SpawnConfig) -> Result<Vec<Body>> {
    check_positive("extent", spawn.extent)?;
    if spawn.mass_min == 0 || spawn.mass_max < spawn.mass_min {
        return Err(SimError::InvalidParameter {
            name: "mass_min",
            value: spawn.mass_min as f64,
        });
    }

    let mut rng = match spawn.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    debug!("spawning {} bodies (seed {:?})", spawn.count, spawn.seed);

    let extent = spawn.extent;
    let bodies = (0..spawn.count)
        .map(|_| {
            let x = NVec2::new(
                rng.gen::<f64>() * 2.0 * extent - extent,
                rng.gen::<f64>() * 2.0 * extent - extent,
            );
            let m = rng.gen_range(spawn.mass_min..=spawn.mass_max) as f64;
            Body::new(x, NVec2::zeros(), m)
        })
        .collect();

    Ok(bodies)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_spawn_is_reproducible() {
        let spawn = SpawnConfig {
            seed: Some(42),
            ..SpawnConfig::default()
        };
        let a = spawn_bodies(&spawn).unwrap();
        let b = spawn_bodies(&spawn).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn spawned_bodies_respect_ranges() {
        let spawn = SpawnConfig {
            count: 200,
            seed: Some(1),
            ..SpawnConfig::default()
        };
        for b in spawn_bodies(&spawn).unwrap() {
            assert!(b.x.x >= -250.0 && b.x.x < 250.0);
            assert!(b.x.y >= -250.0 && b.x.y < 250.0);
            assert!(b.m == 1.0 || b.m == 2.0 || b.m == 3.0);
            assert_eq!(b.v, NVec2::zeros());
        }
    }

    #[test]
    fn explicit_bodies_override_spawn() {
        let cfg = NBodyConfig {
            bodies: vec![
                BodyConfig { x: [-100.0, 0.0], v: [0.0, 0.0], m: 1.0 },
                BodyConfig { x: [100.0, 0.0], v: [0.0, 0.0], m: 1.0 },
            ],
            ..NBodyConfig::default()
        };
        let scenario = NBodyScenario::build_scenario(cfg).unwrap();
        assert_eq!(scenario.system.bodies.len(), 2);
        assert_eq!(scenario.forces.len(), 1);
    }

    #[test]
    fn non_positive_mass_is_rejected() {
        let cfg = NBodyConfig {
            bodies: vec![BodyConfig { x: [0.0, 0.0], v: [0.0, 0.0], m: 0.0 }],
            ..NBodyConfig::default()
        };
        assert!(matches!(
            NBodyScenario::build_scenario(cfg),
            Err(SimError::InvalidParameter { name: "m", .. })
        ));
    }
}
