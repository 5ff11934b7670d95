//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of the
//! two runnable scenarios. The top-level [`ScenarioConfig`] is tagged by
//! `pipeline`:
//!
//! - `nbody`    – [`NBodyConfig`]: parameters, spawn rules, playback, optional explicit bodies
//! - `pendulum` – [`PendulumConfig`]: gravity, per-pendulum table, time grid, solver, render
//!
//! Every section falls back to the built-in defaults when omitted, so
//! `pipeline: nbody` alone is a complete scenario.
//!
//! # YAML format
//!
//! ```yaml
//! pipeline: nbody
//! parameters:
//!   dt: 0.1                 # step size per frame
//!   max_speed: 10.0         # velocity ceiling
//!   G: 1.0                  # gravitational constant
//!   strength: 1000.0        # force scale
//!   softening: 10.0         # added to separation
//! spawn:
//!   count: 5
//!   extent: 250.0           # positions in [-extent, extent)
//!   mass_min: 1
//!   mass_max: 3
//!   seed: 42                # omit for a fresh layout every run
//! playback:
//!   frames: 10000
//!   interval_ms: 1
//!   bounds: 260.0
//! ```
//!
//! ```yaml
//! pipeline: pendulum
//! g: 9.81
//! t_end: 50.0
//! samples: 1000
//! pendulums:
//!   - { m1: 10.0, l1: 1.0, m2: 7.0, l2: 1.0, theta1: 3.0, omega1: 2.0, theta2: 1.0, omega2: 1.0 }
//! render:
//!   output: five-double-pendulums.gif
//!   size: 600
//!   interval_ms: 70
//! ```

use serde::Deserialize;

/// Top-level scenario configuration loaded from YAML
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "pipeline")]
pub enum ScenarioConfig {
    #[serde(rename = "nbody")] // interactive gravitation window
    NBody(NBodyConfig),

    #[serde(rename = "pendulum")] // double pendulum ensemble written to a GIF
    Pendulum(PendulumConfig),
}

// =========================================================================================
// N-body
// =========================================================================================

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct NBodyConfig {
    pub parameters: ParametersConfig, // physical and numerical constants
    pub spawn: SpawnConfig, // random body generation
    pub playback: PlaybackConfig, // frame count, tick interval, view bounds
    pub bodies: Vec<BodyConfig>, // explicit bodies; when non-empty `spawn` is ignored
}

/// Global numerical and physical parameters for the n-body scenario
#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ParametersConfig {
    pub dt: f64,        // time step size
    pub max_speed: f64, // velocity magnitude ceiling
    pub G: f64,         // gravitational constant
    pub strength: f64,  // force scale
    pub softening: f64, // softening distance added to |r|
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            dt: 0.1,
            max_speed: 10.0,
            G: 1.0,
            strength: 1000.0,
            softening: 10.0,
        }
    }
}

/// Rules for generating bodies when none are listed explicitly
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SpawnConfig {
    pub count: usize,      // number of bodies
    pub extent: f64,       // positions drawn from [-extent, extent) on both axes
    pub mass_min: u32,     // smallest integer mass
    pub mass_max: u32,     // largest integer mass (inclusive)
    pub seed: Option<u64>, // deterministic seed to make runs reproducible
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            count: 5,
            extent: 250.0,
            mass_min: 1,
            mass_max: 3,
            seed: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PlaybackConfig {
    pub frames: usize,    // number of simulation frames before the animation stops
    pub interval_ms: u64, // nominal delay between frames
    pub bounds: f64,      // half-width of the visible square
    pub window: f32,      // window edge length in logical pixels
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            frames: 10_000,
            interval_ms: 1,
            bounds: 260.0,
            window: 1000.0,
        }
    }
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BodyConfig {
    pub x: [f64; 2], // initial position
    #[serde(default)]
    pub v: [f64; 2], // initial velocity, zero when omitted
    pub m: f64,      // mass
}

// =========================================================================================
// Double pendulum
// =========================================================================================

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PendulumConfig {
    pub g: f64,                     // gravitational acceleration
    pub t_end: f64,                 // time horizon, the grid starts at 0
    pub samples: usize,             // number of grid points (and animation frames)
    pub pendulums: Vec<PendulumSpec>,
    pub solver: SolverConfig,
    pub render: RenderConfig,
}

impl Default for PendulumConfig {
    fn default() -> Self {
        Self {
            g: 9.81,
            t_end: 50.0,
            samples: 1000,
            pendulums: default_pendulums(),
            solver: SolverConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

/// Masses, arm lengths and initial state `[theta1, omega1, theta2, omega2]`
/// of one double pendulum
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PendulumSpec {
    pub m1: f64,
    pub l1: f64,
    pub m2: f64,
    pub l2: f64,
    pub theta1: f64,
    pub omega1: f64,
    pub theta2: f64,
    pub omega2: f64,
}

/// The five-pendulum table: each starts 1e-4 rad further round than the
/// previous one. The first two share masses and lengths; the last three
/// also vary them.
pub fn default_pendulums() -> Vec<PendulumSpec> {
    let table = [
        (10.0, 1.0, 7.0, 1.0),
        (10.0, 1.0, 7.0, 1.0),
        (10.0, 1.0, 5.0, 1.0),
        (8.0, 1.0, 7.0, 0.8),
        (12.0, 0.8, 6.0, 1.2),
    ];

    table
        .iter()
        .enumerate()
        .map(|(i, &(m1, l1, m2, l2))| PendulumSpec {
            m1,
            l1,
            m2,
            l2,
            theta1: 3.0 + i as f64 * 1e-4,
            omega1: 2.0,
            theta2: 1.0,
            omega2: 1.0,
        })
        .collect()
}

/// Adaptive solver tolerances
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SolverConfig {
    pub atol: f64,         // absolute error tolerance
    pub rtol: f64,         // relative error tolerance
    pub h0: f64,           // first trial step
    pub max_steps: usize,  // step budget per output interval
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            atol: 1.49012e-8,
            rtol: 1.49012e-8,
            h0: 1e-3,
            max_steps: 500,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub output: String,       // GIF path, relative to the working directory
    pub size: u32,            // canvas edge in pixels
    pub interval_ms: u32,     // frame delay
    pub margin: f64,          // space around the longest pendulum
    pub trail: Option<usize>, // samples kept in the path of mass 2; full history when omitted
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output: "five-double-pendulums.gif".to_string(),
            size: 600,
            interval_ms: 70,
            margin: 0.3,
            trail: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_pipeline_tag_uses_defaults() {
        let cfg: ScenarioConfig = serde_yaml::from_str("pipeline: nbody").unwrap();
        assert_eq!(cfg, ScenarioConfig::NBody(NBodyConfig::default()));

        let cfg: ScenarioConfig = serde_yaml::from_str("pipeline: pendulum").unwrap();
        assert_eq!(cfg, ScenarioConfig::Pendulum(PendulumConfig::default()));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let yaml = "
pipeline: nbody
parameters:
  dt: 0.05
spawn:
  seed: 7
";
        let cfg: ScenarioConfig = serde_yaml::from_str(yaml).unwrap();
        let ScenarioConfig::NBody(nb) = cfg else {
            panic!("expected nbody scenario");
        };
        assert_eq!(nb.parameters.dt, 0.05);
        assert_eq!(nb.parameters.max_speed, 10.0);
        assert_eq!(nb.spawn.seed, Some(7));
        assert_eq!(nb.spawn.count, 5);
    }

    #[test]
    fn explicit_bodies_default_to_rest() {
        let yaml = "
pipeline: nbody
bodies:
  - x: [-100.0, 0.0]
    m: 2.0
";
        let cfg: ScenarioConfig = serde_yaml::from_str(yaml).unwrap();
        let ScenarioConfig::NBody(nb) = cfg else {
            panic!("expected nbody scenario");
        };
        assert_eq!(nb.bodies[0].v, [0.0, 0.0]);
    }

    #[test]
    fn unknown_pipeline_is_rejected() {
        assert!(serde_yaml::from_str::<ScenarioConfig>("pipeline: orbit").is_err());
    }

    #[test]
    fn default_table_offsets_first_angle() {
        let table = default_pendulums();
        assert_eq!(table.len(), 5);
        assert_eq!(table[0].m1, table[1].m1);
        assert_eq!(table[0].l2, table[1].l2);
        assert!((table[1].theta1 - table[0].theta1 - 1e-4).abs() < 1e-12);
    }
}
