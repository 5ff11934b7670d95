pub mod error;
pub mod simulation;
pub mod pendulum;
pub mod configuration;
pub mod visualization;
pub mod benchmark;

pub use error::{Result, SimError};

pub use simulation::states::{Body, System, NVec2};
pub use simulation::forces::{Force, ForceSet, SoftenedGravity};
pub use simulation::integrator::{clamp_speed, integrate, step};
pub use simulation::params::Parameters;
pub use simulation::scenario::NBodyScenario;

pub use pendulum::equations::{derive_equations_of_motion, total_energy, EquationsOfMotion, PendulumParams, PendulumState};
pub use pendulum::solver::{linspace, GridSolver, SolverParameters, SolverStats};
pub use pendulum::trajectory::{angle_divergence, forward_kinematics, JointPositions, Trajectory};
pub use pendulum::scenario::{PendulumScenario, PendulumSetup};

pub use configuration::config::{ScenarioConfig, NBodyConfig, PendulumConfig, ParametersConfig, BodyConfig, SpawnConfig, PlaybackConfig, PendulumSpec, SolverConfig, RenderConfig};

pub use visualization::render::{Animation, RenderLoop, Primitive, NBodyAnimation, PendulumAnimation};
pub use visualization::{nbody_vis2d::run_nbody, pendulum_gif::{write_gif, Canvas}};

pub use benchmark::benchmark::{bench_forces, bench_steps, bench_pendulum_solver};
