pub mod render;
pub mod nbody_vis2d;
pub mod pendulum_gif;
