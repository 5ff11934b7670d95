//! Numerical and physical parameters for the N-body simulation
//!
//! `Parameters` holds runtime settings:
//! - integration step size and speed ceiling,
//! - gravitational constant, force strength and softening distance

#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub dt: f64, // step size
    pub max_speed: f64, // velocity magnitude ceiling
    pub G: f64, // gravitational constant
    pub strength: f64, // force scale on top of G
    pub softening: f64, // added to the separation before cubing
}

impl Default for Parameters {
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
