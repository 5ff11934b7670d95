//! Core state types for the N-body simulation.
//!
//! A `System` holds the list of bodies and the current simulation time `t`.
//! Each body carries the force accumulated for the current step; the
//! integrator zeroes it once the step is applied.

use nalgebra::Vector2;
pub type NVec2 = Vector2<f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub x: NVec2, // position
    pub v: NVec2, // velocity
    pub m: f64, // mass
    pub force: NVec2, // accumulated force, reset every step
}

impl Body {
    pub fn new(x: NVec2, v: NVec2, m: f64) -> Self {
        Self {
            x,
            v,
            m,
            force: NVec2::zeros(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct System {
    pub bodies: Vec<Body>, // 2d collection of bodies
    pub t: f64, // time
}

impl System {
    pub fn new(bodies: Vec<Body>) -> Self {
        Self { bodies, t: 0.0 }
    }

    /// Mass-weighted mean position, or the origin for an empty system
    pub fn center_of_mass(&self) -> NVec2 {
        let total: f64 = self.bodies.iter().map(|b| b.m).sum();
        if total <= 0.0 {
            return NVec2::zeros();
        }
        self.bodies.iter().fold(NVec2::zeros(), |acc, b| acc + b.x * b.m) / total
    }

    pub fn total_momentum(&self) -> NVec2 {
        self.bodies.iter().fold(NVec2::zeros(), |acc, b| acc + b.v * b.m)
    }

    /// Sum of the accumulated forces; zero after a pairwise accumulation
    pub fn total_force(&self) -> NVec2 {
        self.bodies.iter().fold(NVec2::zeros(), |acc, b| acc + b.force)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_body_starts_without_force() {
        let b = Body::new(NVec2::new(1.0, 2.0), NVec2::zeros(), 3.0);
        assert_eq!(b.force, NVec2::zeros());
    }

    #[test]
    fn center_of_mass_is_mass_weighted() {
        let sys = System::new(vec![
            Body::new(NVec2::new(0.0, 0.0), NVec2::zeros(), 3.0),
            Body::new(NVec2::new(4.0, 0.0), NVec2::zeros(), 1.0),
        ]);
        assert_eq!(sys.center_of_mass(), NVec2::new(1.0, 0.0));
    }

    #[test]
    fn empty_system_has_origin_com() {
        assert_eq!(System::default().center_of_mass(), NVec2::zeros());
    }
}
