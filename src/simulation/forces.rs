//! Force contributors for the n-body engine
//!
//! Forces are accumulated straight into each body's `force` field; the
//! integrator consumes and clears them. Gravity is a direct O(n²) pairwise
//! sum with an additive softening distance.

use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, NVec2, System};

/// Collection of force terms (gravity, drag, etc.)
/// Each term implements [`Force`] and adds its contribution into
/// `Body::force` for every body in the system
pub struct ForceSet {
    terms: Vec<Box<dyn Force + Send + Sync>>,
}

impl ForceSet {
    /// Create an empty force set
    pub fn new() -> Self {
        Self {
            terms: Vec::new()
        }
    }

    /// Add a force term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: Force + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    /// Add every term's contribution at time `t` on top of the forces already
    /// stored in `sys`
    pub fn accumulate_forces(&self, t: f64, sys: &mut System) {
        for term in &self.terms {
            term.accumulate(t, sys);
        }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl Default for ForceSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for force sources operating on [`System`]
/// Implementations add their contribution into each body's `force`
pub trait Force {
    fn accumulate(&self, t: f64, sys: &mut System);
}

/// Newtonian gravity with an additive softening distance
///
/// The force on `a` due to `b` is
/// `strength * G * m_a * m_b * r / (|r| + softening)^3` with `r = b.x - a.x`.
/// Adding the softening to `|r|` (rather than to `|r|^2`) keeps close
/// encounters from ejecting bodies.
#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq)]
pub struct SoftenedGravity {
    pub G: f64, // gravitational constant
    pub strength: f64, // force scale
    pub softening: f64, // softening distance
}

impl SoftenedGravity {
    pub fn from_parameters(p: &Parameters) -> Self {
        Self {
            G: p.G,
            strength: p.strength,
            softening: p.softening,
        }
    }

    /// Force exerted on `a` by `b`; the force on `b` is its negation
    pub fn pair_force(&self, a: &Body, b: &Body) -> NVec2 {
        // displacement from a to b
        let r = b.x - a.x;
        let r_mag = r.norm();

        let d = r_mag + self.softening;
        self.strength * self.G * a.m * b.m * r / (d * d * d)
    }
}

impl Default for SoftenedGravity {
    fn default() -> Self {
        Self::from_parameters(&Parameters::default())
    }
}

impl Force for SoftenedGravity {
    fn accumulate(&self, _t: f64, sys: &mut System) {
        let n = sys.bodies.len();

        // Loop over each unordered pair (i, j) with i < j
        for i in 0..n {
            for j in (i + 1)..n {
                let f = self.pair_force(&sys.bodies[i], &sys.bodies[j]);

                // equal and opposite
                sys.bodies[i].force += f;
                sys.bodies[j].force -= f;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_at(x: f64, y: f64, m: f64) -> Body {
        Body::new(NVec2::new(x, y), NVec2::zeros(), m)
    }

    #[test]
    fn pair_force_matches_softened_law() {
        let g = SoftenedGravity::default();
        let a = body_at(0.0, 0.0, 2.0);
        let b = body_at(30.0, 0.0, 3.0);

        let f = g.pair_force(&a, &b);
        let expected = 1000.0 * 2.0 * 3.0 * 30.0 / 40f64.powi(3);

        assert!((f.x - expected).abs() < 1e-12);
        assert_eq!(f.y, 0.0);
    }

    #[test]
    fn coincident_bodies_feel_no_force() {
        let g = SoftenedGravity::default();
        let a = body_at(5.0, 5.0, 1.0);
        let b = body_at(5.0, 5.0, 1.0);

        let f = g.pair_force(&a, &b);
        assert!(f.iter().all(|c| c.is_finite()));
        assert_eq!(f, NVec2::zeros());
    }

    #[test]
    fn empty_set_leaves_forces_untouched() {
        let mut sys = System::new(vec![body_at(0.0, 0.0, 1.0), body_at(1.0, 0.0, 1.0)]);
        ForceSet::new().accumulate_forces(0.0, &mut sys);
        assert_eq!(sys.total_force(), NVec2::zeros());
        assert_eq!(sys.bodies[0].force, NVec2::zeros());
    }

    #[test]
    fn every_pair_is_visited_once() {
        // three collinear bodies: the middle one is pulled equally both ways
        let mut sys = System::new(vec![
            body_at(-50.0, 0.0, 1.0),
            body_at(0.0, 0.0, 1.0),
            body_at(50.0, 0.0, 1.0),
        ]);
        let forces = ForceSet::new().with(SoftenedGravity::default());
        forces.accumulate_forces(0.0, &mut sys);

        assert!(sys.bodies[1].force.norm() < 1e-12);
        assert!(sys.bodies[0].force.x > 0.0);
        assert!(sys.bodies[2].force.x < 0.0);
        assert!(sys.total_force().norm() < 1e-12);
    }
}
