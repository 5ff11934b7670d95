//! Equations of motion for a planar double pendulum
//!
//! The masses sit at
//!
//! ```text
//! x1 = l1 sin θ1          y1 = -l1 cos θ1
//! x2 = x1 + l2 sin θ2     y2 = y1 - l2 cos θ2
//! ```
//!
//! Differentiating twice gives Cartesian accelerations that are affine in the
//! angular accelerations `(α1, α2)`. Balancing torques about each joint
//!
//! ```text
//! sin θ1 (m1 ÿ1 + m2 ÿ2 + (m1 + m2) g) + cos θ1 (m1 ẍ1 + m2 ẍ2) = 0
//! sin θ2 m2 (ÿ2 + g)                   + cos θ2 m2 ẍ2           = 0
//! ```
//!
//! yields two equations linear in `(α1, α2)`. Every evaluation assembles that
//! 2×2 system from the current state and solves it with Cramer's rule.
//! [`derive_equations_of_motion`] bundles the four resulting first-order
//! evaluators for the solver.

use std::ops::{Add, Mul};

use nalgebra::{Matrix2, Vector2, Vector4};

use crate::error::{Result, SimError};

/// `[θ1, ω1, θ2, ω2]`
pub type PendulumState = Vector4<f64>;

/// Signature shared by the four evaluators: time, constants, current state
pub type Evaluator = fn(f64, &PendulumParams, &PendulumState) -> f64;

/// Gravitational constant, masses and arm lengths of one double pendulum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendulumParams {
    pub g: f64,
    pub m1: f64,
    pub m2: f64,
    pub l1: f64,
    pub l2: f64,
}

impl PendulumParams {
    pub fn new(g: f64, m1: f64, m2: f64, l1: f64, l2: f64) -> Result<Self> {
        for (name, value) in [("g", g), ("m1", m1), ("m2", m2), ("l1", l1), ("l2", l2)] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(SimError::InvalidParameter { name, value });
            }
        }
        Ok(Self { g, m1, m2, l1, l2 })
    }
}

/// `a1 α1 + a2 α2 + c`: a quantity affine in the angular accelerations
#[derive(Debug, Clone, Copy, PartialEq)]
struct Affine {
    coeff: Vector2<f64>,
    c: f64,
}

impl Affine {
    fn constant(c: f64) -> Self {
        Self { coeff: Vector2::zeros(), c }
    }
}

impl Add for Affine {
    type Output = Affine;
    fn add(self, rhs: Affine) -> Affine {
        Affine { coeff: self.coeff + rhs.coeff, c: self.c + rhs.c }
    }
}

impl Mul<f64> for Affine {
    type Output = Affine;
    fn mul(self, k: f64) -> Affine {
        Affine { coeff: self.coeff * k, c: self.c * k }
    }
}

/// Second time derivatives of `(x1, y1, x2, y2)`
struct CartesianAccelerations {
    x1: Affine,
    y1: Affine,
    x2: Affine,
    y2: Affine,
}

fn cartesian_accelerations(p: &PendulumParams, s: &PendulumState) -> CartesianAccelerations {
    let (th1, w1, th2, w2) = (s[0], s[1], s[2], s[3]);
    let (s1, c1) = th1.sin_cos();
    let (s2, c2) = th2.sin_cos();

    // d²/dt² (l sin θ) = l cos θ α - l sin θ ω²
    // d²/dt² (-l cos θ) = l sin θ α + l cos θ ω²
    let x1 = Affine { coeff: Vector2::new(p.l1 * c1, 0.0), c: -p.l1 * s1 * w1 * w1 };
    let y1 = Affine { coeff: Vector2::new(p.l1 * s1, 0.0), c: p.l1 * c1 * w1 * w1 };
    let x2 = x1 + Affine { coeff: Vector2::new(0.0, p.l2 * c2), c: -p.l2 * s2 * w2 * w2 };
    let y2 = y1 + Affine { coeff: Vector2::new(0.0, p.l2 * s2), c: p.l2 * c2 * w2 * w2 };

    CartesianAccelerations { x1, y1, x2, y2 }
}

/// The two equations of motion as `M α = b`
fn linear_system(p: &PendulumParams, s: &PendulumState) -> (Matrix2<f64>, Vector2<f64>) {
    let (s1, c1) = s[0].sin_cos();
    let (s2, c2) = s[2].sin_cos();
    let acc = cartesian_accelerations(p, s);
    let g = Affine::constant(p.g);

    let eq1 = (acc.y1 * p.m1 + acc.y2 * p.m2 + g * (p.m1 + p.m2)) * s1
        + (acc.x1 * p.m1 + acc.x2 * p.m2) * c1;
    let eq2 = (acc.y2 + g) * (p.m2 * s2) + acc.x2 * (p.m2 * c2);

    let m = Matrix2::new(
        eq1.coeff[0], eq1.coeff[1],
        eq2.coeff[0], eq2.coeff[1],
    );
    (m, Vector2::new(-eq1.c, -eq2.c))
}

/// Solve the 2×2 system for `(α1, α2)`; NaN when it is singular, which the
/// solver reports as a non-finite derivative
fn angular_accelerations(p: &PendulumParams, s: &PendulumState) -> Vector2<f64> {
    let (m, b) = linear_system(p, s);
    let det = m.determinant();
    if det == 0.0 || !det.is_finite() {
        return Vector2::repeat(f64::NAN);
    }
    // Cramer's rule
    Vector2::new(
        (b[0] * m[(1, 1)] - m[(0, 1)] * b[1]) / det,
        (m[(0, 0)] * b[1] - b[0] * m[(1, 0)]) / det,
    )
}

fn dtheta1_dt(_t: f64, _p: &PendulumParams, s: &PendulumState) -> f64 {
    s[1]
}

fn domega1_dt(_t: f64, p: &PendulumParams, s: &PendulumState) -> f64 {
    angular_accelerations(p, s)[0]
}

fn dtheta2_dt(_t: f64, _p: &PendulumParams, s: &PendulumState) -> f64 {
    s[3]
}

fn domega2_dt(_t: f64, p: &PendulumParams, s: &PendulumState) -> f64 {
    angular_accelerations(p, s)[1]
}

/// Compiled right-hand side of the first-order system
#[derive(Clone, Copy)]
pub struct EquationsOfMotion {
    pub dtheta1_dt: Evaluator,
    pub domega1_dt: Evaluator,
    pub dtheta2_dt: Evaluator,
    pub domega2_dt: Evaluator,
}

impl EquationsOfMotion {
    /// `[ω1, α1, ω2, α2]` at `(t, state)`
    pub fn derivative(&self, t: f64, p: &PendulumParams, s: &PendulumState) -> PendulumState {
        Vector4::new(
            (self.dtheta1_dt)(t, p, s),
            (self.domega1_dt)(t, p, s),
            (self.dtheta2_dt)(t, p, s),
            (self.domega2_dt)(t, p, s),
        )
    }
}

/// The four evaluators of `[θ1, ω1, θ2, ω2]'`. They hold no state, so one
/// value serves every pendulum.
pub fn derive_equations_of_motion() -> EquationsOfMotion {
    log::debug!("assembling double pendulum equations of motion");
    EquationsOfMotion {
        dtheta1_dt,
        domega1_dt,
        dtheta2_dt,
        domega2_dt,
    }
}

/// Kinetic plus potential energy, with the pivot as zero height
pub fn total_energy(p: &PendulumParams, s: &PendulumState) -> f64 {
    let (th1, w1, th2, w2) = (s[0], s[1], s[2], s[3]);
    let kinetic = 0.5 * (p.m1 + p.m2) * p.l1 * p.l1 * w1 * w1
        + 0.5 * p.m2 * p.l2 * p.l2 * w2 * w2
        + p.m2 * p.l1 * p.l2 * w1 * w2 * (th1 - th2).cos();
    let potential = -(p.m1 + p.m2) * p.g * p.l1 * th1.cos() - p.m2 * p.g * p.l2 * th2.cos();
    kinetic + potential
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> PendulumParams {
        PendulumParams::new(9.81, 10.0, 7.0, 1.0, 1.0).unwrap()
    }

    /// Textbook form of the double pendulum accelerations
    fn reference(p: &PendulumParams, s: &PendulumState) -> (f64, f64) {
        let (th1, w1, th2, w2) = (s[0], s[1], s[2], s[3]);
        let (m1, m2, l1, l2, g) = (p.m1, p.m2, p.l1, p.l2, p.g);
        let d = th1 - th2;
        let den = 2.0 * m1 + m2 - m2 * (2.0 * d).cos();

        let a1 = (-g * (2.0 * m1 + m2) * th1.sin()
            - m2 * g * (th1 - 2.0 * th2).sin()
            - 2.0 * d.sin() * m2 * (w2 * w2 * l2 + w1 * w1 * l1 * d.cos()))
            / (l1 * den);
        let a2 = (2.0 * d.sin()
            * (w1 * w1 * l1 * (m1 + m2) + g * (m1 + m2) * th1.cos() + w2 * w2 * l2 * m2 * d.cos()))
            / (l2 * den);
        (a1, a2)
    }

    #[test]
    fn accelerations_match_textbook_form() {
        let eom = derive_equations_of_motion();
        let cases = [
            (params(), Vector4::new(3.0, 2.0, 1.0, 1.0)),
            (params(), Vector4::new(-0.4, 0.0, 2.5, -3.0)),
            (PendulumParams::new(9.81, 8.0, 7.0, 1.0, 0.8).unwrap(), Vector4::new(1.2, -0.7, -2.0, 0.3)),
            (PendulumParams::new(1.0, 1.0, 3.0, 2.0, 0.5).unwrap(), Vector4::new(0.1, 5.0, 0.2, -5.0)),
        ];

        for (p, s) in cases {
            let (a1, a2) = reference(&p, &s);
            let d = eom.derivative(0.0, &p, &s);
            assert!((d[1] - a1).abs() < 1e-9, "alpha1 {} vs {}", d[1], a1);
            assert!((d[3] - a2).abs() < 1e-9, "alpha2 {} vs {}", d[3], a2);
        }
    }

    #[test]
    fn angle_rates_are_angular_velocities() {
        let eom = derive_equations_of_motion();
        let s = Vector4::new(0.3, -1.5, 0.2, 4.0);
        let d = eom.derivative(0.0, &params(), &s);
        assert_eq!(d[0], -1.5);
        assert_eq!(d[2], 4.0);
    }

    #[test]
    fn hanging_pendulum_stays_at_rest() {
        let eom = derive_equations_of_motion();
        let d = eom.derivative(0.0, &params(), &Vector4::zeros());
        assert_eq!(d, Vector4::zeros());
    }

    #[test]
    fn rejects_non_positive_parameters() {
        assert!(matches!(
            PendulumParams::new(9.81, 10.0, -1.0, 1.0, 1.0),
            Err(SimError::InvalidParameter { name: "m2", .. })
        ));
        assert!(PendulumParams::new(f64::NAN, 1.0, 1.0, 1.0, 1.0).is_err());
    }

    #[test]
    fn energy_at_rest_is_potential_only() {
        let p = params();
        let e = total_energy(&p, &Vector4::zeros());
        assert!((e + (17.0 * 9.81 + 7.0 * 9.81)).abs() < 1e-12);
    }
}
