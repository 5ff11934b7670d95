//! Fixed-step time integration for the N-body system
//!
//! Semi-implicit Euler: positions move with the velocity from the start of
//! the step, then velocities pick up the acceleration from the accumulated
//! forces. Speeds are clamped to `Parameters::max_speed` so close encounters
//! cannot fling bodies out of the animation.

use super::forces::ForceSet;
use super::params::Parameters;
use super::states::{NVec2, System};

/// Rescale `v` to magnitude `max` if it is longer, keeping its direction
pub fn clamp_speed(v: NVec2, max: f64) -> NVec2 {
    let speed = v.norm();
    if speed > max {
        v * (max / speed)
    } else {
        v
    }
}

/// Apply the forces currently stored on the bodies and clear them
///
/// Updates positions, velocities and `sys.t` in place based on `params.dt`.
/// Every body leaves with a zero `force`.
pub fn integrate(sys: &mut System, params: &Parameters) {
    let dt = params.dt;

    for b in sys.bodies.iter_mut() {
        let a = b.force / b.m;

        // x_n+1 = x_n + dt v_n
        b.x += b.v * dt;

        // v_n+1 = v_n + dt a_n, then clamp
        b.v = clamp_speed(b.v + a * dt, params.max_speed);

        b.force = NVec2::zeros();
    }

    sys.t += dt;
}

/// Advance the system by one frame: accumulate forces, then integrate
pub fn step(sys: &mut System, forces: &ForceSet, params: &Parameters) {
    forces.accumulate_forces(sys.t, sys);
    integrate(sys, params);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::states::Body;

    #[test]
    fn clamp_keeps_slow_velocities() {
        let v = NVec2::new(3.0, 4.0);
        assert_eq!(clamp_speed(v, 10.0), v);
    }

    #[test]
    fn clamp_preserves_direction() {
        let v = clamp_speed(NVec2::new(30.0, 40.0), 10.0);
        assert!((v.norm() - 10.0).abs() < 1e-12);
        assert!((v.x - 6.0).abs() < 1e-12);
        assert!((v.y - 8.0).abs() < 1e-12);
    }

    #[test]
    fn position_uses_velocity_from_before_the_kick() {
        let mut b = Body::new(NVec2::zeros(), NVec2::new(1.0, 0.0), 2.0);
        b.force = NVec2::new(0.0, 4.0);
        let mut sys = System::new(vec![b]);
        let params = Parameters::default();

        integrate(&mut sys, &params);

        let b = &sys.bodies[0];
        assert!((b.x - NVec2::new(0.1, 0.0)).norm() < 1e-15);
        assert!((b.v - NVec2::new(1.0, 0.2)).norm() < 1e-15);
        assert!((sys.t - 0.1).abs() < 1e-15);
    }
}
