//! Sampled pendulum trajectories and forward kinematics

use crate::pendulum::equations::{PendulumParams, PendulumState};
use crate::simulation::states::NVec2;

/// Cartesian positions of both masses at one sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointPositions {
    pub p1: NVec2, // tip of arm 1
    pub p2: NVec2, // tip of arm 2
}

/// Joint positions for angles measured from the downward vertical, pivot at
/// the origin. Arm 2 hangs from the tip of arm 1.
pub fn forward_kinematics(theta1: f64, theta2: f64, l1: f64, l2: f64) -> JointPositions {
    let (s1, c1) = theta1.sin_cos();
    let (s2, c2) = theta2.sin_cos();
    let p1 = NVec2::new(l1 * s1, -l1 * c1);
    let p2 = p1 + NVec2::new(l2 * s2, -l2 * c2);
    JointPositions { p1, p2 }
}

/// States sampled on a fixed time grid; immutable once solved
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub times: Vec<f64>,
    pub states: Vec<PendulumState>,
}

impl Trajectory {
    pub fn new(times: Vec<f64>, states: Vec<PendulumState>) -> Self {
        debug_assert_eq!(times.len(), states.len());
        Self { times, states }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn theta1(&self) -> impl Iterator<Item = f64> + '_ {
        self.states.iter().map(|s| s[0])
    }

    pub fn omega1(&self) -> impl Iterator<Item = f64> + '_ {
        self.states.iter().map(|s| s[1])
    }

    pub fn theta2(&self) -> impl Iterator<Item = f64> + '_ {
        self.states.iter().map(|s| s[2])
    }

    pub fn omega2(&self) -> impl Iterator<Item = f64> + '_ {
        self.states.iter().map(|s| s[3])
    }

    pub fn joint_positions(&self, p: &PendulumParams) -> Vec<JointPositions> {
        self.states
            .iter()
            .map(|s| forward_kinematics(s[0], s[2], p.l1, p.l2))
            .collect()
    }
}

/// `|θ1_a - θ1_b|` at every common sample
pub fn angle_divergence(a: &Trajectory, b: &Trajectory) -> Vec<f64> {
    a.theta1().zip(b.theta1()).map(|(x, y)| (x - y).abs()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector4;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn horizontal_arms_point_right() {
        let j = forward_kinematics(FRAC_PI_2, FRAC_PI_2, 1.0, 2.0);
        assert!((j.p1 - NVec2::new(1.0, 0.0)).norm() < 1e-12);
        assert!((j.p2 - NVec2::new(3.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn arm_lengths_are_preserved() {
        let j = forward_kinematics(2.3, -0.7, 1.2, 0.8);
        assert!((j.p1.norm() - 1.2).abs() < 1e-12);
        assert!(((j.p2 - j.p1).norm() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn accessors_follow_state_layout() {
        let t = Trajectory::new(vec![0.0, 1.0], vec![
            Vector4::new(1.0, 2.0, 3.0, 4.0),
            Vector4::new(5.0, 6.0, 7.0, 8.0),
        ]);
        assert_eq!(t.theta1().collect::<Vec<_>>(), vec![1.0, 5.0]);
        assert_eq!(t.omega1().collect::<Vec<_>>(), vec![2.0, 6.0]);
        assert_eq!(t.theta2().collect::<Vec<_>>(), vec![3.0, 7.0]);
        assert_eq!(t.omega2().collect::<Vec<_>>(), vec![4.0, 8.0]);
    }
}
