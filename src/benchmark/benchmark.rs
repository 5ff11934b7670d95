use std::time::Instant;

use nalgebra::Vector4;

use crate::pendulum::equations::{derive_equations_of_motion, PendulumParams};
use crate::pendulum::scenario::{solve_pendulum, PendulumSetup};
use crate::pendulum::solver::{linspace, SolverParameters};
use crate::simulation::forces::{ForceSet, SoftenedGravity};
use crate::simulation::integrator::step;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, NVec2, System};

/// Deterministic spiral of bodies, no rand needed
fn spiral_system(n: usize) -> System {
    let bodies = (0..n)
        .map(|i| {
            let i_f = i as f64;
            let x = NVec2::new((i_f * 0.37).sin() * 250.0, (i_f * 0.13).cos() * 250.0);
            Body::new(x, NVec2::zeros(), 1.0 + (i % 3) as f64)
        })
        .collect();
    System::new(bodies)
}

/// Time one pairwise force accumulation for growing body counts
pub fn bench_forces() {
    let ns = [50, 100, 200, 400, 800, 1600];
    let forces = ForceSet::new().with(SoftenedGravity::default());

    for n in ns {
        let mut sys = spiral_system(n);

        // Warm up
        forces.accumulate_forces(0.0, &mut sys);

        let t0 = Instant::now();
        forces.accumulate_forces(0.0, &mut sys);
        let dt = t0.elapsed().as_secs_f64();

        println!("N = {n:5}, accumulate = {:8.6} s", dt);
    }
}

/// Time a batch of full frames (forces + integration)
pub fn bench_steps() {
    let ns = [5, 50, 500];
    let steps = 1000;
    let params = Parameters::default();
    let forces = ForceSet::new().with(SoftenedGravity::from_parameters(&params));

    for n in ns {
        let mut sys = spiral_system(n);

        let t0 = Instant::now();
        for _ in 0..steps {
            step(&mut sys, &forces, &params);
        }
        let dt = t0.elapsed().as_secs_f64();

        println!("N = {n:5}, {steps} steps = {:8.6} s ({:.3e} s/step)", dt, dt / steps as f64);
    }
}

/// Time solving one double pendulum over growing horizons
pub fn bench_pendulum_solver() {
    let eom = derive_equations_of_motion();
    let solver = SolverParameters::default();
    let setup = PendulumSetup {
        params: PendulumParams { g: 9.81, m1: 10.0, m2: 7.0, l1: 1.0, l2: 1.0 },
        initial: Vector4::new(3.0, 2.0, 1.0, 1.0),
    };

    for t_end in [5.0, 10.0, 25.0, 50.0] {
        let grid = linspace(0.0, t_end, (t_end * 20.0) as usize);

        let t0 = Instant::now();
        let result = solve_pendulum(&eom, &setup, &grid, &solver);
        let dt = t0.elapsed().as_secs_f64();

        match result {
            Ok(_) => println!("t_end = {t_end:5.1}, solve = {:8.6} s", dt),
            Err(e) => println!("t_end = {t_end:5.1}, failed after {:8.6} s: {e}", dt),
        }
    }
}
