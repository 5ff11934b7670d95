//! Render-loop abstraction shared by both pipelines
//!
//! An [`Animation`] knows how to advance its own state by one frame and how
//! to project that state into drawable [`Primitive`]s in world coordinates.
//! [`RenderLoop`] owns the animation and drives it one tick at a time; the
//! Bevy viewer and the GIF writer only ever see primitives.

use crate::pendulum::equations::PendulumParams;
use crate::pendulum::scenario::PendulumSetup;
use crate::pendulum::trajectory::{JointPositions, Trajectory};
use crate::simulation::scenario::NBodyScenario;
use crate::simulation::states::NVec2;

pub type Color = [u8; 3];

/// Default color cycle, one entry per plotted line
pub const PALETTE: [Color; 10] = [
    [0x1f, 0x77, 0xb4],
    [0xff, 0x7f, 0x0e],
    [0x2c, 0xa0, 0x2c],
    [0xd6, 0x27, 0x28],
    [0x94, 0x67, 0xbd],
    [0x8c, 0x56, 0x4b],
    [0xe3, 0x77, 0xc2],
    [0x7f, 0x7f, 0x7f],
    [0xbc, 0xbd, 0x22],
    [0x17, 0xbe, 0xcf],
];

pub const GREEN: Color = [0x00, 0x80, 0x00];

/// Edge of the pendulum figure in typographic points (8 in)
const PENDULUM_FIGURE_PT: f64 = 576.0;
/// Edge of the n-body figure in typographic points (10 in)
const NBODY_FIGURE_PT: f64 = 720.0;

/// Something drawable, in world coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Segment { from: NVec2, to: NVec2, color: Color },
    Marker { at: NVec2, radius: f64, color: Color },
    Path { points: Vec<NVec2>, color: Color },
}

/// Convert a marker size in points to world units for a square view of
/// half-width `bounds` spanning `figure_pt` points
pub fn points_to_world(points: f64, bounds: f64, figure_pt: f64) -> f64 {
    points * 2.0 * bounds / figure_pt
}

pub trait Animation {
    /// Number of frames the loop will produce
    fn frame_count(&self) -> usize;

    /// Half-width of the visible square, centered on the origin
    fn bounds(&self) -> f64;

    /// Move the state to `frame`. Called exactly once per frame, in order.
    fn advance(&mut self, frame: usize);

    /// Drawable view of the state at `frame`
    fn project(&self, frame: usize) -> Vec<Primitive>;
}

/// Owned, single-threaded frame loop: each tick advances then projects
pub struct RenderLoop<A> {
    animation: A,
    frame: usize,
    repeat: bool,
}

impl<A: Animation> RenderLoop<A> {
    pub fn new(animation: A) -> Self {
        Self { animation, frame: 0, repeat: false }
    }

    /// Loop that starts over at frame 0 after the last frame instead of
    /// finishing. The animation state itself is not reset.
    pub fn repeating(animation: A) -> Self {
        Self { animation, frame: 0, repeat: true }
    }

    /// Run one frame. `None` once every frame has been produced.
    pub fn tick(&mut self) -> Option<Vec<Primitive>> {
        if self.repeat && self.frame >= self.animation.frame_count() {
            self.frame = 0;
        }
        if self.is_finished() {
            return None;
        }
        let frame = self.frame;
        self.animation.advance(frame);
        let primitives = self.animation.project(frame);
        self.frame += 1;
        Some(primitives)
    }

    /// Index of the next frame to be produced
    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn is_finished(&self) -> bool {
        let count = self.animation.frame_count();
        if self.repeat {
            count == 0
        } else {
            self.frame >= count
        }
    }

    pub fn animation(&self) -> &A {
        &self.animation
    }

    pub fn animation_mut(&mut self) -> &mut A {
        &mut self.animation
    }

    pub fn into_inner(self) -> A {
        self.animation
    }
}

impl<A: Animation> Iterator for RenderLoop<A> {
    type Item = Vec<Primitive>;

    fn next(&mut self) -> Option<Self::Item> {
        self.tick()
    }
}

// =========================================================================================
// N-body: integrate incrementally, one step per frame
// =========================================================================================

pub struct NBodyAnimation {
    pub scenario: NBodyScenario,
}

impl NBodyAnimation {
    pub fn new(scenario: NBodyScenario) -> Self {
        Self { scenario }
    }
}

impl Animation for NBodyAnimation {
    fn frame_count(&self) -> usize {
        self.scenario.playback.frames
    }

    fn bounds(&self) -> f64 {
        self.scenario.playback.bounds
    }

    fn advance(&mut self, _frame: usize) {
        self.scenario.advance();
    }

    /// One green marker per body, in body order, diameter `m` points
    fn project(&self, _frame: usize) -> Vec<Primitive> {
        let bounds = self.bounds();
        self.scenario
            .system
            .bodies
            .iter()
            .map(|b| Primitive::Marker {
                at: b.x,
                radius: points_to_world(0.5 * b.m, bounds, NBODY_FIGURE_PT),
                color: GREEN,
            })
            .collect()
    }
}

// =========================================================================================
// Pendulum: everything precomputed, frames index into the trajectories
// =========================================================================================

pub struct PendulumAnimation {
    positions: Vec<Vec<JointPositions>>,
    params: Vec<PendulumParams>,
    frames: usize,
    bounds: f64,
    trail: Option<usize>,
}

impl PendulumAnimation {
    /// `trail` limits the path of mass 2 to its last `n` samples; `None`
    /// keeps the whole history
    pub fn new(trajectories: &[Trajectory], setups: &[PendulumSetup], margin: f64, trail: Option<usize>) -> Self {
        assert_eq!(trajectories.len(), setups.len(), "one trajectory per pendulum");
        let params: Vec<PendulumParams> = setups.iter().map(|s| s.params).collect();
        let positions = trajectories
            .iter()
            .zip(&params)
            .map(|(t, p)| t.joint_positions(p))
            .collect::<Vec<_>>();

        let frames = positions.iter().map(Vec::len).min().unwrap_or(0);
        let reach = params.iter().map(|p| p.l1 + p.l2).fold(0.0, f64::max);

        Self {
            positions,
            params,
            frames,
            bounds: reach + margin,
            trail,
        }
    }
}

impl Animation for PendulumAnimation {
    fn frame_count(&self) -> usize {
        self.frames
    }

    fn bounds(&self) -> f64 {
        self.bounds
    }

    fn advance(&mut self, _frame: usize) {}

    /// Per pendulum: trail of mass 2, arm 1, mass 1, arm 2, mass 2
    fn project(&self, frame: usize) -> Vec<Primitive> {
        let mut out = Vec::with_capacity(self.positions.len() * 5);

        for (i, (positions, p)) in self.positions.iter().zip(&self.params).enumerate() {
            let j = positions[frame];
            let start = self.trail.map_or(0, |n| frame.saturating_sub(n));

            out.push(Primitive::Path {
                points: positions[start..frame].iter().map(|j| j.p2).collect(),
                color: PALETTE[(3 * i + 4) % PALETTE.len()],
            });
            out.push(Primitive::Segment {
                from: NVec2::zeros(),
                to: j.p1,
                color: PALETTE[(3 * i + 2) % PALETTE.len()],
            });
            out.push(Primitive::Marker {
                at: j.p1,
                radius: points_to_world(p.m1, self.bounds, PENDULUM_FIGURE_PT),
                color: GREEN,
            });
            out.push(Primitive::Segment {
                from: j.p1,
                to: j.p2,
                color: PALETTE[(3 * i + 3) % PALETTE.len()],
            });
            out.push(Primitive::Marker {
                at: j.p2,
                radius: points_to_world(p.m2, self.bounds, PENDULUM_FIGURE_PT),
                color: GREEN,
            });
        }

        out
    }
}
