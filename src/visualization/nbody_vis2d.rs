use bevy::log::LogPlugin;
use bevy::math::primitives::Circle;
use bevy::prelude::*;
use bevy::sprite::{MaterialMesh2dBundle, Mesh2dHandle};

use crate::simulation::scenario::NBodyScenario;
use crate::visualization::render::{Animation, NBodyAnimation, Primitive, RenderLoop};

/// Component tagging each marker with its index in the projected frame
#[derive(Component)]
struct MarkerIndex(pub usize);

#[derive(Resource)]
struct NBodyLoop(RenderLoop<NBodyAnimation>);

/// Primitives of the most recent tick
#[derive(Resource, Default)]
struct LatestFrame(Vec<Primitive>);

/// Wall-clock pacing between simulation steps
#[derive(Resource)]
struct StepTimer(Timer);

/// World units → screen pixels
#[derive(Resource)]
struct ViewScale(f32);

/// Smallest on-screen marker radius so light bodies stay visible
const MIN_RADIUS_PX: f32 = 2.0;

/// Open the viewer and block until the window is closed
pub fn run_nbody(scenario: NBodyScenario) {
    log::info!("starting 2D viewer with {} bodies", scenario.system.bodies.len());

    let window = scenario.playback.window;
    let interval = scenario.playback.interval_ms as f32 / 1000.0;
    let animation = NBodyAnimation::new(scenario);
    let scale = window / (2.0 * animation.bounds()) as f32;

    App::new()
        .insert_resource(NBodyLoop(RenderLoop::repeating(animation)))
        .insert_resource(LatestFrame::default())
        .insert_resource(ViewScale(scale))
        .insert_resource(ClearColor(Color::WHITE))
        .insert_resource(StepTimer(Timer::from_seconds(interval, TimerMode::Repeating)))
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "N-body gravitation".to_string(),
                        resolution: (window, window).into(),
                        ..Default::default()
                    }),
                    ..Default::default()
                })
                // `log` is routed through fern by the binary
                .disable::<LogPlugin>(),
        )
        .add_systems(Startup, setup_markers_system)
        .add_systems(Update, (tick_system, sync_transforms_system).chain())
        .run();
}

fn setup_markers_system(
    mut commands: Commands,
    render_loop: Res<NBodyLoop>,
    scale: Res<ViewScale>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    commands.spawn(Camera2dBundle::default());

    let initial = render_loop.0.animation().project(0);
    for (i, prim) in initial.iter().enumerate() {
        let Primitive::Marker { at, radius, color } = prim else {
            continue;
        };
        let radius_screen = (*radius as f32 * scale.0).max(MIN_RADIUS_PX);

        commands.spawn((
            MaterialMesh2dBundle {
                mesh: Mesh2dHandle(meshes.add(Circle::new(radius_screen))),
                material: materials.add(ColorMaterial::from(Color::srgb_u8(color[0], color[1], color[2]))),
                transform: Transform::from_xyz(at.x as f32 * scale.0, at.y as f32 * scale.0, 0.0),
                ..Default::default()
            },
            MarkerIndex(i),
        ));
    }
}

/// At most one simulation step per rendered frame, once `interval_ms` has passed
fn tick_system(
    time: Res<Time>,
    mut timer: ResMut<StepTimer>,
    mut render_loop: ResMut<NBodyLoop>,
    mut latest: ResMut<LatestFrame>,
) {
    timer.0.tick(time.delta());
    if !timer.0.just_finished() && !timer.0.duration().is_zero() {
        return;
    }
    if let Some(primitives) = render_loop.0.tick() {
        latest.0 = primitives;
    }
}

fn sync_transforms_system(
    latest: Res<LatestFrame>,
    scale: Res<ViewScale>,
    mut query: Query<(&MarkerIndex, &mut Transform)>,
) {
    if !latest.is_changed() {
        return;
    }
    for (MarkerIndex(i), mut transform) in &mut query {
        if let Some(Primitive::Marker { at, .. }) = latest.0.get(*i) {
            transform.translation.x = at.x as f32 * scale.0;
            transform.translation.y = at.y as f32 * scale.0;
        }
    }
}
