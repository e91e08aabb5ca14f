use bevy::prelude::*;
use idle_tour::scene::{ring_layout, spawn_waypoint_loop};
use idle_tour::{DeterministicRng, IdleTourPlugin, TourController, TourProfile};

mod camera;
mod rendering;

use camera::TourCameraPlugin;
use rendering::WaypointVisualsPlugin;

const SEED: u64 = 7;
const WAYPOINT_COUNT: usize = 8;

fn main() {
    App::new()
        // Bevy defaults (rendering, input, time, etc.)
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Idle Tour".to_string(),
                resolution: (1280., 720.).into(),
                ..default()
            }),
            ..default()
        }))
        // Tour (headless ECS logic)
        .add_plugins(IdleTourPlugin)
        .insert_resource(DeterministicRng::new(SEED))
        // Waypoint markers + debug gizmos
        .add_plugins(WaypointVisualsPlugin)
        // Enter = toggle tour, free-look пока тур выключен
        .add_plugins(TourCameraPlugin)
        .add_systems(Startup, (setup_scene, setup_tour).chain())
        .run();
}

/// Spawn ground plane and lights
fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Ground plane (60x60m)
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::new(Vec3::Y, Vec2::splat(30.0)))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.5, 0.3))),
        Transform::from_xyz(0.0, 0.0, 0.0),
    ));

    // Directional light (sun)
    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_4)),
    ));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 0.3,
        affects_lightmapped_meshes: false,
    });
}

/// Spawn waypoint ring + camera traveler
///
/// Exclusive: spawn_waypoint_loop работает напрямую с World.
fn setup_tour(world: &mut World) {
    let positions = {
        let mut rng = world.resource_mut::<DeterministicRng>();
        ring_layout(&mut rng.rng, WAYPOINT_COUNT, 20.0, 4.0)
    };
    let waypoints = spawn_waypoint_loop(world, &positions);

    let mut profile = TourProfile::default();
    profile.settings.face_target = true;
    profile.settings.move_duration = 4.0;

    let mut controller = match TourController::from_profile(profile) {
        Ok(controller) => controller,
        Err(err) => {
            error!("Invalid tour profile: {}", err);
            return;
        }
    };
    if let Some(&first) = waypoints.first() {
        controller = controller.with_start_waypoint(first);
    }

    world.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 8.0, 0.0),
        controller,
    ));
}
