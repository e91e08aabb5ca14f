use bevy::prelude::*;
use idle_tour::{TourController, Waypoint, WaypointArrived, WaypointDeparted};

pub struct WaypointVisualsPlugin;

impl Plugin for WaypointVisualsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (
            spawn_markers_for_new_waypoints,
            hide_marker_on_arrival,
            show_marker_on_departure,
            draw_waypoint_links,
            draw_look_targets,
        ).chain());
    }
}

/// Marker: у waypoint'а уже есть mesh
#[derive(Component)]
pub struct WaypointMarker;

const MARKER_COLOR: Color = Color::srgb(0.2, 0.6, 0.9);
const LINK_COLOR: Color = Color::srgb(0.9, 0.9, 0.9);
const LOOK_TARGET_COLOR: Color = Color::srgb(1.0, 0.9, 0.1);
const LOOK_TARGET_SIZE: f32 = 1.2;

/// Добавляет сферу-маркер к новым waypoint'ам (сам waypoint и есть visual)
fn spawn_markers_for_new_waypoints(
    mut commands: Commands,
    query: Query<Entity, (Added<Waypoint>, Without<WaypointMarker>)>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if query.is_empty() {
        return;
    }

    let mesh = meshes.add(Sphere::new(0.5));
    let material = materials.add(StandardMaterial {
        base_color: MARKER_COLOR,
        ..default()
    });

    for waypoint in query.iter() {
        commands.entity(waypoint).insert((
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            Visibility::Visible,
            WaypointMarker,
        ));
    }
}

/// Прячем маркер, пока камера стоит внутри него
fn hide_marker_on_arrival(
    mut events: EventReader<WaypointArrived>,
    mut markers: Query<&mut Visibility, With<WaypointMarker>>,
) {
    for event in events.read() {
        if let Ok(mut visibility) = markers.get_mut(event.waypoint) {
            *visibility = Visibility::Hidden;
        }
    }
}

fn show_marker_on_departure(
    mut events: EventReader<WaypointDeparted>,
    mut markers: Query<&mut Visibility, With<WaypointMarker>>,
) {
    for event in events.read() {
        if let Ok(mut visibility) = markers.get_mut(event.waypoint) {
            *visibility = Visibility::Visible;
        }
    }
}

/// Debug: линии waypoint → successors
fn draw_waypoint_links(waypoints: Query<(&Waypoint, &GlobalTransform)>, mut gizmos: Gizmos) {
    for (waypoint, transform) in waypoints.iter() {
        for successor in waypoint.successors().iter().flatten() {
            // Despawned successor просто не рисуем
            let Ok((_, target)) = waypoints.get(*successor) else {
                continue;
            };
            gizmos.line(transform.translation(), target.translation(), LINK_COLOR);
        }
    }
}

/// Debug: куб там, куда смотрит камера в текущем leg'е
fn draw_look_targets(
    travelers: Query<&TourController>,
    waypoints: Query<&GlobalTransform, With<Waypoint>>,
    mut gizmos: Gizmos,
) {
    for controller in travelers.iter() {
        let Some(target) = controller.look_target() else {
            continue;
        };
        let Ok(transform) = waypoints.get(target) else {
            continue;
        };

        gizmos.cuboid(
            Transform::from_translation(transform.translation())
                .with_scale(Vec3::splat(LOOK_TARGET_SIZE)),
            LOOK_TARGET_COLOR,
        );
    }
}
