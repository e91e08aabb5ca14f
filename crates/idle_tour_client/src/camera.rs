use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use idle_tour::{TourCommand, TourController};

pub struct TourCameraPlugin;

impl Plugin for TourCameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FreeLook>()
            .add_systems(Update, (toggle_tour_on_enter, free_look_while_paused).chain());
    }
}

/// Чувствительность мыши для free-look (радианы на пиксель)
#[derive(Resource)]
pub struct FreeLook {
    pub sensitivity: f32,
}

impl Default for FreeLook {
    fn default() -> Self {
        Self { sensitivity: 0.005 }
    }
}

/// Enter: TourCommand::Toggle для каждого traveler'а-камеры
fn toggle_tour_on_enter(
    keys: Res<ButtonInput<KeyCode>>,
    cameras: Query<Entity, (With<Camera3d>, With<TourController>)>,
    mut commands: EventWriter<TourCommand>,
) {
    if !keys.just_pressed(KeyCode::Enter) {
        return;
    }

    for traveler in cameras.iter() {
        commands.write(TourCommand::Toggle { traveler });
    }
}

/// Right mouse button: оглядеться, пока тур на паузе
fn free_look_while_paused(
    mut cameras: Query<(&TourController, &mut Transform), With<Camera3d>>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    settings: Res<FreeLook>,
) {
    let Ok((controller, mut transform)) = cameras.single_mut() else {
        mouse_motion.clear();
        return;
    };

    if controller.is_enabled() || !mouse_buttons.pressed(MouseButton::Right) {
        // Consume motion events even when not looking around
        mouse_motion.clear();
        return;
    }

    let (mut yaw, mut pitch, _roll) = transform.rotation.to_euler(EulerRot::YXZ);
    for motion in mouse_motion.read() {
        yaw -= motion.delta.x * settings.sensitivity;
        pitch -= motion.delta.y * settings.sensitivity;
    }

    // Clamp pitch to avoid gimbal lock
    pitch = pitch.clamp(
        -std::f32::consts::FRAC_PI_2 + 0.1,
        std::f32::consts::FRAC_PI_2 - 0.1,
    );
    transform.rotation = Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0);
}
