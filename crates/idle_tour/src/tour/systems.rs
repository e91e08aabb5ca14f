//! Tour systems (FixedUpdate)
//!
//! Порядок (chain):
//! 1. initialize_tour_controllers - стартовый waypoint для новых controller'ов
//! 2. apply_tour_commands - Enable/Disable/Toggle/Redirect
//! 3. tick_tour_controllers - шаг FSM + signals → events

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::tour::{LegAbandoned, TourCommand, TourController, TourSignal, WaypointArrived, WaypointDeparted};
use crate::waypoint::SceneWaypoints;

/// Все исходящие tour events одним параметром
#[derive(SystemParam)]
pub struct TourEventWriters<'w> {
    arrived: EventWriter<'w, WaypointArrived>,
    departed: EventWriter<'w, WaypointDeparted>,
    abandoned: EventWriter<'w, LegAbandoned>,
}

impl TourEventWriters<'_> {
    pub fn publish(&mut self, traveler: Entity, signals: impl IntoIterator<Item = TourSignal>) {
        for signal in signals {
            match signal {
                TourSignal::Arrived(waypoint) => {
                    self.arrived.write(WaypointArrived { traveler, waypoint });
                }
                TourSignal::Departed(waypoint) => {
                    self.departed.write(WaypointDeparted { traveler, waypoint });
                }
                TourSignal::LegAbandoned(waypoint) => {
                    self.abandoned.write(LegAbandoned { traveler, waypoint });
                }
            }
        }
    }
}

/// Система: инициализация только что добавленных controller'ов
///
/// Явный start_waypoint → ближайший → default. Ошибка логируется controller'ом,
/// entity остаётся неинициализированной (tick её пропускает).
pub fn initialize_tour_controllers(
    mut travelers: Query<(Entity, &mut TourController, &Transform), Added<TourController>>,
    waypoints: SceneWaypoints,
) {
    for (entity, mut controller, transform) in travelers.iter_mut() {
        let start = controller.start_waypoint();
        if controller
            .initialize(start, transform.translation, &waypoints)
            .is_err()
        {
            crate::log_warning(&format!("Tour: traveler {:?} stays uninitialized", entity));
        }
    }
}

/// Система: применение TourCommand events
pub fn apply_tour_commands(
    mut commands: EventReader<TourCommand>,
    mut travelers: Query<(&mut TourController, &Transform)>,
    waypoints: SceneWaypoints,
    mut events: TourEventWriters,
) {
    for command in commands.read() {
        let traveler = match *command {
            TourCommand::Enable { traveler }
            | TourCommand::Disable { traveler }
            | TourCommand::Toggle { traveler }
            | TourCommand::Redirect { traveler, .. } => traveler,
        };

        let Ok((mut controller, transform)) = travelers.get_mut(traveler) else {
            crate::log_warning(&format!(
                "Tour: {:?} ignored, {:?} has no TourController",
                command, traveler
            ));
            continue;
        };

        match *command {
            TourCommand::Enable { .. } => {
                // Ошибку уже залогировал controller
                let _ = controller.on_enable(transform.translation, &waypoints);
            }
            TourCommand::Disable { .. } => controller.on_disable(),
            TourCommand::Toggle { .. } => {
                if controller.is_enabled() {
                    controller.on_disable();
                } else {
                    let _ = controller.on_enable(transform.translation, &waypoints);
                }
            }
            TourCommand::Redirect { waypoint, .. } => {
                controller.set_waypoint(waypoint, transform, &waypoints);
                events.publish(traveler, controller.drain_signals());
            }
        }
    }
}

/// Система: один tick FSM для каждого активного traveler'а
///
/// Неактивные (disabled / неинициализированные) не трогаем вообще -
/// Transform не помечается changed.
pub fn tick_tour_controllers(
    mut travelers: Query<(Entity, &mut TourController, &mut Transform)>,
    waypoints: SceneWaypoints,
    time: Res<Time<Fixed>>,
    mut events: TourEventWriters,
) {
    let delta = time.delta_secs();

    for (entity, mut controller, mut transform) in travelers.iter_mut() {
        if !controller.is_active() {
            continue;
        }

        controller.tick(delta, &mut transform, &waypoints);
        events.publish(entity, controller.drain_signals());
    }
}
