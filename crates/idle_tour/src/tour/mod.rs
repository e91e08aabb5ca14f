//! Tour domain - FSM движения traveler'а по waypoint'ам
//!
//! Архитектура:
//! - TourController (component): чистая FSM, не знает про ECS schedule
//! - systems: ECS обвязка (init / commands / tick) в FixedUpdate
//! - events: TourCommand на вход, arrival/departure/abandon на выход

use bevy::prelude::*;

pub mod config;
pub mod controller;
pub mod events;
pub mod systems;


pub use config::{HeadingReference, TourConfig, TourProfile, TourSettings};
pub use controller::{TourController, TourPhase, TourSignal, TourStats};
pub use events::{LegAbandoned, TourCommand, WaypointArrived, WaypointDeparted};
pub use systems::{apply_tour_commands, initialize_tour_controllers, tick_tour_controllers, TourEventWriters};

/// SystemSet всех tour систем (для упорядочивания host систем относительно тура)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct TourSet;

/// Tour Plugin
///
/// Регистрирует tour системы в FixedUpdate.
/// Порядок выполнения:
/// 1. initialize_tour_controllers - резолв стартового waypoint'а
/// 2. apply_tour_commands - enable/disable/toggle/redirect
/// 3. tick_tour_controllers - шаг FSM, публикация events
pub struct TourPlugin;

impl Plugin for TourPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<TourCommand>()
            .add_event::<WaypointArrived>()
            .add_event::<WaypointDeparted>()
            .add_event::<LegAbandoned>()
            .register_type::<TourPhase>()
            .register_type::<TourStats>()
            .register_type::<TourSettings>();

        app.add_systems(
            FixedUpdate,
            (
                initialize_tour_controllers,
                apply_tour_commands,
                tick_tour_controllers,
            )
                .chain() // Последовательное выполнение
                .in_set(TourSet),
        );
    }
}
