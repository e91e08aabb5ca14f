//! Tour events
//!
//! Входящие: TourCommand (host → controller).
//! Исходящие: WaypointArrived / WaypointDeparted / LegAbandoned (controller → host),
//! дублируют synchronous hooks на Waypoint для ECS потребителей.

use bevy::prelude::*;

/// Команда controller'у конкретного traveler'а
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourCommand {
    /// Включить (re-resolve ближайшего waypoint'а)
    Enable { traveler: Entity },
    /// Заморозить на месте
    Disable { traveler: Entity },
    /// Enable если выключен, иначе Disable (клавиша в client'е)
    Toggle { traveler: Entity },
    /// Начать leg к `waypoint` прямо сейчас
    Redirect { traveler: Entity, waypoint: Entity },
}

/// Traveler доехал до waypoint'а (начинается вращение)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaypointArrived {
    pub traveler: Entity,
    pub waypoint: Entity,
}

/// Traveler покинул waypoint (начался следующий leg)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaypointDeparted {
    pub traveler: Entity,
    pub waypoint: Entity,
}

/// Leg брошен: timeout translation'а или target пропал
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegAbandoned {
    pub traveler: Entity,
    pub waypoint: Entity,
}
