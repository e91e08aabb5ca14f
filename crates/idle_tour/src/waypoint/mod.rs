//! Waypoint domain - узлы тура и граф переходов
//!
//! Содержит:
//! - Waypoint (successors + arrival/departure hooks)
//! - WaypointRegistry (resource, порядок регистрации)
//! - WaypointGraph (trait, который потребляет controller)
//! - SceneWaypoints (ECS реализация WaypointGraph)

pub mod components;
pub mod graph;

#[cfg(test)]
mod graph_tests;

pub use components::*;
pub use graph::*;
