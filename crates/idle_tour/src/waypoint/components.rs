//! Waypoint компонент: successors + arrival/departure hooks

use std::fmt;
use std::sync::Arc;

use bevy::prelude::*;

/// Callback на прохождение waypoint'а (аргумент - entity самого waypoint'а)
pub type WaypointHook = Arc<dyn Fn(Entity) + Send + Sync>;

/// Какой hook дёргает traveler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum WaypointSignal {
    /// Traveler доехал и начинает вращение на месте
    Arrive,
    /// Traveler начинает leg к следующему waypoint'у
    Depart,
}

/// Waypoint - именованная точка тура
///
/// Позиция/ориентация живут в Transform entity (владеет сцена).
/// Successors - упорядоченный список: index 0 = приоритетный следующий шаг,
/// `None` = явное "нет successor'а" (traveler уйдёт на default waypoint).
/// Reachable targets - вторичный список для альтернативного режима обхода
/// (host переключает маршрут); controller его не читает.
#[derive(Component, Default, Clone)]
pub struct Waypoint {
    successors: Vec<Option<Entity>>,
    reachable_targets: Vec<Entity>,
    on_arrive: Vec<WaypointHook>,
    on_departure: Vec<WaypointHook>,
}

impl fmt::Debug for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Waypoint")
            .field("successors", &self.successors)
            .field("reachable_targets", &self.reachable_targets)
            .field("on_arrive", &self.on_arrive.len())
            .field("on_departure", &self.on_departure.len())
            .finish()
    }
}

impl Waypoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_successors(successors: impl IntoIterator<Item = Option<Entity>>) -> Self {
        Self {
            successors: successors.into_iter().collect(),
            ..default()
        }
    }

    /// Waypoint с единственным successor'ом
    pub fn leading_to(next: Entity) -> Self {
        Self::with_successors([Some(next)])
    }

    pub fn successors(&self) -> &[Option<Entity>] {
        &self.successors
    }

    pub fn set_successors(&mut self, successors: impl IntoIterator<Item = Option<Entity>>) {
        self.successors = successors.into_iter().collect();
    }

    /// Добавить successor в конец (unlock нового направления)
    ///
    /// Возвращает false если такой successor уже есть.
    pub fn add_successor(&mut self, target: Entity) -> bool {
        if self.successors.contains(&Some(target)) {
            return false;
        }
        self.successors.push(Some(target));
        true
    }

    pub fn reachable_targets(&self) -> &[Entity] {
        &self.reachable_targets
    }

    pub fn set_reachable_targets(&mut self, targets: impl IntoIterator<Item = Entity>) {
        self.reachable_targets = targets.into_iter().collect();
    }

    /// Переключить режим: reachable targets становятся successors (и наоборот)
    pub fn swap_route(&mut self) {
        let successors = self.successors.iter().flatten().copied().collect();
        let targets = std::mem::replace(&mut self.reachable_targets, successors);
        self.successors = targets.into_iter().map(Some).collect();
    }

    pub fn on_arrive(&mut self, hook: impl Fn(Entity) + Send + Sync + 'static) -> &mut Self {
        self.on_arrive.push(Arc::new(hook));
        self
    }

    pub fn on_departure(&mut self, hook: impl Fn(Entity) + Send + Sync + 'static) -> &mut Self {
        self.on_departure.push(Arc::new(hook));
        self
    }

    /// Синхронно вызвать hooks для `signal` (в порядке регистрации)
    pub fn notify(&self, waypoint: Entity, signal: WaypointSignal) {
        let hooks = match signal {
            WaypointSignal::Arrive => &self.on_arrive,
            WaypointSignal::Depart => &self.on_departure,
        };
        for hook in hooks {
            hook(waypoint);
        }
    }
}

/// Снимок позы waypoint'а (из его Transform)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaypointPose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl From<&Transform> for WaypointPose {
    fn from(transform: &Transform) -> Self {
        Self {
            position: transform.translation,
            orientation: transform.rotation,
        }
    }
}
