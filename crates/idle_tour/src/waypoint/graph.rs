//! Waypoint graph: registry (порядок регистрации) + read-only view для controller'а

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::tour::TourController;
use crate::waypoint::{Waypoint, WaypointPose, WaypointSignal};

/// Интерфейс графа, который потребляет TourController
///
/// Реализован для ECS (SceneWaypoints); host без ECS может реализовать свой.
pub trait WaypointGraph {
    /// Ближайший зарегистрированный waypoint (None если граф пуст)
    fn nearest_to(&self, point: Vec3) -> Option<Entity>;

    /// Successors как есть, включая `None` sentinel'ы (пусто для неизвестного node)
    fn successors_of(&self, node: Entity) -> &[Option<Entity>];

    fn pose_of(&self, node: Entity) -> Option<WaypointPose>;

    fn position_of(&self, node: Entity) -> Option<Vec3> {
        self.pose_of(node).map(|pose| pose.position)
    }

    /// Вызвать arrival/departure hooks waypoint'а
    fn notify(&self, node: Entity, signal: WaypointSignal);
}

/// Registry всех waypoint'ов сцены
///
/// Хранит только Entity handles (waypoint'ами владеет сцена): despawned
/// waypoint просто перестаёт резолвиться. Append-only.
#[derive(Resource, Debug, Default, Clone)]
pub struct WaypointRegistry {
    members: Vec<Entity>,
}

impl WaypointRegistry {
    /// Зарегистрировать waypoint; повторная регистрация игнорируется
    pub fn register(&mut self, waypoint: Entity) -> bool {
        if self.members.contains(&waypoint) {
            return false;
        }
        self.members.push(waypoint);
        true
    }

    pub fn members(&self) -> &[Entity] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Линейный поиск ближайшего по евклидовой дистанции
    ///
    /// Ничья → раньше зарегистрированный. Нерезолвящиеся members пропускаются.
    pub fn nearest_by(
        &self,
        point: Vec3,
        position_of: impl Fn(Entity) -> Option<Vec3>,
    ) -> Option<Entity> {
        let mut nearest: Option<(Entity, f32)> = None;

        for &member in &self.members {
            let Some(position) = position_of(member) else {
                continue;
            };
            let distance = point.distance(position);

            match nearest {
                Some((_, best)) if distance >= best => {}
                _ => nearest = Some((member, distance)),
            }
        }

        nearest.map(|(entity, _)| entity)
    }
}

/// ECS view графа: registry + waypoint'ы сцены
///
/// `Without<TourController>` - чтобы не конфликтовать с `&mut Transform` travelers.
#[derive(SystemParam)]
pub struct SceneWaypoints<'w, 's> {
    registry: Res<'w, WaypointRegistry>,
    waypoints: Query<'w, 's, (&'static Waypoint, &'static Transform), Without<TourController>>,
}

impl SceneWaypoints<'_, '_> {
    pub fn registry(&self) -> &WaypointRegistry {
        &self.registry
    }
}

impl WaypointGraph for SceneWaypoints<'_, '_> {
    fn nearest_to(&self, point: Vec3) -> Option<Entity> {
        self.registry.nearest_by(point, |member| {
            self.waypoints
                .get(member)
                .ok()
                .map(|(_, transform)| transform.translation)
        })
    }

    fn successors_of(&self, node: Entity) -> &[Option<Entity>] {
        match self.waypoints.get(node) {
            Ok((waypoint, _)) => waypoint.successors(),
            Err(_) => &[],
        }
    }

    fn pose_of(&self, node: Entity) -> Option<WaypointPose> {
        self.waypoints
            .get(node)
            .ok()
            .map(|(_, transform)| WaypointPose::from(transform))
    }

    fn notify(&self, node: Entity, signal: WaypointSignal) {
        if let Ok((waypoint, _)) = self.waypoints.get(node) {
            waypoint.notify(node, signal);
        }
    }
}
