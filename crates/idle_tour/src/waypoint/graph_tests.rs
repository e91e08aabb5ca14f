//! Tests for waypoint registry and the ECS graph view.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use bevy::ecs::system::SystemState;
    use bevy::prelude::*;

    use crate::waypoint::*;

    fn spawn_waypoint(world: &mut World, position: Vec3, waypoint: Waypoint) -> Entity {
        let entity = world
            .spawn((waypoint, Transform::from_translation(position)))
            .id();
        world.resource_mut::<WaypointRegistry>().register(entity);
        entity
    }

    fn world_with_registry() -> World {
        let mut world = World::new();
        world.init_resource::<WaypointRegistry>();
        world
    }

    #[test]
    fn test_registry_ignores_duplicates() {
        let mut world = World::new();
        let a = world.spawn_empty().id();

        let mut registry = WaypointRegistry::default();
        assert!(registry.is_empty());
        assert!(registry.register(a));
        assert!(!registry.register(a));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.members(), &[a]);
    }

    #[test]
    fn test_nearest_by_empty_registry_is_none() {
        let registry = WaypointRegistry::default();
        assert_eq!(registry.nearest_by(Vec3::ZERO, |_| Some(Vec3::ZERO)), None);
    }

    #[test]
    fn test_nearest_by_tie_prefers_earliest_registration() {
        let mut world = World::new();
        let first = world.spawn_empty().id();
        let second = world.spawn_empty().id();

        let mut registry = WaypointRegistry::default();
        registry.register(first);
        registry.register(second);

        // Обе точки на дистанции 5 от origin
        let positions = |entity: Entity| {
            if entity == first {
                Some(Vec3::new(5.0, 0.0, 0.0))
            } else {
                Some(Vec3::new(0.0, 0.0, -5.0))
            }
        };
        assert_eq!(registry.nearest_by(Vec3::ZERO, positions), Some(first));
    }

    #[test]
    fn test_nearest_by_skips_unresolved_members() {
        let mut world = World::new();
        let gone = world.spawn_empty().id();
        let alive = world.spawn_empty().id();

        let mut registry = WaypointRegistry::default();
        registry.register(gone);
        registry.register(alive);

        let positions = |entity: Entity| (entity == alive).then_some(Vec3::splat(100.0));
        assert_eq!(registry.nearest_by(Vec3::ZERO, positions), Some(alive));
    }

    #[test]
    fn test_scene_waypoints_nearest_and_successors() {
        let mut world = world_with_registry();
        let b = world.spawn_empty().id();
        let a = spawn_waypoint(&mut world, Vec3::ZERO, Waypoint::with_successors([None, Some(b)]));
        world
            .entity_mut(b)
            .insert((Waypoint::leading_to(a), Transform::from_xyz(10.0, 0.0, 0.0)));
        world.resource_mut::<WaypointRegistry>().register(b);

        let mut state = SystemState::<SceneWaypoints>::new(&mut world);
        let graph = state.get(&world);

        assert_eq!(graph.nearest_to(Vec3::new(1.0, 0.0, 0.0)), Some(a));
        assert_eq!(graph.nearest_to(Vec3::new(8.0, 3.0, 0.0)), Some(b));

        // Sentinel сохраняется как есть
        assert_eq!(graph.successors_of(a), &[None, Some(b)]);
        assert_eq!(graph.successors_of(b), &[Some(a)]);
        assert_eq!(graph.position_of(b), Some(Vec3::new(10.0, 0.0, 0.0)));
    }

    #[test]
    fn test_scene_waypoints_unknown_node() {
        let mut world = world_with_registry();
        let stranger = world.spawn(Transform::default()).id();

        let mut state = SystemState::<SceneWaypoints>::new(&mut world);
        let graph = state.get(&world);

        assert!(graph.successors_of(stranger).is_empty());
        assert_eq!(graph.pose_of(stranger), None);
        assert_eq!(graph.nearest_to(Vec3::ZERO), None);
    }

    #[test]
    fn test_scene_waypoints_despawned_member_stops_resolving() {
        let mut world = world_with_registry();
        let near = spawn_waypoint(&mut world, Vec3::ZERO, Waypoint::new());
        let far = spawn_waypoint(&mut world, Vec3::splat(50.0), Waypoint::new());
        world.despawn(near);

        let mut state = SystemState::<SceneWaypoints>::new(&mut world);
        let graph = state.get(&world);

        assert_eq!(graph.registry().len(), 2);
        assert_eq!(graph.nearest_to(Vec3::ZERO), Some(far));
    }

    #[test]
    fn test_hooks_fire_in_registration_order() {
        let mut world = world_with_registry();
        let calls = Arc::new(AtomicUsize::new(0));

        let mut waypoint = Waypoint::new();
        let first = Arc::clone(&calls);
        let second = Arc::clone(&calls);
        waypoint
            .on_arrive(move |_| {
                // Первый hook видит 0 вызовов до себя
                assert_eq!(first.fetch_add(1, Ordering::SeqCst), 0);
            })
            .on_arrive(move |_| {
                assert_eq!(second.fetch_add(1, Ordering::SeqCst), 1);
            });
        let departures = Arc::new(AtomicUsize::new(0));
        let departures_hook = Arc::clone(&departures);
        waypoint.on_departure(move |_| {
            departures_hook.fetch_add(1, Ordering::SeqCst);
        });
        let entity = spawn_waypoint(&mut world, Vec3::ZERO, waypoint);

        let mut state = SystemState::<SceneWaypoints>::new(&mut world);
        let graph = state.get(&world);

        graph.notify(entity, WaypointSignal::Arrive);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(departures.load(Ordering::SeqCst), 0);

        graph.notify(entity, WaypointSignal::Depart);
        assert_eq!(departures.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_add_successor_deduplicates() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();

        let mut waypoint = Waypoint::leading_to(a);
        assert!(!waypoint.add_successor(a));
        assert!(waypoint.add_successor(b));
        assert_eq!(waypoint.successors(), &[Some(a), Some(b)]);
    }

    #[test]
    fn test_reachable_targets_swap_with_successors() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        let c = world.spawn_empty().id();

        let mut waypoint = Waypoint::with_successors([Some(a), None]);
        assert!(waypoint.reachable_targets().is_empty());
        waypoint.set_reachable_targets([b, c]);
        assert_eq!(waypoint.reachable_targets(), &[b, c]);

        waypoint.swap_route();
        assert_eq!(waypoint.successors(), &[Some(b), Some(c)]);
        // None sentinel не переносится
        assert_eq!(waypoint.reachable_targets(), &[a]);
    }
}
