//! Scene helpers: раскладка waypoint'ов для headless прогона, client'а и тестов

use bevy::prelude::*;
use rand::Rng;

use crate::waypoint::{Waypoint, WaypointRegistry};

/// Точки на кольце вокруг origin со случайным jitter'ом (радиус и высота)
///
/// Детерминирована при одинаковом seed RNG.
pub fn ring_layout(rng: &mut impl Rng, count: usize, radius: f32, jitter: f32) -> Vec<Vec3> {
    let jitter = jitter.max(0.0);

    (0..count)
        .map(|i| {
            let angle = i as f32 / count as f32 * std::f32::consts::TAU;
            let r = radius + rng.gen_range(-jitter..=jitter);
            let height = 2.0 + rng.gen_range(0.0..=jitter);
            Vec3::new(angle.cos() * r, height, angle.sin() * r)
        })
        .collect()
}

/// Спавнит замкнутый маршрут: каждый waypoint ведёт к следующему, последний - к первому
///
/// Все waypoint'ы регистрируются в WaypointRegistry в порядке `positions`.
pub fn spawn_waypoint_loop(world: &mut World, positions: &[Vec3]) -> Vec<Entity> {
    let entities: Vec<Entity> = positions
        .iter()
        .map(|position| world.spawn(Transform::from_translation(*position)).id())
        .collect();

    for (i, &entity) in entities.iter().enumerate() {
        let next = entities[(i + 1) % entities.len()];
        world.entity_mut(entity).insert(Waypoint::leading_to(next));
    }

    let mut registry = world.get_resource_or_insert_with(WaypointRegistry::default);
    for &entity in &entities {
        registry.register(entity);
    }

    entities
}
