//! Idle Tour Core
//!
//! Ambient camera tour на Bevy ECS: traveler (обычно камера) ездит по графу
//! waypoint'ов, плавно интерполируя позицию по авторской кривой и делая
//! полный оборот на каждой остановке.
//!
//! - curve: inject'ируемые progress → rate кривые
//! - waypoint: узлы, registry и read-only граф для controller'а
//! - tour: FSM controller + ECS системы и events

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod curve;
pub mod error;
pub mod logger;
pub mod scene;
pub mod tour;
pub mod waypoint;

// Re-export основных типов для удобства
pub use curve::{shared, ConstantCurve, CurveEvaluator, Keyframe, KeyframeCurve, LinearCurve, SharedCurve};
pub use error::{TourConfigError, TourError};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, log_with_level, set_log_level, set_logger,
    set_logger_if_needed, ConsoleLogger, LogLevel, LogPrinter,
};
pub use tour::{
    HeadingReference, LegAbandoned, TourCommand, TourConfig, TourController, TourPhase, TourPlugin,
    TourProfile, TourSet, TourSettings, TourSignal, TourStats, WaypointArrived, WaypointDeparted,
};
pub use waypoint::{
    SceneWaypoints, Waypoint, WaypointGraph, WaypointHook, WaypointPose, WaypointRegistry,
    WaypointSignal,
};

/// Частота simulation tick'а в headless режиме
pub const TICK_HZ: f64 = 60.0;

/// Главный plugin тура (registry + tour системы)
pub struct IdleTourPlugin;

impl Plugin for IdleTourPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WaypointRegistry>()
            .add_plugins(TourPlugin);
    }
}

/// Детерминистичный RNG resource (seeded) - раскладка waypoint'ов
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless тура
///
/// Время шагает вручную: каждый `app.update()` = ровно один FixedUpdate tick
/// (первый update только стартует часы).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();

    let step = Duration::from_secs_f64(1.0 / TICK_HZ);
    app.add_plugins(MinimalPlugins)
        .add_plugins(IdleTourPlugin)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_duration(step))
        .insert_resource(TimeUpdateStrategy::ManualDuration(step));

    app
}

/// Snapshot всех компонентов `T` в байтах (для проверки детерминизма)
///
/// Порядок по Entity index, формат через Debug.
pub fn world_snapshot<T: Component + std::fmt::Debug>(world: &mut World) -> Vec<u8> {
    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();
    entities.sort_by_key(|(entity, _)| entity.index());

    let mut snapshot = Vec::new();
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }
    snapshot
}
