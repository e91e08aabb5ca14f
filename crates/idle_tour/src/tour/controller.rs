//! TourController - FSM движения одного traveler'а по waypoint графу
//!
//! Цикл фаз:
//! SeekingSuccessor → (Aligning) → Translating → Rotating → SeekingSuccessor
//!
//! - SeekingSuccessor: берём successors[0] текущего waypoint'а, иначе default
//! - Aligning: только face-target режим, доворот к desired heading до старта
//! - Translating: lerp(origin, target, curve(move_time / move_duration))
//! - Rotating: (leveling в face-target режиме) + полный оборот вокруг up оси
//!
//! Controller не знает про ECS: получает `&mut Transform` и граф через trait.
//! ECS обвязка - в `tour::systems`.

use bevy::prelude::*;

use crate::curve::CurveEvaluator;
use crate::error::TourError;
use crate::tour::config::{HeadingReference, TourConfig, TourProfile};
use crate::waypoint::{WaypointGraph, WaypointSignal};

/// Один полный оборот на каждой остановке (градусы)
pub const FULL_REVOLUTION_DEGREES: f32 = 360.0;
/// Leveling считается завершённым ниже этого угла (градусы)
pub const LEVEL_ANGLE_THRESHOLD_DEGREES: f32 = 0.5;
/// Blend factor leveling'а за tick = LEVEL_BLEND_RATE × dt
pub const LEVEL_BLEND_RATE: f32 = 2.0;

/// Фаза FSM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum TourPhase {
    /// Нет активного leg'а - ищем следующий waypoint
    #[default]
    SeekingSuccessor,
    /// Доворот к desired heading (position стоит на месте)
    Aligning,
    /// Движение к target waypoint по translation кривой
    Translating,
    /// Leveling + полный оборот на месте
    Rotating,
}

/// Что произошло с traveler'ом (outbox для ECS events)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourSignal {
    Departed(Entity),
    Arrived(Entity),
    LegAbandoned(Entity),
}

/// Счётчики для диагностики (timeouts = признак кривой/дистанции не в ладах с duration)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub struct TourStats {
    pub legs_started: u32,
    pub arrivals: u32,
    pub revolutions: u32,
    pub timeouts: u32,
}

/// Controller idle-тура (camera или любой другой traveler)
///
/// Инвариант: `current_waypoint` == None только до первой успешной инициализации
/// (или после неудачной); в этом состоянии tick ничего не пишет.
#[derive(Component, Debug, Clone)]
pub struct TourController {
    config: TourConfig,
    start_waypoint: Option<Entity>,
    enabled: bool,

    current: Option<Entity>,
    phase: TourPhase,

    // Per-leg state (сбрасывается в begin_leg)
    origin: Vec3,
    move_time: f32,
    rotation_time: f32,
    remaining_rotation: f32,
    aligned: bool,
    leveled: bool,
    desired_heading: Option<Quat>,
    look_target: Option<Entity>,

    idle_reported: bool,
    stats: TourStats,
    signals: Vec<TourSignal>,
}

impl TourController {
    pub fn new(config: TourConfig) -> Self {
        Self {
            config,
            start_waypoint: None,
            enabled: true,
            current: None,
            phase: TourPhase::SeekingSuccessor,
            origin: Vec3::ZERO,
            move_time: 0.0,
            rotation_time: 0.0,
            remaining_rotation: FULL_REVOLUTION_DEGREES,
            aligned: false,
            leveled: false,
            desired_heading: None,
            look_target: None,
            idle_reported: false,
            stats: TourStats::default(),
            signals: Vec::new(),
        }
    }

    /// Controller из профиля (settings + кривые, обычно из JSON)
    pub fn from_profile(profile: TourProfile) -> Result<Self, TourError> {
        Ok(Self::new(profile.into_config()?))
    }

    /// Явный стартовый waypoint (ECS initialize система передаёт его в `initialize`)
    pub fn with_start_waypoint(mut self, start: Entity) -> Self {
        self.start_waypoint = Some(start);
        self
    }

    /// Резолвит стартовый waypoint: явный → ближайший → default
    ///
    /// Despawned start/default считаются отсутствующими.
    /// Переводит controller в SeekingSuccessor с этим waypoint'ом как текущим.
    /// При неудаче controller остаётся неинициализированным.
    pub fn initialize<G: WaypointGraph + ?Sized>(
        &mut self,
        start: Option<Entity>,
        position: Vec3,
        graph: &G,
    ) -> Result<Entity, TourError> {
        let resolves = |waypoint: &Entity| graph.position_of(*waypoint).is_some();
        let explicit = start.filter(resolves);
        if start.is_some() && explicit.is_none() {
            crate::log_warning(&format!(
                "⚠️ Tour: start waypoint {:?} no longer resolves, falling back to nearest",
                start
            ));
        }

        let resolved = explicit
            .or_else(|| graph.nearest_to(position))
            .or_else(|| self.config.default_waypoint().filter(resolves));

        self.reset_leg(position);
        self.phase = TourPhase::SeekingSuccessor;
        self.desired_heading = None;
        self.look_target = None;
        self.idle_reported = false;

        let Some(waypoint) = resolved else {
            self.current = None;
            crate::log_error("Tour: no start waypoint, graph is empty and no default is set");
            return Err(TourError::NoWaypointsAvailable);
        };

        self.current = Some(waypoint);
        if explicit.is_none() {
            crate::log_info(&format!("Tour: no usable start waypoint, using {:?}", waypoint));
        } else {
            crate::log_info(&format!("Tour: starting at {:?}", waypoint));
        }
        Ok(waypoint)
    }

    /// Один шаг FSM
    ///
    /// Переходы SeekingSuccessor → leg и Aligning → Translating продолжаются в
    /// том же tick'е; вход в Rotating и выход из него - со следующего.
    pub fn tick<G: WaypointGraph + ?Sized>(&mut self, dt: f32, pose: &mut Transform, graph: &G) {
        self.signals.clear();

        if !self.is_active() {
            return;
        }

        if self.phase == TourPhase::SeekingSuccessor && !self.seek_successor(pose, graph) {
            return;
        }

        if self.phase == TourPhase::Aligning && !self.align(dt, pose) {
            return;
        }

        match self.phase {
            TourPhase::Translating => self.translate(dt, pose, graph),
            TourPhase::Rotating => self.rotate(dt, pose),
            TourPhase::SeekingSuccessor | TourPhase::Aligning => {}
        }
    }

    /// Принудительно начать leg к `target` (redirect снаружи)
    pub fn set_waypoint<G: WaypointGraph + ?Sized>(
        &mut self,
        target: Entity,
        pose: &Transform,
        graph: &G,
    ) {
        self.begin_leg(target, pose, graph);
    }

    /// Заморозить controller на месте (состояние сохраняется)
    pub fn on_disable(&mut self) {
        if !self.enabled {
            return;
        }
        self.enabled = false;
        crate::log_info("Tour: disabled");
    }

    /// Включить заново: прерванный leg не продолжается, ближайший waypoint
    /// резолвится с нуля
    pub fn on_enable<G: WaypointGraph + ?Sized>(
        &mut self,
        position: Vec3,
        graph: &G,
    ) -> Result<Entity, TourError> {
        if self.enabled {
            if let Some(current) = self.current {
                return Ok(current);
            }
        }

        self.enabled = true;
        crate::log_info("Tour: enabled");
        self.initialize(None, position, graph)
    }

    // === Phases ===

    fn seek_successor<G: WaypointGraph + ?Sized>(&mut self, pose: &Transform, graph: &G) -> bool {
        let Some(current) = self.current else {
            return false;
        };

        let successor = first_resolved_successor(current, graph);
        let target = successor.or_else(|| {
            self.config
                .default_waypoint()
                .filter(|fallback| graph.position_of(*fallback).is_some())
        });

        match target {
            Some(target) => {
                self.begin_leg(target, pose, graph);
                true
            }
            None => {
                if !self.idle_reported {
                    self.idle_reported = true;
                    crate::log_warning(&format!(
                        "⏸️ Tour: waypoint {:?} has no successor and no default waypoint, idling",
                        current
                    ));
                }
                false
            }
        }
    }

    fn begin_leg<G: WaypointGraph + ?Sized>(&mut self, target: Entity, pose: &Transform, graph: &G) {
        let departing = self.current;

        self.reset_leg(pose.translation);
        self.current = Some(target);
        self.idle_reported = false;
        self.stats.legs_started += 1;

        if self.config.face_target() {
            let reference = match self.config.heading_reference() {
                HeadingReference::Target => target,
                HeadingReference::TargetSuccessor => {
                    first_resolved_successor(target, graph).unwrap_or(target)
                }
            };
            let heading = graph
                .position_of(reference)
                .map(|point| look_rotation(pose.translation, point, pose.rotation))
                .unwrap_or(pose.rotation);

            self.look_target = Some(reference);
            self.desired_heading = Some(heading);
            self.phase = TourPhase::Aligning;
        } else {
            self.look_target = None;
            self.desired_heading = None;
            self.phase = TourPhase::Translating;
        }

        crate::log(&format!("🚶 Tour: leg {:?} → {:?}", departing, target));

        // Hooks видят уже полностью сброшенное состояние нового leg'а
        if let Some(departing) = departing {
            graph.notify(departing, WaypointSignal::Depart);
            self.signals.push(TourSignal::Departed(departing));
        }
    }

    /// true - выровнялись, можно двигаться в этом же tick'е
    fn align(&mut self, dt: f32, pose: &mut Transform) -> bool {
        let desired = self.desired_heading.unwrap_or(pose.rotation);
        pose.rotation = pose.rotation.slerp(desired, blend(dt));

        if pose.rotation.angle_between(desired) < self.config.alignment_angle_threshold().to_radians() {
            self.aligned = true;
            self.phase = TourPhase::Translating;
            return true;
        }
        false
    }

    fn translate<G: WaypointGraph + ?Sized>(&mut self, dt: f32, pose: &mut Transform, graph: &G) {
        let Some(target) = self.current else {
            return;
        };
        let Some(target_position) = graph.position_of(target) else {
            self.abandon_leg(target, "target waypoint no longer resolves");
            return;
        };

        let move_duration = self.config.move_duration();
        if self.move_time > move_duration {
            self.stats.timeouts += 1;
            self.abandon_leg(
                target,
                &format!(
                    "no arrival within {:.2}s (distance left {:.2})",
                    move_duration,
                    pose.translation.distance(target_position)
                ),
            );
            return;
        }

        self.move_time += dt;
        let progress = self
            .config
            .translation_curve()
            .evaluate(self.move_time / move_duration);
        // Без clamp: overshoot кривой воспроизводится как есть
        pose.translation = self.origin.lerp(target_position, progress);

        if pose.translation.distance(target_position) <= self.config.arrival_threshold() {
            self.phase = TourPhase::Rotating;
            self.stats.arrivals += 1;
            crate::log(&format!("📍 Tour: arrived at {:?}", target));
            graph.notify(target, WaypointSignal::Arrive);
            self.signals.push(TourSignal::Arrived(target));
        }
    }

    fn rotate(&mut self, dt: f32, pose: &mut Transform) {
        if self.config.face_target() && !self.leveled {
            let level = yaw_only(pose.rotation);
            pose.rotation = pose.rotation.slerp(level, blend(LEVEL_BLEND_RATE * dt));

            let level = yaw_only(pose.rotation);
            if pose.rotation.angle_between(level) >= LEVEL_ANGLE_THRESHOLD_DEGREES.to_radians() {
                return;
            }
            pose.rotation = level;
            self.leveled = true;
        }

        let rate = self
            .config
            .rotation_curve()
            .evaluate(self.rotation_time / self.config.rotation_duration());
        pose.rotate_local_y(rate.to_radians());
        self.rotation_time += dt;
        self.remaining_rotation -= rate;

        if self.remaining_rotation <= 0.0 {
            self.phase = TourPhase::SeekingSuccessor;
            self.stats.revolutions += 1;
        }
    }

    fn abandon_leg(&mut self, target: Entity, reason: &str) {
        crate::log_warning(&format!("⚠️ Tour: leg to {:?} abandoned: {}", target, reason));
        self.phase = TourPhase::SeekingSuccessor;
        self.signals.push(TourSignal::LegAbandoned(target));
    }

    fn reset_leg(&mut self, origin: Vec3) {
        self.origin = origin;
        self.move_time = 0.0;
        self.rotation_time = 0.0;
        self.remaining_rotation = FULL_REVOLUTION_DEGREES;
        self.aligned = false;
        self.leveled = false;
    }

    // === Readouts ===

    pub fn config(&self) -> &TourConfig {
        &self.config
    }

    pub fn start_waypoint(&self) -> Option<Entity> {
        self.start_waypoint
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_initialized(&self) -> bool {
        self.current.is_some()
    }

    /// Enabled и инициализирован - tick что-то делает
    pub fn is_active(&self) -> bool {
        self.enabled && self.current.is_some()
    }

    pub fn phase(&self) -> TourPhase {
        self.phase
    }

    pub fn current_waypoint(&self) -> Option<Entity> {
        self.current
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn move_time(&self) -> f32 {
        self.move_time
    }

    pub fn rotation_time(&self) -> f32 {
        self.rotation_time
    }

    pub fn remaining_rotation(&self) -> f32 {
        self.remaining_rotation
    }

    pub fn is_aligned(&self) -> bool {
        self.aligned
    }

    pub fn is_leveled(&self) -> bool {
        self.leveled
    }

    /// Heading текущего leg'а (только face-target режим)
    pub fn desired_heading(&self) -> Option<Quat> {
        self.desired_heading
    }

    /// Куда смотрим в текущем leg'е (для debug отрисовки)
    pub fn look_target(&self) -> Option<Entity> {
        self.look_target
    }

    pub fn stats(&self) -> TourStats {
        self.stats
    }

    /// Signals с начала последнего tick'а (+ set_waypoint после него)
    pub fn signals(&self) -> &[TourSignal] {
        &self.signals
    }

    pub fn drain_signals(&mut self) -> std::vec::Drain<'_, TourSignal> {
        self.signals.drain(..)
    }
}

/// successors[0], если он есть и резолвится в графе
fn first_resolved_successor<G: WaypointGraph + ?Sized>(node: Entity, graph: &G) -> Option<Entity> {
    graph
        .successors_of(node)
        .first()
        .copied()
        .flatten()
        .filter(|next| graph.position_of(*next).is_some())
}

/// Slerp blend factor clamp'ится в [0, 1] (dt > 1s = сразу в цель)
fn blend(factor: f32) -> f32 {
    factor.clamp(0.0, 1.0)
}

/// Ориентация "смотрим из `from` на `to`" (Bevy: forward = -Z)
fn look_rotation(from: Vec3, to: Vec3, fallback: Quat) -> Quat {
    if (to - from).length_squared() <= f32::EPSILON {
        return fallback;
    }
    Transform::from_translation(from).looking_at(to, Vec3::Y).rotation
}

/// Только yaw (pitch/roll обнулены)
pub fn yaw_only(rotation: Quat) -> Quat {
    let (yaw, _pitch, _roll) = rotation.to_euler(EulerRot::YXZ);
    Quat::from_rotation_y(yaw)
}
