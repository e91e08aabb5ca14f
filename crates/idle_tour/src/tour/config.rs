//! Конфигурация тура: TourSettings (plain data, serde) → TourConfig (validated)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::curve::{shared, KeyframeCurve, SharedCurve};
use crate::error::TourConfigError;

pub const MOVE_DURATION_RANGE: (f32, f32) = (0.1, 100.0);
pub const ROTATION_DURATION_RANGE: (f32, f32) = (1.0, 1000.0);
pub const ARRIVAL_THRESHOLD_RANGE: (f32, f32) = (0.0, 100.0);
pub const ALIGNMENT_ANGLE_RANGE: (f32, f32) = (0.5, 10.0);

/// На что смотрит traveler в face-target режиме
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Reflect)]
pub enum HeadingReference {
    /// На target waypoint текущего leg'а
    Target,
    /// На первый successor target'а (если его нет - на сам target)
    #[default]
    TargetSuccessor,
}

/// Числовые параметры тура (загружаются из JSON, валидируются в TourConfig)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct TourSettings {
    /// Бюджет translation leg'а (секунды); превышение = abandon leg'а
    pub move_duration: f32,
    /// Масштаб аргумента rotation кривой (секунды)
    pub rotation_duration: f32,
    /// Дистанция, на которой leg считается завершённым
    pub arrival_threshold: f32,
    /// Угол (градусы), ниже которого alignment считается завершённым
    pub alignment_angle_threshold: f32,
    /// Aligning перед translation + leveling перед вращением
    pub face_target: bool,
    pub heading_reference: HeadingReference,
}

impl Default for TourSettings {
    fn default() -> Self {
        Self {
            move_duration: 2.0,
            rotation_duration: 30.0,
            arrival_threshold: 1.0,
            alignment_angle_threshold: 1.0,
            face_target: false,
            heading_reference: HeadingReference::TargetSuccessor,
        }
    }
}

impl TourSettings {
    pub fn from_json(json: &str) -> Result<Self, TourConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Range checks (без silent clamp)
    pub fn validate(&self) -> Result<(), TourConfigError> {
        check_range("move_duration", self.move_duration, MOVE_DURATION_RANGE)?;
        check_range("rotation_duration", self.rotation_duration, ROTATION_DURATION_RANGE)?;
        check_range("arrival_threshold", self.arrival_threshold, ARRIVAL_THRESHOLD_RANGE)?;
        check_range(
            "alignment_angle_threshold",
            self.alignment_angle_threshold,
            ALIGNMENT_ANGLE_RANGE,
        )?;
        Ok(())
    }
}

fn check_range(field: &'static str, value: f32, (min, max): (f32, f32)) -> Result<(), TourConfigError> {
    if !value.is_finite() {
        return Err(TourConfigError::NotFinite { field });
    }
    if value < min || value > max {
        return Err(TourConfigError::OutOfRange { field, value, min, max });
    }
    Ok(())
}

/// Immutable, validated конфигурация одного controller'а
#[derive(Clone)]
pub struct TourConfig {
    settings: TourSettings,
    default_waypoint: Option<Entity>,
    translation_curve: SharedCurve,
    rotation_curve: SharedCurve,
}

impl std::fmt::Debug for TourConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TourConfig")
            .field("settings", &self.settings)
            .field("default_waypoint", &self.default_waypoint)
            .finish_non_exhaustive()
    }
}

impl TourConfig {
    pub fn new(
        settings: TourSettings,
        translation_curve: SharedCurve,
        rotation_curve: SharedCurve,
    ) -> Result<Self, TourConfigError> {
        settings.validate()?;
        Ok(Self {
            settings,
            default_waypoint: None,
            translation_curve,
            rotation_curve,
        })
    }

    /// Fallback waypoint, когда у текущего нет successor'а
    pub fn with_default_waypoint(mut self, waypoint: Option<Entity>) -> Self {
        self.default_waypoint = waypoint;
        self
    }

    pub fn settings(&self) -> &TourSettings {
        &self.settings
    }

    pub fn move_duration(&self) -> f32 {
        self.settings.move_duration
    }

    pub fn rotation_duration(&self) -> f32 {
        self.settings.rotation_duration
    }

    pub fn arrival_threshold(&self) -> f32 {
        self.settings.arrival_threshold
    }

    pub fn alignment_angle_threshold(&self) -> f32 {
        self.settings.alignment_angle_threshold
    }

    pub fn face_target(&self) -> bool {
        self.settings.face_target
    }

    pub fn heading_reference(&self) -> HeadingReference {
        self.settings.heading_reference
    }

    pub fn default_waypoint(&self) -> Option<Entity> {
        self.default_waypoint
    }

    pub fn translation_curve(&self) -> &SharedCurve {
        &self.translation_curve
    }

    pub fn rotation_curve(&self) -> &SharedCurve {
        &self.rotation_curve
    }
}

/// Полный профиль тура из одного JSON документа: settings + обе кривые
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourProfile {
    #[serde(default)]
    pub settings: TourSettings,
    pub translation_curve: KeyframeCurve,
    pub rotation_curve: KeyframeCurve,
}

impl Default for TourProfile {
    fn default() -> Self {
        Self {
            settings: TourSettings::default(),
            translation_curve: KeyframeCurve::unit_ease_in_out(0.0, 1.0),
            // ~0.5°/tick на старте, разгон до 2°/tick к концу rotation_duration
            rotation_curve: KeyframeCurve::unit_ease_in_out(0.5, 2.0),
        }
    }
}

impl TourProfile {
    pub fn from_json(json: &str) -> Result<Self, TourConfigError> {
        let profile: Self = serde_json::from_str(json)?;
        profile.settings.validate()?;
        Ok(profile)
    }

    pub fn into_config(self) -> Result<TourConfig, TourConfigError> {
        TourConfig::new(
            self.settings,
            shared(self.translation_curve),
            shared(self.rotation_curve),
        )
    }
}
