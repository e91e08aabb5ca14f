//! Ошибки тура: runtime (TourError) и construction-time (TourConfigError)

use thiserror::Error;

/// Ошибки, которые controller возвращает host'у
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TourError {
    /// Нет ни явного старта, ни зарегистрированных waypoint'ов, ни default
    #[error("no waypoints available: graph is empty and no start or default waypoint is set")]
    NoWaypointsAvailable,

    #[error(transparent)]
    Config(#[from] TourConfigError),
}

/// Ошибки валидации конфигурации (проверяются при конструировании, не clamp'ятся)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TourConfigError {
    #[error("{field} = {value} is outside of [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("keyframe curve: {0}")]
    Curve(String),

    #[error("failed to parse tour settings: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for TourConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
