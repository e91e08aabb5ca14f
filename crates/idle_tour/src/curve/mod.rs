//! Curve evaluators - progress → rate mapping для translation и rotation
//!
//! Controller не владеет кривой и ничего о ней не знает: вызывает
//! `evaluate(t)` с сырым progress (может выйти за [0, 1]) и использует
//! результат как есть. Clamp/extrapolation - ответственность кривой.

use std::sync::Arc;

pub mod keyframe;

#[cfg(test)]
mod curve_tests;

pub use keyframe::{Keyframe, KeyframeCurve};

/// Opaque progress → rate функция (inject'ится в TourConfig)
pub trait CurveEvaluator: Send + Sync + 'static {
    fn evaluate(&self, t: f32) -> f32;
}

/// Shared handle: одна кривая может обслуживать несколько controller'ов
pub type SharedCurve = Arc<dyn CurveEvaluator>;

/// Любая `Fn(f32) -> f32` - тоже кривая (удобно в тестах и для процедурных кривых)
impl<F> CurveEvaluator for F
where
    F: Fn(f32) -> f32 + Send + Sync + 'static,
{
    fn evaluate(&self, t: f32) -> f32 {
        self(t)
    }
}

pub fn shared(curve: impl CurveEvaluator) -> SharedCurve {
    Arc::new(curve)
}

/// Identity: `evaluate(t) = t`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LinearCurve;

impl CurveEvaluator for LinearCurve {
    fn evaluate(&self, t: f32) -> f32 {
        t
    }
}

/// Константный rate (для rotation: ровно `value` градусов за tick)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantCurve(pub f32);

impl CurveEvaluator for ConstantCurve {
    fn evaluate(&self, _t: f32) -> f32 {
        self.0
    }
}
