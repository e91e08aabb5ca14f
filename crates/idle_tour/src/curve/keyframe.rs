//! Keyframe кривая (cubic Hermite между ключами)
//!
//! Авторская кривая в духе редакторских animation curves: ключ = (time, value,
//! in/out tangent). Вне authored domain значение clamp'ится к крайним ключам.

use serde::{Deserialize, Serialize};

use crate::curve::CurveEvaluator;
use crate::error::TourConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
    /// Наклон слева от ключа (value per unit time)
    #[serde(default)]
    pub in_tangent: f32,
    /// Наклон справа от ключа
    #[serde(default)]
    pub out_tangent: f32,
}

impl Keyframe {
    pub fn new(time: f32, value: f32) -> Self {
        Self {
            time,
            value,
            in_tangent: 0.0,
            out_tangent: 0.0,
        }
    }

    pub fn with_tangents(mut self, in_tangent: f32, out_tangent: f32) -> Self {
        self.in_tangent = in_tangent;
        self.out_tangent = out_tangent;
        self
    }
}

/// Кривая из отсортированных по времени ключей
///
/// Инвариант: ключи отсортированы, времена уникальны и конечны.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Keyframe>", into = "Vec<Keyframe>")]
pub struct KeyframeCurve {
    keys: Vec<Keyframe>,
}

impl KeyframeCurve {
    pub fn new(mut keys: Vec<Keyframe>) -> Result<Self, TourConfigError> {
        if keys.is_empty() {
            return Err(TourConfigError::Curve("at least one keyframe is required".into()));
        }

        let all_finite = keys.iter().all(|k| {
            k.time.is_finite()
                && k.value.is_finite()
                && k.in_tangent.is_finite()
                && k.out_tangent.is_finite()
        });
        if !all_finite {
            return Err(TourConfigError::NotFinite { field: "keyframe" });
        }

        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        if keys.windows(2).any(|pair| pair[0].time == pair[1].time) {
            return Err(TourConfigError::Curve("duplicate keyframe time".into()));
        }

        Ok(Self { keys })
    }

    /// Прямая через (t0, v0) и (t1, v1); tangents = наклон отрезка
    pub fn linear(t0: f32, v0: f32, t1: f32, v1: f32) -> Result<Self, TourConfigError> {
        Self::new(two_keys(t0, v0, t1, v1, true))
    }

    /// Плавный старт и остановка (нулевые tangents на концах)
    pub fn ease_in_out(t0: f32, v0: f32, t1: f32, v1: f32) -> Result<Self, TourConfigError> {
        Self::new(two_keys(t0, v0, t1, v1, false))
    }

    /// Ease-in-out на [0, 1] для встроенных профилей
    ///
    /// Значения должны быть конечными: ключи не проходят через `new`.
    pub(crate) fn unit_ease_in_out(v0: f32, v1: f32) -> Self {
        Self {
            keys: vec![Keyframe::new(0.0, v0), Keyframe::new(1.0, v1)],
        }
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    /// Authored domain (время первого и последнего ключа)
    pub fn domain(&self) -> (f32, f32) {
        let first = self.keys[0].time;
        let last = self.keys[self.keys.len() - 1].time;
        (first, last)
    }
}

/// Ключи отрезка (t0, v0) → (t1, v1); совпавшие времена дают один ключ
fn two_keys(t0: f32, v0: f32, t1: f32, v1: f32, sloped: bool) -> Vec<Keyframe> {
    if t0 == t1 {
        return vec![Keyframe::new(t0, v1)];
    }

    let slope = if sloped { (v1 - v0) / (t1 - t0) } else { 0.0 };
    vec![
        Keyframe::new(t0, v0).with_tangents(slope, slope),
        Keyframe::new(t1, v1).with_tangents(slope, slope),
    ]
}

impl TryFrom<Vec<Keyframe>> for KeyframeCurve {
    type Error = TourConfigError;

    fn try_from(keys: Vec<Keyframe>) -> Result<Self, Self::Error> {
        Self::new(keys)
    }
}

impl From<KeyframeCurve> for Vec<Keyframe> {
    fn from(curve: KeyframeCurve) -> Self {
        curve.keys
    }
}

impl CurveEvaluator for KeyframeCurve {
    fn evaluate(&self, t: f32) -> f32 {
        let first = self.keys[0];
        let last = self.keys[self.keys.len() - 1];

        // NaN тоже сюда: отдаём первый ключ
        if t.is_nan() || t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        // first.time < t < last.time ⇒ 1 <= idx < len
        let idx = self.keys.partition_point(|k| k.time <= t);
        hermite(&self.keys[idx - 1], &self.keys[idx], t)
    }
}

fn hermite(a: &Keyframe, b: &Keyframe, t: f32) -> f32 {
    let dt = b.time - a.time;
    let s = (t - a.time) / dt;
    let s2 = s * s;
    let s3 = s2 * s;

    let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
    let h10 = s3 - 2.0 * s2 + s;
    let h01 = -2.0 * s3 + 3.0 * s2;
    let h11 = s3 - s2;

    h00 * a.value + h10 * dt * a.out_tangent + h01 * b.value + h11 * dt * b.in_tangent
}
