//! Tests for curve evaluators.

#[cfg(test)]
mod tests {
    use crate::curve::*;
    use crate::error::TourConfigError;

    #[test]
    fn test_linear_curve_is_identity() {
        let curve = LinearCurve;
        assert_eq!(curve.evaluate(0.0), 0.0);
        assert_eq!(curve.evaluate(0.75), 0.75);
        // Вне [0, 1] - без clamp
        assert_eq!(curve.evaluate(1.5), 1.5);
        assert_eq!(curve.evaluate(-0.25), -0.25);
    }

    #[test]
    fn test_closure_is_a_curve() {
        let doubled: SharedCurve = shared(|t: f32| t * 2.0);
        assert_eq!(doubled.evaluate(0.5), 1.0);
    }

    #[test]
    fn test_constant_curve() {
        let curve = ConstantCurve(12.0);
        assert_eq!(curve.evaluate(0.0), 12.0);
        assert_eq!(curve.evaluate(100.0), 12.0);
    }

    #[test]
    fn test_keyframe_linear_matches_segment() {
        let curve = KeyframeCurve::linear(0.0, 0.0, 1.0, 1.0).expect("finite keys");
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert!((curve.evaluate(t) - t).abs() < 1e-5, "t = {}", t);
        }
    }

    #[test]
    fn test_keyframe_clamps_outside_domain() {
        let curve = KeyframeCurve::linear(0.0, 2.0, 1.0, 4.0).expect("finite keys");
        assert_eq!(curve.evaluate(-3.0), 2.0);
        assert_eq!(curve.evaluate(7.0), 4.0);
        assert_eq!(curve.evaluate(f32::NAN), 2.0);
        assert_eq!(curve.domain(), (0.0, 1.0));
    }

    #[test]
    fn test_keyframe_ease_in_out_shape() {
        let curve = KeyframeCurve::ease_in_out(0.0, 0.0, 1.0, 1.0).expect("finite keys");

        assert_eq!(curve.evaluate(0.0), 0.0);
        assert_eq!(curve.evaluate(1.0), 1.0);
        assert!((curve.evaluate(0.5) - 0.5).abs() < 1e-5);

        // Медленнее линейной в начале, быстрее в конце
        assert!(curve.evaluate(0.1) < 0.1);
        assert!(curve.evaluate(0.9) > 0.9);

        // Монотонна и остаётся в [0, 1]
        let mut previous = 0.0;
        for i in 1..=100 {
            let value = curve.evaluate(i as f32 / 100.0);
            assert!(value >= previous);
            assert!((0.0..=1.0).contains(&value));
            previous = value;
        }
    }

    #[test]
    fn test_keyframe_swapped_endpoints_are_sorted() {
        let curve = KeyframeCurve::linear(1.0, 10.0, 0.0, 0.0).expect("finite keys");
        assert_eq!(curve.keys()[0].time, 0.0);
        assert!((curve.evaluate(0.5) - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_keyframe_rejects_invalid_keys() {
        assert!(matches!(KeyframeCurve::new(vec![]), Err(TourConfigError::Curve(_))));

        let duplicate = vec![Keyframe::new(0.5, 1.0), Keyframe::new(0.5, 2.0)];
        assert!(matches!(KeyframeCurve::new(duplicate), Err(TourConfigError::Curve(_))));

        let nan = vec![Keyframe::new(0.0, f32::NAN)];
        assert_eq!(
            KeyframeCurve::new(nan),
            Err(TourConfigError::NotFinite { field: "keyframe" })
        );
    }

    #[test]
    fn test_keyframe_constructors_reject_non_finite_input() {
        assert_eq!(
            KeyframeCurve::linear(f32::NAN, 0.0, 1.0, 1.0),
            Err(TourConfigError::NotFinite { field: "keyframe" })
        );
        assert!(KeyframeCurve::ease_in_out(0.0, f32::INFINITY, 1.0, 1.0).is_err());
        assert!(KeyframeCurve::linear(0.0, 0.0, f32::NEG_INFINITY, 1.0).is_err());
    }

    #[test]
    fn test_keyframe_constructor_with_equal_times_is_single_key() {
        let curve = KeyframeCurve::ease_in_out(0.5, 1.0, 0.5, 3.0).expect("finite keys");
        assert_eq!(curve.keys().len(), 1);
        assert_eq!(curve.evaluate(0.0), 3.0);
    }

    #[test]
    fn test_keyframe_curve_from_json() {
        let json = r#"[
            { "time": 1.0, "value": 30.0 },
            { "time": 0.0, "value": 0.0, "out_tangent": 90.0 },
            { "time": 0.5, "value": 45.0 }
        ]"#;

        let curve: KeyframeCurve = serde_json::from_str(json).expect("valid keyframes");
        assert_eq!(curve.keys().len(), 3);
        assert_eq!(curve.evaluate(0.5), 45.0);
        assert_eq!(curve.evaluate(2.0), 30.0);

        let invalid = r#"[ { "time": 0.0, "value": 1.0 }, { "time": 0.0, "value": 2.0 } ]"#;
        assert!(serde_json::from_str::<KeyframeCurve>(invalid).is_err());
    }
}
