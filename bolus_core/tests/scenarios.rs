use bolus_core::error::DoseError;
use bolus_core::{
    DoseSource, DosingConfig, ProfileCfg, SafetyCfg, correction_dose, meal_dose, recommend_dose,
    trend_adjustment,
};
use rstest::rstest;

fn reference_config() -> DosingConfig {
    DosingConfig::builder()
        .with_safety(SafetyCfg {
            min_insulin_dose: 0.0,
            max_insulin_dose: 15.0,
            max_bg_rate_change: 3.0,
        })
        .with_profile(ProfileCfg {
            insulin_sensitivity_factor: 50.0,
            insulin_to_carb_ratio: 10.0,
            insulin_duration_h: 3.0,
            target_bg: 100.0,
        })
        .build()
        .unwrap()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn correction_only_above_target() {
    let cfg = reference_config();
    let rec = recommend_dose(180.0, 100.0, 0.0, 0.0, &cfg).unwrap();
    assert!(approx(rec.correction, 1.6));
    assert_eq!(rec.meal, 0.0);
    assert_eq!(rec.trend_adjustment, 0.0);
    assert!(approx(rec.clamped_total, 1.6));
    assert!(!rec.clamped);
    assert_eq!(rec.source, DoseSource::Calculator);
}

#[test]
fn meal_only_at_target() {
    let cfg = reference_config();
    let rec = recommend_dose(100.0, 100.0, 60.0, 0.0, &cfg).unwrap();
    assert_eq!(rec.correction, 0.0);
    assert!(approx(rec.meal, 6.0));
    assert!(approx(rec.clamped_total, 6.0));
    assert!(!rec.clamped);
}

#[test]
fn extreme_trend_is_clamped_before_adjustment() {
    let adjusted = trend_adjustment(5.0, 10.0, 3.0).unwrap();
    assert!(approx(adjusted, 6.5));
}

#[test]
fn trend_adjustment_is_not_dose_bounded() {
    // Bounds are the combiner's job; the trend stage may leave the dose range.
    assert!(approx(trend_adjustment(0.5, -3.0, 3.0).unwrap(), -1.0));
    assert!(approx(trend_adjustment(14.0, 3.0, 3.0).unwrap(), 15.5));
}

#[test]
fn high_glucose_with_meal_engages_safety_clamp() {
    let cfg = reference_config();
    let rec = recommend_dose(500.0, 100.0, 100.0, 0.0, &cfg).unwrap();
    assert!(approx(rec.correction, 8.0));
    assert!(approx(rec.meal, 10.0));
    assert!(approx(rec.raw_total, 18.0));
    assert_eq!(rec.clamped_total, 15.0);
    assert!(rec.clamped);
}

#[test]
fn high_glucose_alone_stays_under_max() {
    let cfg = reference_config();
    let rec = recommend_dose(500.0, 100.0, 0.0, 0.0, &cfg).unwrap();
    assert!(approx(rec.clamped_total, 8.0));
    assert!(!rec.clamped);
}

#[test]
fn falling_glucose_below_target_clamps_to_min() {
    let cfg = reference_config();
    let rec = recommend_dose(90.0, 100.0, 0.0, -2.0, &cfg).unwrap();
    assert_eq!(rec.correction, 0.0);
    assert!(approx(rec.trend_adjustment, -1.0));
    assert!(approx(rec.raw_total, -1.0));
    assert_eq!(rec.clamped_total, 0.0);
    assert!(rec.clamped);
}

#[test]
fn negative_carbs_are_refused() {
    let cfg = reference_config();
    let err = recommend_dose(150.0, 100.0, -5.0, 0.0, &cfg).expect_err("must refuse");
    assert!(matches!(err, DoseError::InvalidInput(_)), "{err:?}");
    assert!(matches!(meal_dose(-5.0, 10.0), Err(DoseError::InvalidInput(_))));
}

#[rstest]
#[case(f64::NAN, 0.0, 0.0)]
#[case(f64::INFINITY, 0.0, 0.0)]
#[case(150.0, f64::NAN, 0.0)]
#[case(150.0, f64::INFINITY, 0.0)]
#[case(150.0, 0.0, f64::NAN)]
#[case(150.0, 0.0, f64::NEG_INFINITY)]
#[case(-10.0, 0.0, 0.0)]
fn non_finite_or_impossible_inputs_are_refused(
    #[case] bg: f64,
    #[case] carbs: f64,
    #[case] trend: f64,
) {
    let cfg = reference_config();
    let err = recommend_dose(bg, 100.0, carbs, trend, &cfg).expect_err("must refuse");
    assert!(matches!(err, DoseError::InvalidInput(_)), "{err:?}");
}

#[rstest]
#[case(100.0)]
#[case(99.9)]
#[case(40.0)]
#[case(0.0)]
fn no_correction_at_or_below_target(#[case] bg: f64) {
    assert_eq!(correction_dose(bg, 100.0, 50.0).unwrap(), 0.0);
}

#[rstest]
#[case(0.0)]
#[case(-1.0)]
fn correction_refuses_bad_sensitivity(#[case] isf: f64) {
    let err = correction_dose(180.0, 100.0, isf).expect_err("must refuse");
    assert!(matches!(err, DoseError::InvalidConfiguration(_)));
}

#[test]
fn meal_refuses_bad_ratio() {
    assert!(matches!(
        meal_dose(30.0, 0.0),
        Err(DoseError::InvalidConfiguration(_))
    ));
}

#[test]
fn target_override_changes_correction() {
    let cfg = reference_config();
    let rec = recommend_dose(180.0, 130.0, 0.0, 0.0, &cfg).unwrap();
    assert!(approx(rec.correction, 1.0));
}

#[test]
fn min_dose_floor_applies_to_zero_need() {
    let cfg = DosingConfig::builder()
        .with_safety(SafetyCfg {
            min_insulin_dose: 0.5,
            ..SafetyCfg::default()
        })
        .with_profile(ProfileCfg::default())
        .build()
        .unwrap();
    let rec = recommend_dose(90.0, 100.0, 0.0, 0.0, &cfg).unwrap();
    assert_eq!(rec.raw_total, 0.0);
    assert_eq!(rec.clamped_total, 0.5);
    assert!(rec.clamped);
}
