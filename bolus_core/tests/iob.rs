use bolus_core::error::DoseError;
use bolus_core::{InsulinAdministration, estimate_iob};
use chrono::{DateTime, Duration, TimeZone, Utc};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

fn bolus(dose: f64, minutes_ago: i64) -> InsulinAdministration {
    InsulinAdministration {
        dose,
        timestamp: t0() - Duration::minutes(minutes_ago),
    }
}

#[test]
fn empty_history_has_no_insulin_on_board() {
    assert_eq!(estimate_iob(&[], t0(), 3.0).unwrap(), 0.0);
}

#[test]
fn fresh_bolus_counts_in_full() {
    let iob = estimate_iob(&[bolus(4.0, 0)], t0(), 3.0).unwrap();
    assert_eq!(iob, 4.0);
}

#[test]
fn half_duration_leaves_one_over_e() {
    let iob = estimate_iob(&[bolus(4.0, 90)], t0(), 3.0).unwrap();
    assert!((iob - 4.0 * (-1.0_f64).exp()).abs() < 1e-12);
}

#[test]
fn boluses_add_up() {
    let history = [bolus(2.0, 150), bolus(3.0, 60), bolus(1.0, 10)];
    let expected: f64 = [(2.0_f64, 2.5_f64), (3.0, 1.0), (1.0, 10.0 / 60.0)]
        .iter()
        .map(|(d, h)| d * (-h / 1.5_f64).exp())
        .sum();
    let iob = estimate_iob(&history, t0(), 3.0).unwrap();
    assert!((iob - expected).abs() < 1e-12);
}

#[test]
fn expired_boluses_contribute_nothing() {
    let history = [bolus(50.0, 181), bolus(100.0, 600)];
    assert_eq!(estimate_iob(&history, t0(), 3.0).unwrap(), 0.0);
}

#[test]
fn bolus_at_exact_duration_still_counts() {
    let iob = estimate_iob(&[bolus(1.0, 180)], t0(), 3.0).unwrap();
    assert!((iob - (-2.0_f64).exp()).abs() < 1e-12);
}

#[test]
fn doses_beyond_the_window_are_not_read() {
    // Only timestamps are checked outside the action window.
    let history = [bolus(f64::NAN, 2_000), bolus(2.0, 30)];
    let iob = estimate_iob(&history, t0(), 3.0).unwrap();
    assert!((iob - 2.0 * (-0.5_f64 / 1.5).exp()).abs() < 1e-12);
}

#[test]
fn future_administration_is_refused() {
    let future = InsulinAdministration {
        dose: 1.0,
        timestamp: t0() + Duration::minutes(5),
    };
    let err = estimate_iob(&[bolus(1.0, 30), future], t0(), 3.0).expect_err("future");
    assert!(matches!(err, DoseError::InvalidTimestamp(_)), "{err:?}");
}

#[test]
fn unsorted_history_within_window_is_refused() {
    let history = [bolus(1.0, 10), bolus(1.0, 60)];
    let err = estimate_iob(&history, t0(), 3.0).expect_err("unsorted");
    assert!(matches!(err, DoseError::InvalidTimestamp(_)), "{err:?}");
}

#[test]
fn duplicate_timestamps_are_allowed() {
    let history = [bolus(1.0, 30), bolus(2.0, 30)];
    let iob = estimate_iob(&history, t0(), 3.0).unwrap();
    assert!((iob - 3.0 * (-0.5_f64 / 1.5).exp()).abs() < 1e-12);
}

#[test]
fn negative_or_non_finite_dose_is_refused() {
    for dose in [-1.0, f64::NAN, f64::INFINITY] {
        let err = estimate_iob(&[bolus(dose, 30)], t0(), 3.0).expect_err("bad dose");
        assert!(matches!(err, DoseError::InvalidInput(_)), "{err:?}");
    }
}

#[test]
fn non_positive_duration_is_a_configuration_error() {
    for d in [0.0, -3.0, f64::NAN] {
        let err = estimate_iob(&[], t0(), d).expect_err("bad duration");
        assert!(matches!(err, DoseError::InvalidConfiguration(_)), "{err:?}");
    }
}

#[test]
fn unsorted_history_behind_an_expired_tail_is_refused() {
    // An active bolus logged before an expired one must not be skipped.
    let history = [bolus(4.0, 60), bolus(1.0, 300)];
    let err = estimate_iob(&history, t0(), 3.0).expect_err("unsorted");
    assert!(matches!(err, DoseError::InvalidTimestamp(_)), "{err:?}");
}

#[test]
fn future_administration_behind_an_expired_tail_is_refused() {
    let future = InsulinAdministration {
        dose: 4.0,
        timestamp: t0() + Duration::minutes(60),
    };
    let err = estimate_iob(&[future, bolus(1.0, 300)], t0(), 3.0).expect_err("future");
    assert!(matches!(err, DoseError::InvalidTimestamp(_)), "{err:?}");
}
