//! Dose combination and the final safety clamp.
//!
//! Every dose that leaves the engine, computed or external, passes through
//! `clamp_to_bounds`. Invalid inputs are refused before they get here; the
//! clamp only bounds valid but extreme values.

use crate::components::{correction_dose, meal_dose, trend_term};
use crate::config::{DosingConfig, SafetyCfg};
use crate::error::{DoseError, Result, ensure_finite};
use crate::types::{DoseRecommendation, DoseSource};

/// Bound `dose` to `[min_insulin_dose, max_insulin_dose]`.
///
/// Returns the bounded value and whether it differs from `dose`. `+inf` maps
/// to the maximum; NaN is refused.
pub fn clamp_to_bounds(dose: f64, safety: &SafetyCfg) -> Result<(f64, bool)> {
    if dose.is_nan() {
        return Err(DoseError::InvalidInput("dose is NaN".into()));
    }
    let bounded = dose.clamp(safety.min_insulin_dose, safety.max_insulin_dose);
    Ok((bounded, bounded != dose))
}

/// Combine correction, meal and trend terms and clamp the total.
pub fn recommend_dose(
    current_bg: f64,
    target_bg: f64,
    carbs: f64,
    bg_trend: f64,
    config: &DosingConfig,
) -> Result<DoseRecommendation> {
    let current_bg = ensure_finite("current_bg", current_bg)?;
    if current_bg < 0.0 {
        return Err(DoseError::InvalidInput(format!(
            "current_bg must be >= 0 mg/dL, got {current_bg}"
        )));
    }
    let target_bg = ensure_finite("target_bg", target_bg)?;
    if target_bg <= 0.0 {
        return Err(DoseError::InvalidInput(format!(
            "target_bg must be > 0 mg/dL, got {target_bg}"
        )));
    }
    let carbs = ensure_finite("carbs", carbs)?;
    let bg_trend = ensure_finite("bg_trend", bg_trend)?;

    let profile = config.profile();
    let safety = config.safety();

    let correction = correction_dose(current_bg, target_bg, profile.insulin_sensitivity_factor)?;
    let meal = meal_dose(carbs, profile.insulin_to_carb_ratio)?;
    let base = correction + meal;
    let adjustment = trend_term(
        bg_trend,
        safety.max_bg_rate_change,
        config.trend().adjustment_coefficient,
    )?;
    let adjusted = base + adjustment;
    let (clamped_total, clamped) = clamp_to_bounds(adjusted, safety)?;

    tracing::debug!(
        correction,
        meal,
        trend_adjustment = adjustment,
        raw_total = adjusted,
        clamped_total,
        "dose computed"
    );
    if clamped {
        tracing::warn!(
            raw_total = adjusted,
            clamped_total,
            min = safety.min_insulin_dose,
            max = safety.max_insulin_dose,
            "safety clamp engaged"
        );
    }

    Ok(DoseRecommendation {
        correction,
        meal,
        trend_adjustment: adjustment,
        raw_total: adjusted,
        clamped_total,
        clamped,
        source: DoseSource::Calculator,
    })
}
