//! The three additive dose terms. Each is a pure function of its arguments.
//!
//! None of these bound their result; the absolute dose range is enforced once,
//! on the combined total, by `safety::clamp_to_bounds`.

use crate::config::TREND_ADJUSTMENT_COEFFICIENT;
use crate::error::{DoseError, Result, ensure_finite};

fn positive_param(name: &str, v: f64) -> Result<f64> {
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(DoseError::InvalidConfiguration(format!(
            "{name} must be > 0, got {v}"
        )))
    }
}

/// Units needed to bring `current_bg` down to `target_bg`.
///
/// Exactly 0 at or below target; never negative.
pub fn correction_dose(current_bg: f64, target_bg: f64, sensitivity_factor: f64) -> Result<f64> {
    let isf = positive_param("insulin_sensitivity_factor", sensitivity_factor)?;
    let bg = ensure_finite("current_bg", current_bg)?;
    let target = ensure_finite("target_bg", target_bg)?;
    if bg <= target {
        return Ok(0.0);
    }
    Ok(((bg - target) / isf).max(0.0))
}

/// Units covering `carbs_grams` of carbohydrate.
///
/// Negative carbohydrate is refused rather than read as a dose reduction.
pub fn meal_dose(carbs_grams: f64, carb_ratio: f64) -> Result<f64> {
    let ratio = positive_param("insulin_to_carb_ratio", carb_ratio)?;
    let carbs = ensure_finite("carbs", carbs_grams)?;
    if carbs < 0.0 {
        return Err(DoseError::InvalidInput(format!(
            "carbs must be >= 0 g, got {carbs}"
        )));
    }
    Ok(carbs / ratio)
}

/// The trend term alone: `clamp(bg_trend, ±max_rate) * coefficient`.
pub fn trend_term(bg_trend: f64, max_rate: f64, coefficient: f64) -> Result<f64> {
    let trend = ensure_finite("bg_trend", bg_trend)?;
    if !(max_rate.is_finite() && max_rate >= 0.0) {
        return Err(DoseError::InvalidConfiguration(format!(
            "max_bg_rate_change must be >= 0, got {max_rate}"
        )));
    }
    if !(coefficient.is_finite() && coefficient >= 0.0) {
        return Err(DoseError::InvalidConfiguration(format!(
            "trend adjustment coefficient must be >= 0, got {coefficient}"
        )));
    }
    Ok(trend.clamp(-max_rate, max_rate) * coefficient)
}

/// `base_dose` shifted by the trend term with an explicit coefficient. Unclamped.
pub fn trend_adjustment_with(
    base_dose: f64,
    bg_trend: f64,
    max_rate: f64,
    coefficient: f64,
) -> Result<f64> {
    let base = ensure_finite("base_dose", base_dose)?;
    Ok(base + trend_term(bg_trend, max_rate, coefficient)?)
}

/// `base_dose` shifted by the trend term using `TREND_ADJUSTMENT_COEFFICIENT`. Unclamped.
pub fn trend_adjustment(base_dose: f64, bg_trend: f64, max_rate: f64) -> Result<f64> {
    trend_adjustment_with(base_dose, bg_trend, max_rate, TREND_ADJUSTMENT_COEFFICIENT)
}
