//! Builder for `DosingConfig`.
//!
//! Safety limits and the patient profile must be supplied explicitly; there
//! is no silent fallback to stock values for either. Trend tuning defaults to
//! `TREND_ADJUSTMENT_COEFFICIENT`.

use crate::config::{DosingConfig, ProfileCfg, SafetyCfg, TrendCfg};
use crate::error::{BuildError, DoseError, Result};

#[derive(Debug, Default, Clone)]
pub struct DosingConfigBuilder {
    safety: Option<SafetyCfg>,
    profile: Option<ProfileCfg>,
    trend: Option<TrendCfg>,
}

impl DosingConfigBuilder {
    pub fn with_safety(mut self, safety: SafetyCfg) -> Self {
        self.safety = Some(safety);
        self
    }

    pub fn with_profile(mut self, profile: ProfileCfg) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn with_trend(mut self, trend: TrendCfg) -> Self {
        self.trend = Some(trend);
        self
    }

    /// Validate and freeze the configuration.
    pub fn build(self) -> Result<DosingConfig> {
        let safety = self.safety.ok_or(BuildError::MissingSafety)?;
        let profile = self.profile.ok_or(BuildError::MissingProfile)?;
        let trend = self.trend.unwrap_or_default();
        validate(&safety, &profile, &trend)?;
        tracing::debug!(
            min_dose = safety.min_insulin_dose,
            max_dose = safety.max_insulin_dose,
            isf = profile.insulin_sensitivity_factor,
            icr = profile.insulin_to_carb_ratio,
            duration_h = profile.insulin_duration_h,
            "dosing config built"
        );
        Ok(DosingConfig {
            safety,
            profile,
            trend,
        })
    }
}

fn invalid(msg: &'static str) -> DoseError {
    BuildError::InvalidConfig(msg).into()
}

/// Single source of truth for the configuration invariants.
fn validate(safety: &SafetyCfg, profile: &ProfileCfg, trend: &TrendCfg) -> Result<()> {
    let all_finite = [
        safety.min_insulin_dose,
        safety.max_insulin_dose,
        safety.max_bg_rate_change,
        profile.insulin_sensitivity_factor,
        profile.insulin_to_carb_ratio,
        profile.insulin_duration_h,
        profile.target_bg,
        trend.adjustment_coefficient,
    ]
    .iter()
    .all(|v| v.is_finite());
    if !all_finite {
        return Err(invalid("all parameters must be finite"));
    }
    if safety.min_insulin_dose < 0.0 {
        return Err(invalid("min_insulin_dose must be >= 0"));
    }
    if safety.min_insulin_dose > safety.max_insulin_dose {
        return Err(invalid("min_insulin_dose must be <= max_insulin_dose"));
    }
    if safety.max_bg_rate_change < 0.0 {
        return Err(invalid("max_bg_rate_change must be >= 0"));
    }
    if profile.insulin_sensitivity_factor <= 0.0 {
        return Err(invalid("insulin_sensitivity_factor must be > 0"));
    }
    if profile.insulin_to_carb_ratio <= 0.0 {
        return Err(invalid("insulin_to_carb_ratio must be > 0"));
    }
    if profile.insulin_duration_h <= 0.0 {
        return Err(invalid("insulin_duration_h must be > 0"));
    }
    if profile.target_bg <= 0.0 {
        return Err(invalid("target_bg must be > 0"));
    }
    if trend.adjustment_coefficient < 0.0 {
        return Err(invalid("adjustment_coefficient must be >= 0"));
    }
    Ok(())
}
