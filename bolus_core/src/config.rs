//! Runtime configuration for the dosing engine.
//!
//! These are the validated structs the calculators read. They are separate
//! from the TOML-deserialized config in `bolus_config`; see `conversions`.
//! A `DosingConfig` can only be obtained through `DosingConfig::builder()`
//! (or `TryFrom<&bolus_config::Config>`), so every instance has passed
//! validation exactly once and is immutable afterwards.

use crate::builder::DosingConfigBuilder;

/// Units of insulin added per mg/dL/min of clamped glucose trend.
///
/// Empirically tuned; carried as the default of `TrendCfg::adjustment_coefficient`.
pub const TREND_ADJUSTMENT_COEFFICIENT: f64 = 0.5;

/// Absolute bounds applied to every dose the engine exposes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafetyCfg {
    /// Lowest dose ever recommended (units).
    pub min_insulin_dose: f64,
    /// Highest dose ever recommended (units).
    pub max_insulin_dose: f64,
    /// Glucose trends beyond ±this (mg/dL per minute) are treated as this.
    pub max_bg_rate_change: f64,
}

impl Default for SafetyCfg {
    fn default() -> Self {
        Self {
            min_insulin_dose: 0.0,
            max_insulin_dose: 15.0,
            max_bg_rate_change: 3.0,
        }
    }
}

/// Personal dosing parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileCfg {
    /// mg/dL dropped by one unit.
    pub insulin_sensitivity_factor: f64,
    /// Grams of carbohydrate covered by one unit.
    pub insulin_to_carb_ratio: f64,
    /// Insulin action duration in hours.
    pub insulin_duration_h: f64,
    /// Glucose the correction term aims for (mg/dL).
    pub target_bg: f64,
}

impl Default for ProfileCfg {
    fn default() -> Self {
        Self {
            insulin_sensitivity_factor: 50.0,
            insulin_to_carb_ratio: 10.0,
            insulin_duration_h: 3.0,
            target_bg: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendCfg {
    pub adjustment_coefficient: f64,
}

impl Default for TrendCfg {
    fn default() -> Self {
        Self {
            adjustment_coefficient: TREND_ADJUSTMENT_COEFFICIENT,
        }
    }
}

/// Validated, read-only configuration for one dosing session.
#[derive(Debug, Clone, PartialEq)]
pub struct DosingConfig {
    pub(crate) safety: SafetyCfg,
    pub(crate) profile: ProfileCfg,
    pub(crate) trend: TrendCfg,
}

impl DosingConfig {
    /// Start building a config.
    pub fn builder() -> DosingConfigBuilder {
        DosingConfigBuilder::default()
    }

    pub fn safety(&self) -> &SafetyCfg {
        &self.safety
    }

    pub fn profile(&self) -> &ProfileCfg {
        &self.profile
    }

    pub fn trend(&self) -> &TrendCfg {
        &self.trend
    }
}
