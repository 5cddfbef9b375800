//! Conversions bridging `bolus_config` types to `bolus_core` types.

use bolus_config::{HistoryEntry, ReadingEntry};

use crate::config::{DosingConfig, ProfileCfg, SafetyCfg, TrendCfg};
use crate::error::DoseError;
use crate::types::{GlucoseReading, InsulinAdministration};

// ── SafetyCfg ────────────────────────────────────────────────────────────────

impl From<&bolus_config::Safety> for SafetyCfg {
    fn from(c: &bolus_config::Safety) -> Self {
        Self {
            min_insulin_dose: c.min_insulin_dose,
            max_insulin_dose: c.max_insulin_dose,
            max_bg_rate_change: c.max_bg_rate_change,
        }
    }
}

// ── ProfileCfg ───────────────────────────────────────────────────────────────

impl From<&bolus_config::Profile> for ProfileCfg {
    fn from(c: &bolus_config::Profile) -> Self {
        Self {
            insulin_sensitivity_factor: c.insulin_sensitivity_factor,
            insulin_to_carb_ratio: c.insulin_to_carb_ratio,
            insulin_duration_h: c.insulin_duration_h,
            target_bg: c.target_bg,
        }
    }
}

// ── TrendCfg ─────────────────────────────────────────────────────────────────

impl From<&bolus_config::Trend> for TrendCfg {
    fn from(c: &bolus_config::Trend) -> Self {
        Self {
            adjustment_coefficient: c.adjustment_coefficient,
        }
    }
}

// ── DosingConfig ─────────────────────────────────────────────────────────────

impl TryFrom<&bolus_config::Config> for DosingConfig {
    type Error = DoseError;
    fn try_from(c: &bolus_config::Config) -> Result<Self, Self::Error> {
        DosingConfig::builder()
            .with_safety((&c.safety).into())
            .with_profile((&c.profile).into())
            .with_trend((&c.trend).into())
            .build()
    }
}

// ── Logs ─────────────────────────────────────────────────────────────────────

impl From<&HistoryEntry> for InsulinAdministration {
    fn from(e: &HistoryEntry) -> Self {
        Self {
            dose: e.dose,
            timestamp: e.timestamp,
        }
    }
}

impl From<&ReadingEntry> for GlucoseReading {
    fn from(e: &ReadingEntry) -> Self {
        Self {
            value: e.glucose,
            timestamp: e.timestamp,
        }
    }
}
