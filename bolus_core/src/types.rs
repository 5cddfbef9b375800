//! Records exchanged with callers. All are plain values; the engine keeps none
//! of them between calls.

use chrono::{DateTime, Utc};

/// One CGM sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlucoseReading {
    /// mg/dL
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

/// A recorded bolus. Never mutated once logged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsulinAdministration {
    /// Units, >= 0.
    pub dose: f64,
    pub timestamp: DateTime<Utc>,
}

/// Glucose rates of change in mg/dL per minute over the trailing 5, 15 and
/// 30 minutes. Recomputed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrendSnapshot {
    pub rate_5min: f64,
    pub rate_15min: f64,
    pub rate_30min: f64,
}

/// Where a recommendation's raw total came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoseSource {
    /// Correction + meal + trend terms computed by the engine.
    Calculator,
    /// Opaque suggestion from an external predictor; component terms are zero.
    External,
}

/// Audit record of one dose computation.
///
/// `clamped_total` always lies within the configured dose bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoseRecommendation {
    pub correction: f64,
    pub meal: f64,
    pub trend_adjustment: f64,
    /// Total before the safety clamp.
    pub raw_total: f64,
    pub clamped_total: f64,
    /// True when the clamp changed `raw_total`.
    pub clamped: bool,
    pub source: DoseSource,
}

/// A recommendation together with the context it was computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoseAssessment {
    pub recommendation: DoseRecommendation,
    /// Active insulin at `now` (units). Reported, not subtracted.
    pub insulin_on_board: f64,
    pub trend: TrendSnapshot,
    /// The rate that fed the trend term.
    pub bg_trend: f64,
}
