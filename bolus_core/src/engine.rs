//! `DoseEngine`: a configured facade over the estimator, calculators and clamp.

use std::sync::Arc;

use bolus_traits::{DosePredictor, GlucoseSource, PredictionFeatures};
use chrono::{DateTime, Datelike, Duration, Timelike, Utc};

use crate::config::DosingConfig;
use crate::error::{DoseError, Result, ensure_finite};
use crate::iob::estimate_iob;
use crate::predictor::PredictorAdapter;
use crate::safety::recommend_dose;
use crate::source_error::map_source_error;
use crate::trend::trend_snapshot;
use crate::types::{
    DoseAssessment, DoseRecommendation, GlucoseReading, InsulinAdministration, TrendSnapshot,
};

/// Longest trend window; how far back a glucose source is queried.
const TREND_LOOKBACK_MIN: i64 = 30;

/// Everything one dose request needs.
#[derive(Debug, Clone, Copy)]
pub struct DoseInputs<'a> {
    /// mg/dL
    pub current_bg: f64,
    /// grams
    pub carbs: f64,
    /// mg/dL/min; when `None` the 5-minute rate from `readings` is used.
    pub bg_trend: Option<f64>,
    /// Overrides the profile target when set.
    pub target_bg: Option<f64>,
    /// Sorted oldest first.
    pub history: &'a [InsulinAdministration],
    pub readings: &'a [GlucoseReading],
    pub now: DateTime<Utc>,
}

/// Stateless across calls; clones share one configuration.
#[derive(Debug, Clone)]
pub struct DoseEngine {
    config: Arc<DosingConfig>,
}

impl DoseEngine {
    pub fn new(config: DosingConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &DosingConfig {
        &self.config
    }

    /// Recommend a dose against the profile target.
    pub fn recommend(
        &self,
        current_bg: f64,
        carbs: f64,
        bg_trend: f64,
    ) -> Result<DoseRecommendation> {
        recommend_dose(
            current_bg,
            self.config.profile().target_bg,
            carbs,
            bg_trend,
            &self.config,
        )
    }

    pub fn insulin_on_board(
        &self,
        history: &[InsulinAdministration],
        now: DateTime<Utc>,
    ) -> Result<f64> {
        estimate_iob(history, now, self.config.profile().insulin_duration_h)
    }

    pub fn trend(&self, readings: &[GlucoseReading], now: DateTime<Utc>) -> Result<TrendSnapshot> {
        trend_snapshot(readings, now)
    }

    /// IOB, trend and a computed recommendation for one request.
    pub fn assess(&self, inputs: &DoseInputs<'_>) -> Result<DoseAssessment> {
        let insulin_on_board = self.insulin_on_board(inputs.history, inputs.now)?;
        let trend = self.trend(inputs.readings, inputs.now)?;
        let bg_trend = inputs.bg_trend.unwrap_or(trend.rate_5min);
        let target = inputs.target_bg.unwrap_or(self.config.profile().target_bg);
        let recommendation = recommend_dose(
            inputs.current_bg,
            target,
            inputs.carbs,
            bg_trend,
            &self.config,
        )?;
        tracing::info!(
            current_bg = inputs.current_bg,
            carbs = inputs.carbs,
            bg_trend,
            iob = insulin_on_board,
            dose = recommendation.clamped_total,
            clamped = recommendation.clamped,
            "dose assessed"
        );
        Ok(DoseAssessment {
            recommendation,
            insulin_on_board,
            trend,
            bg_trend,
        })
    }

    /// Pull the current reading and recent history from `source`, then assess.
    pub fn assess_from_source(
        &self,
        source: &mut dyn GlucoseSource,
        carbs: f64,
        history: &[InsulinAdministration],
        now: DateTime<Utc>,
    ) -> Result<DoseAssessment> {
        let (current_bg, at) = source
            .current_reading()
            .map_err(|e| map_source_error(e.as_ref()))?;
        if at > now {
            return Err(DoseError::InvalidTimestamp(format!(
                "current reading at {at} is after now ({now})"
            )));
        }
        let readings: Vec<GlucoseReading> = source
            .readings_since(now - Duration::minutes(TREND_LOOKBACK_MIN))
            .map_err(|e| map_source_error(e.as_ref()))?
            .into_iter()
            .map(|(value, timestamp)| GlucoseReading { value, timestamp })
            .collect();
        self.assess(&DoseInputs {
            current_bg,
            carbs,
            bg_trend: None,
            target_bg: None,
            history,
            readings: &readings,
            now,
        })
    }

    /// Feature record for a learned predictor.
    pub fn features(
        &self,
        inputs: &DoseInputs<'_>,
        insulin_on_board: f64,
        trend: &TrendSnapshot,
    ) -> PredictionFeatures {
        PredictionFeatures {
            current_bg: inputs.current_bg,
            trend_5min: trend.rate_5min,
            trend_15min: trend.rate_15min,
            trend_30min: trend.rate_30min,
            carbs: inputs.carbs,
            active_insulin: insulin_on_board,
            hour_of_day: inputs.now.hour(),
            day_of_week: inputs.now.weekday().num_days_from_monday(),
        }
    }

    /// Assess with a learned predictor in place of the calculators.
    ///
    /// Inputs are validated as for `assess`; the suggestion is clamped.
    pub fn assess_learned<P: DosePredictor>(
        &self,
        predictor: &PredictorAdapter<P>,
        inputs: &DoseInputs<'_>,
    ) -> Result<DoseAssessment> {
        let current_bg = ensure_finite("current_bg", inputs.current_bg)?;
        if current_bg < 0.0 {
            return Err(DoseError::InvalidInput(format!(
                "current_bg must be >= 0 mg/dL, got {current_bg}"
            )));
        }
        let carbs = ensure_finite("carbs", inputs.carbs)?;
        if carbs < 0.0 {
            return Err(DoseError::InvalidInput(format!(
                "carbs must be >= 0 g, got {carbs}"
            )));
        }
        let insulin_on_board = self.insulin_on_board(inputs.history, inputs.now)?;
        let trend = self.trend(inputs.readings, inputs.now)?;
        let bg_trend = match inputs.bg_trend {
            Some(t) => ensure_finite("bg_trend", t)?,
            None => trend.rate_5min,
        };
        let mut features = self.features(inputs, insulin_on_board, &trend);
        features.trend_5min = bg_trend;
        let recommendation = predictor.suggest(&features, &self.config)?;
        tracing::info!(
            raw = recommendation.raw_total,
            dose = recommendation.clamped_total,
            clamped = recommendation.clamped,
            "learned dose assessed"
        );
        Ok(DoseAssessment {
            recommendation,
            insulin_on_board,
            trend,
            bg_trend,
        })
    }
}
