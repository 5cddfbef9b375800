//! Boundary to a learned dose predictor.
//!
//! A predictor's output is opaque: the engine cannot attribute it to
//! correction, meal or trend terms, so those are reported as zero and the raw
//! value is bounded by the same clamp as a computed dose.

use bolus_traits::{DosePredictor, PredictionFeatures};

use crate::config::DosingConfig;
use crate::error::{DoseError, Result};
use crate::safety::clamp_to_bounds;
use crate::source_error::map_source_error;
use crate::types::{DoseRecommendation, DoseSource};

/// Pass an externally suggested dose through the safety clamp.
pub fn clamp_external_suggestion(raw: f64, config: &DosingConfig) -> Result<DoseRecommendation> {
    if !raw.is_finite() {
        return Err(DoseError::InvalidInput(format!(
            "external suggestion must be finite, got {raw}"
        )));
    }
    let (clamped_total, clamped) = clamp_to_bounds(raw, config.safety())?;
    if clamped {
        tracing::warn!(raw, clamped_total, "external suggestion clamped");
    } else {
        tracing::debug!(raw, "external suggestion within bounds");
    }
    Ok(DoseRecommendation {
        correction: 0.0,
        meal: 0.0,
        trend_adjustment: 0.0,
        raw_total: raw,
        clamped_total,
        clamped,
        source: DoseSource::External,
    })
}

/// Wraps a `DosePredictor` so its suggestions are never exposed unclamped.
pub struct PredictorAdapter<P> {
    predictor: P,
}

impl<P: DosePredictor> PredictorAdapter<P> {
    pub fn new(predictor: P) -> Self {
        Self { predictor }
    }

    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    /// Ask the predictor for a dose and bound it.
    pub fn suggest(
        &self,
        features: &PredictionFeatures,
        config: &DosingConfig,
    ) -> Result<DoseRecommendation> {
        let raw = self
            .predictor
            .suggest(features)
            .map_err(|e| map_source_error(e.as_ref()))?;
        clamp_external_suggestion(raw, config)
    }
}
