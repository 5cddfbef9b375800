//! Seams between the dosing engine and its external collaborators.
//!
//! The engine never talks to a CGM or a trained model directly. A glucose
//! source supplies readings, a predictor supplies a raw learned suggestion,
//! and both report failures as boxed errors that the core maps to its own
//! typed error.

pub mod clock;

pub use clock::{Clock, FixedClock, SystemClock};

use chrono::{DateTime, Utc};

/// Boxed error returned across collaborator boundaries.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Supplies CGM samples as `(glucose_mg_dl, timestamp)` pairs.
pub trait GlucoseSource {
    /// Most recent reading.
    fn current_reading(&mut self) -> Result<(f64, DateTime<Utc>), SourceError>;

    /// All readings taken at or after `since`, in any order.
    fn readings_since(
        &mut self,
        since: DateTime<Utc>,
    ) -> Result<Vec<(f64, DateTime<Utc>)>, SourceError>;
}

/// Feature record handed to a learned predictor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionFeatures {
    pub current_bg: f64,
    pub trend_5min: f64,
    pub trend_15min: f64,
    pub trend_30min: f64,
    pub carbs: f64,
    pub active_insulin: f64,
    /// 0..=23
    pub hour_of_day: u32,
    /// 0 = Monday ..= 6 = Sunday
    pub day_of_week: u32,
}

/// Supplies a raw dose suggestion in insulin units. The value is untrusted.
pub trait DosePredictor {
    fn suggest(&self, features: &PredictionFeatures) -> Result<f64, SourceError>;
}
