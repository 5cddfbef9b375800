#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Insulin dose recommendation engine.
//!
//! Pure, synchronous computations over caller-owned data: nothing here does
//! I/O, blocks, or keeps state between calls. CGM access and learned models
//! sit behind the `bolus_traits` seams.
//!
//! ## Architecture
//!
//! - **Configuration**: validated once, immutable afterwards (`config`, `builder`)
//! - **IOB**: exponential decay over the insulin action window (`iob`)
//! - **Trend**: 5/15/30 minute glucose rates from CGM history (`trend`)
//! - **Components**: correction, meal and trend terms (`components`)
//! - **Safety**: combination and the final dose clamp (`safety`)
//! - **Predictor**: clamping of externally suggested doses (`predictor`)
//!
//! ## Safety invariant
//!
//! Every `DoseRecommendation` returned satisfies
//! `min_insulin_dose <= clamped_total <= max_insulin_dose`. Malformed inputs
//! never reach the clamp; they are refused with a `DoseError`.

pub mod builder;
pub mod components;
pub mod config;
pub mod conversions;
pub mod engine;
pub mod error;
pub mod iob;
pub mod predictor;
pub mod safety;
pub mod source_error;
pub mod trend;
pub mod types;

pub use builder::DosingConfigBuilder;
pub use components::{
    correction_dose, meal_dose, trend_adjustment, trend_adjustment_with, trend_term,
};
pub use config::{DosingConfig, ProfileCfg, SafetyCfg, TREND_ADJUSTMENT_COEFFICIENT, TrendCfg};
pub use engine::{DoseEngine, DoseInputs};
pub use error::{BuildError, DoseError, Result};
pub use iob::estimate_iob;
pub use predictor::{PredictorAdapter, clamp_external_suggestion};
pub use safety::{clamp_to_bounds, recommend_dose};
pub use trend::trend_snapshot;
pub use types::{
    DoseAssessment, DoseRecommendation, DoseSource, GlucoseReading, InsulinAdministration,
    TrendSnapshot,
};
