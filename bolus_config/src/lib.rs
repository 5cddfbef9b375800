#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema and log parsing for the bolus advisor.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Insulin and CGM log loaders enforce exact CSV headers and RFC 3339
//!   timestamps, reporting the offending row on failure.
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Safety {
    /// Lowest dose ever recommended (units)
    pub min_insulin_dose: f64,
    /// Highest dose ever recommended (units)
    pub max_insulin_dose: f64,
    /// Largest glucose rate of change trusted by the trend term (mg/dL per minute)
    pub max_bg_rate_change: f64,
}

impl Default for Safety {
    fn default() -> Self {
        Self {
            min_insulin_dose: 0.0,
            max_insulin_dose: 15.0,
            max_bg_rate_change: 3.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Profile {
    /// mg/dL dropped per unit
    pub insulin_sensitivity_factor: f64,
    /// grams of carbohydrate covered per unit
    pub insulin_to_carb_ratio: f64,
    /// Insulin action duration in hours. Also accepts "insulin_duration".
    #[serde(alias = "insulin_duration")]
    pub insulin_duration_h: f64,
    pub target_bg: f64,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            insulin_sensitivity_factor: 50.0,
            insulin_to_carb_ratio: 10.0,
            insulin_duration_h: 3.0,
            target_bg: 100.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Trend {
    /// Units added per mg/dL/min of (clamped) trend
    pub adjustment_coefficient: f64,
}

impl Default for Trend {
    fn default() -> Self {
        Self {
            adjustment_coefficient: 0.5,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub safety: Safety,
    pub profile: Profile,
    pub trend: Trend,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse and validate a config file.
pub fn load_file(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {:?}: {}", path, e))?;
    let cfg = load_toml(&text).map_err(|e| eyre::eyre!("parse config {:?}: {}", path, e))?;
    cfg.validate()?;
    Ok(cfg)
}

fn finite(name: &str, v: f64) -> eyre::Result<()> {
    if !v.is_finite() {
        eyre::bail!("{name} must be a finite number");
    }
    Ok(())
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Safety
        let s = &self.safety;
        finite("safety.min_insulin_dose", s.min_insulin_dose)?;
        finite("safety.max_insulin_dose", s.max_insulin_dose)?;
        finite("safety.max_bg_rate_change", s.max_bg_rate_change)?;
        if s.min_insulin_dose < 0.0 {
            eyre::bail!("safety.min_insulin_dose must be >= 0");
        }
        if s.min_insulin_dose > s.max_insulin_dose {
            eyre::bail!("safety.min_insulin_dose must be <= safety.max_insulin_dose");
        }
        if s.max_bg_rate_change < 0.0 {
            eyre::bail!("safety.max_bg_rate_change must be >= 0");
        }

        // Profile
        let p = &self.profile;
        finite("profile.insulin_sensitivity_factor", p.insulin_sensitivity_factor)?;
        finite("profile.insulin_to_carb_ratio", p.insulin_to_carb_ratio)?;
        finite("profile.insulin_duration_h", p.insulin_duration_h)?;
        finite("profile.target_bg", p.target_bg)?;
        if p.insulin_sensitivity_factor <= 0.0 {
            eyre::bail!("profile.insulin_sensitivity_factor must be > 0");
        }
        if p.insulin_to_carb_ratio <= 0.0 {
            eyre::bail!("profile.insulin_to_carb_ratio must be > 0");
        }
        if p.insulin_duration_h <= 0.0 {
            eyre::bail!("profile.insulin_duration_h must be > 0");
        }
        if p.insulin_duration_h > 24.0 {
            eyre::bail!("profile.insulin_duration_h is unreasonably large (>24h)");
        }
        if p.target_bg <= 0.0 {
            eyre::bail!("profile.target_bg must be > 0");
        }

        // Trend
        let t = &self.trend;
        finite("trend.adjustment_coefficient", t.adjustment_coefficient)?;
        if t.adjustment_coefficient < 0.0 {
            eyre::bail!("trend.adjustment_coefficient must be >= 0");
        }

        // Logging
        if let Some(r) = self.logging.rotation.as_deref()
            && !matches!(r, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got {r:?}");
        }

        Ok(())
    }
}

/// One row of an insulin administration log.
///
/// Expected headers:
/// timestamp,dose
///
/// Example:
/// timestamp,dose
/// 2024-03-01T07:30:00Z,4.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub dose: f64,
}

/// One row of a CGM export.
///
/// Expected headers:
/// timestamp,glucose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadingEntry {
    pub timestamp: DateTime<Utc>,
    pub glucose: f64,
}

#[derive(Debug, Deserialize)]
struct RawRow {
    timestamp: String,
    value: f64,
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s.trim()).map(|t| t.with_timezone(&Utc))
}

/// Read a two-column CSV whose headers must be exactly `timestamp,<value_header>`.
fn load_timestamped_csv(
    path: &Path,
    value_header: &str,
) -> eyre::Result<Vec<(DateTime<Utc>, f64)>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != ["timestamp", value_header] {
        eyre::bail!(
            "CSV {:?} must have headers 'timestamp,{}', got: {}",
            path,
            value_header,
            actual.join(",")
        );
    }
    // Field names differ per file; deserialize positionally.
    rdr.set_headers(csv::StringRecord::from(vec!["timestamp", "value"]));

    let mut out = Vec::new();
    for (idx, rec) in rdr.deserialize::<RawRow>().enumerate() {
        let row = rec.map_err(|e| eyre::eyre!("invalid CSV row {}: {}", idx + 2, e))?;
        let ts = parse_timestamp(&row.timestamp).map_err(|e| {
            eyre::eyre!(
                "invalid CSV row {}: bad timestamp {:?}: {}",
                idx + 2,
                row.timestamp,
                e
            )
        })?;
        out.push((ts, row.value));
    }
    Ok(out)
}

/// Load an insulin administration log (`timestamp,dose`).
pub fn load_history_csv(path: &Path) -> eyre::Result<Vec<HistoryEntry>> {
    Ok(load_timestamped_csv(path, "dose")?
        .into_iter()
        .map(|(timestamp, dose)| HistoryEntry { timestamp, dose })
        .collect())
}

/// Load a CGM export (`timestamp,glucose`).
pub fn load_readings_csv(path: &Path) -> eyre::Result<Vec<ReadingEntry>> {
    Ok(load_timestamped_csv(path, "glucose")?
        .into_iter()
        .map(|(timestamp, glucose)| ReadingEntry { timestamp, glucose })
        .collect())
}
