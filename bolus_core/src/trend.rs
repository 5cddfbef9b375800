//! Glucose rate of change from a CGM history.

use chrono::{DateTime, Duration, Utc};

use crate::error::{DoseError, Result};
use crate::types::{GlucoseReading, TrendSnapshot};

const MS_PER_MINUTE: f64 = 60_000.0;

/// Rate in mg/dL/min across `window_min` minutes ending at `now`.
///
/// `sorted` must be ordered oldest first. Uses the first and last readings
/// inside the window; fewer than two readings, or two at the same instant,
/// give 0.
fn window_rate(sorted: &[GlucoseReading], now: DateTime<Utc>, window_min: i64) -> f64 {
    let cutoff = now - Duration::minutes(window_min);
    let start = sorted.partition_point(|r| r.timestamp < cutoff);
    let recent = &sorted[start..];
    let (Some(first), Some(last)) = (recent.first(), recent.last()) else {
        return 0.0;
    };
    if recent.len() < 2 {
        return 0.0;
    }
    let span_min =
        last.timestamp.signed_duration_since(first.timestamp).num_milliseconds() as f64
            / MS_PER_MINUTE;
    if span_min > 0.0 {
        (last.value - first.value) / span_min
    } else {
        0.0
    }
}

/// Compute 5, 15 and 30 minute trends at `now`.
///
/// Readings may arrive in any order and duplicates by timestamp are allowed;
/// the slice is copied and sorted, never mutated.
pub fn trend_snapshot(readings: &[GlucoseReading], now: DateTime<Utc>) -> Result<TrendSnapshot> {
    for (idx, r) in readings.iter().enumerate() {
        if !(r.value.is_finite() && r.value >= 0.0) {
            return Err(DoseError::InvalidInput(format!(
                "reading #{idx} has invalid glucose {}",
                r.value
            )));
        }
        if r.timestamp > now {
            return Err(DoseError::InvalidTimestamp(format!(
                "reading #{idx} at {} is after now ({now})",
                r.timestamp
            )));
        }
    }
    if readings.len() < 2 {
        return Ok(TrendSnapshot::default());
    }

    let mut sorted = readings.to_vec();
    sorted.sort_by_key(|r| r.timestamp);

    let snap = TrendSnapshot {
        rate_5min: window_rate(&sorted, now, 5),
        rate_15min: window_rate(&sorted, now, 15),
        rate_30min: window_rate(&sorted, now, 30),
    };
    tracing::debug!(
        rate_5min = snap.rate_5min,
        rate_15min = snap.rate_15min,
        rate_30min = snap.rate_30min,
        readings = readings.len(),
        "glucose trend"
    );
    Ok(snap)
}
