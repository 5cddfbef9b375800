//! Insulin-on-board estimation.
//!
//! Each bolus decays as `dose * exp(-t / (duration / 2))`, with `t` in hours
//! since administration, and stops counting once `t > duration`. The curve is
//! a fixed modelling convention, not a pharmacokinetic fit; results must stay
//! reproducible across versions.

use chrono::{DateTime, Utc};

use crate::error::{DoseError, Result};
use crate::types::InsulinAdministration;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Fraction of a bolus still active `elapsed_h` hours after it was given.
///
/// Zero once `elapsed_h` exceeds `duration_h`.
#[inline]
pub fn remaining_fraction(elapsed_h: f64, duration_h: f64) -> f64 {
    if elapsed_h > duration_h {
        0.0
    } else {
        (-elapsed_h / (duration_h / 2.0)).exp()
    }
}

/// Hours from `then` to `now`; negative if `then` is in the future.
#[inline]
pub(crate) fn hours_between(then: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    now.signed_duration_since(then).num_milliseconds() as f64 / MS_PER_HOUR
}

/// Active insulin at `now` from an administration log sorted oldest first.
///
/// The whole log must be ordered by timestamp and end no later than `now`;
/// otherwise the look-back cut-off could skip active entries, so either case
/// is refused as `InvalidTimestamp`. The sum itself walks newest first and
/// stops at the first entry older than `duration_h`; doses beyond the action
/// window are never read.
pub fn estimate_iob(
    history: &[InsulinAdministration],
    now: DateTime<Utc>,
    duration_h: f64,
) -> Result<f64> {
    if !(duration_h.is_finite() && duration_h > 0.0) {
        return Err(DoseError::InvalidConfiguration(format!(
            "insulin duration must be > 0 hours, got {duration_h}"
        )));
    }
    if let Some(idx) = history
        .windows(2)
        .position(|w| w[1].timestamp < w[0].timestamp)
    {
        return Err(DoseError::InvalidTimestamp(format!(
            "administration log is not sorted oldest first at #{}",
            idx + 1
        )));
    }
    if let Some(last) = history.last()
        && last.timestamp > now
    {
        return Err(DoseError::InvalidTimestamp(format!(
            "administration #{} at {} is after now ({now})",
            history.len() - 1,
            last.timestamp
        )));
    }

    let mut active = 0.0_f64;
    let mut counted = 0_usize;

    for (idx, bolus) in history.iter().enumerate().rev() {
        let elapsed_h = hours_between(bolus.timestamp, now);
        if elapsed_h > duration_h {
            break;
        }
        if !(bolus.dose.is_finite() && bolus.dose >= 0.0) {
            return Err(DoseError::InvalidInput(format!(
                "administration #{idx} has invalid dose {}",
                bolus.dose
            )));
        }
        active += bolus.dose * remaining_fraction(elapsed_h, duration_h);
        counted += 1;
    }

    tracing::debug!(
        iob = active,
        counted,
        history_len = history.len(),
        "insulin on board"
    );
    Ok(active)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_is_one_at_administration() {
        assert_eq!(remaining_fraction(0.0, 3.0), 1.0);
    }

    #[test]
    fn fraction_is_e_inverse_at_half_duration() {
        let f = remaining_fraction(1.5, 3.0);
        assert!((f - (-1.0_f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn fraction_counts_at_exact_duration_and_drops_after() {
        assert!(remaining_fraction(3.0, 3.0) > 0.0);
        assert_eq!(remaining_fraction(3.000_001, 3.0), 0.0);
    }
}
