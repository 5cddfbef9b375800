use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

/// Wall clock abstraction used to stamp "now" for IOB and trend windows.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Real clock backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Deterministic clock pinned to an instant that can be advanced manually.
///
/// Clones share the same instant.
#[derive(Debug, Clone)]
pub struct FixedClock {
    at: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            at: Arc::new(Mutex::new(at)),
        }
    }

    /// Advance the clock by the given duration.
    pub fn advance(&self, d: Duration) {
        if let Ok(mut at) = self.at.lock() {
            *at += d;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        match self.at.lock() {
            Ok(g) => *g,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixed_clock_advances_and_shares_state() {
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let clock = FixedClock::new(t0);
        let other = clock.clone();
        other.advance(Duration::minutes(90));
        assert_eq!(clock.now(), t0 + Duration::minutes(90));
        assert_eq!(other.now(), clock.now());
    }
}
