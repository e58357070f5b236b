use crate::shared::time::elapsed;
use chrono::{DateTime, Utc};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierPhase {
    /// Usage is below the threshold.
    Normal,
    /// Above the threshold, sustained duration not yet met.
    Waiting,
    /// Above the threshold long enough to warn.
    Eligible,
}

/// Per-tier clocks. Both start absent; `last_warned_at` is never cleared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierState {
    pub exceeded_since: Option<DateTime<Utc>>,
    pub last_warned_at: Option<DateTime<Utc>>,
}

impl TierState {
    /// Applies one observation. Dropping below resets the sustained clock.
    pub fn observe(&mut self, exceeded: bool, now: DateTime<Utc>) {
        if exceeded {
            self.exceeded_since.get_or_insert(now);
        } else {
            self.exceeded_since = None;
        }
    }

    pub fn phase(&self, min_sustained: Duration, now: DateTime<Utc>) -> TierPhase {
        phase_of(self.exceeded_since, min_sustained, now)
    }

    pub fn is_due(&self, cooldown: Duration, now: DateTime<Utc>) -> bool {
        is_due(self.last_warned_at, cooldown, now)
    }

    pub fn exceeded_for(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.exceeded_since.map(|since| elapsed(since, now))
    }
}

pub(crate) fn phase_of(
    exceeded_since: Option<DateTime<Utc>>,
    min_sustained: Duration,
    now: DateTime<Utc>,
) -> TierPhase {
    match exceeded_since {
        None => TierPhase::Normal,
        Some(since) if elapsed(since, now) >= min_sustained => TierPhase::Eligible,
        Some(_) => TierPhase::Waiting,
    }
}

pub(crate) fn is_due(
    last: Option<DateTime<Utc>>,
    cooldown: Duration,
    now: DateTime<Utc>,
) -> bool {
    match last {
        None => true,
        Some(last) => elapsed(last, now) >= cooldown,
    }
}
