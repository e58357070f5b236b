use crate::engine::ladder::{LadderEvaluation, ThresholdLadder};
use crate::engine::tracker::tier_state::{TierPhase, TierState};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::debug;

/// What a tier did on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierStatus {
    Normal,
    Waiting { remaining: Duration },
    /// Eligible but warned within the frequency cap.
    Muted,
    /// Eligible and due, but a more severe tier fires this tick.
    Suppressed,
    Firing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerDecision {
    pub statuses: Vec<TierStatus>,
    /// Index of the single tier to dispatch, if any.
    pub fired: Option<usize>,
}

/// Owns one `TierState` per ladder tier and decides which tier fires.
#[derive(Debug, Clone)]
pub struct WarningTracker {
    states: Vec<TierState>,
    warning_cooldown: Duration,
}

impl WarningTracker {
    pub fn new(tier_count: usize, warning_cooldown: Duration) -> Self {
        Self {
            states: vec![TierState::default(); tier_count],
            warning_cooldown,
        }
    }

    pub fn states(&self) -> &[TierState] {
        &self.states
    }

    pub fn state(&self, index: usize) -> Option<&TierState> {
        self.states.get(index)
    }

    pub fn warning_cooldown(&self) -> Duration {
        self.warning_cooldown
    }

    /// Advances every tier's clock with this evaluation and picks the most
    /// severe tier that is eligible and out of cooldown.
    ///
    /// Does not touch `last_warned_at`; call [`record_warning`](Self::record_warning)
    /// once the fired tier has been dispatched.
    pub fn observe(
        &mut self,
        ladder: &ThresholdLadder,
        evaluation: &LadderEvaluation,
        now: DateTime<Utc>,
    ) -> TrackerDecision {
        let mut statuses = Vec::with_capacity(self.states.len());
        let mut fired = None;

        for (index, ((state, tier), exceeded)) in self
            .states
            .iter_mut()
            .zip(ladder.tiers())
            .zip(&evaluation.exceeded)
            .enumerate()
        {
            state.observe(*exceeded, now);

            let status = match state.phase(tier.min_sustained, now) {
                TierPhase::Normal => TierStatus::Normal,
                TierPhase::Waiting => {
                    let so_far = state.exceeded_for(now).unwrap_or_default();
                    TierStatus::Waiting {
                        remaining: tier.min_sustained.saturating_sub(so_far),
                    }
                }
                TierPhase::Eligible if !state.is_due(self.warning_cooldown, now) => {
                    TierStatus::Muted
                }
                TierPhase::Eligible if fired.is_some() => TierStatus::Suppressed,
                TierPhase::Eligible => {
                    fired = Some(index);
                    TierStatus::Firing
                }
            };
            statuses.push(status);
        }

        if let Some(index) = fired {
            debug!(
                target: "mem_monitor::tracker",
                tier = index,
                usage = evaluation.usage_fraction,
                "Tier eligible and due"
            );
        }

        TrackerDecision { statuses, fired }
    }

    /// Starts the frequency cap for `index`. Called whether or not delivery succeeded.
    pub fn record_warning(&mut self, index: usize, now: DateTime<Utc>) {
        if let Some(state) = self.states.get_mut(index) {
            state.last_warned_at = Some(now);
        }
    }
}
