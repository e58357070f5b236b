use crate::engine::errors::ConfigError;
use crate::engine::tracker::TierPhase;
use crate::engine::tracker::tier_state::{is_due, phase_of};
use crate::engine::types::Sample;
use crate::shared::time::elapsed;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// System-wide critical threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalPolicy {
    pub fraction: f64,
    pub min_sustained: Duration,
    /// Set when termination is active: system usage at or above which the
    /// executor is invoked.
    pub terminate_fraction: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CriticalState {
    pub exceeded_since: Option<DateTime<Utc>>,
    pub last_action_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriticalStatus {
    Normal,
    Waiting { remaining: Duration },
    Muted,
    Firing { terminate: bool },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalDecision {
    pub usage_fraction: f64,
    pub status: CriticalStatus,
    pub exceeded_for: Duration,
}

impl CriticalDecision {
    pub fn fires(&self) -> bool {
        matches!(self.status, CriticalStatus::Firing { .. })
    }
}

/// Watches system used/total independently of the process-group ladder.
#[derive(Debug, Clone)]
pub struct CriticalMonitor {
    policy: CriticalPolicy,
    cooldown: Duration,
    state: CriticalState,
}

impl CriticalMonitor {
    pub fn new(policy: CriticalPolicy, cooldown: Duration) -> Result<Self, ConfigError> {
        check_fraction("critical fraction", policy.fraction)?;
        if let Some(fraction) = policy.terminate_fraction {
            check_fraction("terminate fraction", fraction)?;
        }
        Ok(Self {
            policy,
            cooldown,
            state: CriticalState::default(),
        })
    }

    pub fn policy(&self) -> &CriticalPolicy {
        &self.policy
    }

    pub fn state(&self) -> &CriticalState {
        &self.state
    }

    pub fn observe(&mut self, sample: &Sample, now: DateTime<Utc>) -> CriticalDecision {
        let usage_fraction = sample.system_fraction();
        if usage_fraction >= self.policy.fraction {
            self.state.exceeded_since.get_or_insert(now);
        } else {
            self.state.exceeded_since = None;
        }

        let exceeded_for = self
            .state
            .exceeded_since
            .map(|since| elapsed(since, now))
            .unwrap_or_default();

        let status = match phase_of(self.state.exceeded_since, self.policy.min_sustained, now) {
            TierPhase::Normal => CriticalStatus::Normal,
            TierPhase::Waiting => CriticalStatus::Waiting {
                remaining: self.policy.min_sustained.saturating_sub(exceeded_for),
            },
            TierPhase::Eligible if !is_due(self.state.last_action_at, self.cooldown, now) => {
                CriticalStatus::Muted
            }
            TierPhase::Eligible => CriticalStatus::Firing {
                terminate: self
                    .policy
                    .terminate_fraction
                    .is_some_and(|f| usage_fraction >= f),
            },
        };

        CriticalDecision {
            usage_fraction,
            status,
            exceeded_for,
        }
    }

    /// Starts the frequency cap. Advances even when delivery or termination failed.
    pub fn record_action(&mut self, now: DateTime<Utc>) {
        self.state.last_action_at = Some(now);
    }
}

fn check_fraction(name: &str, fraction: f64) -> Result<(), ConfigError> {
    if fraction > 0.0 && fraction <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{name} {fraction} is outside (0, 1]"
        )))
    }
}
