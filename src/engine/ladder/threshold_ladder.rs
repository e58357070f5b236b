use crate::engine::errors::ConfigError;
use crate::engine::types::Sample;
use std::time::Duration;

/// One warning level: a fraction of total memory and how long usage must
/// stay at or above it before a warning may fire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdTier {
    pub fraction: f64,
    pub min_sustained: Duration,
}

impl ThresholdTier {
    pub fn new(fraction: f64, min_sustained: Duration) -> Self {
        Self {
            fraction,
            min_sustained,
        }
    }
}

/// Result of comparing one sample against the ladder.
#[derive(Debug, Clone, PartialEq)]
pub struct LadderEvaluation {
    /// Group memory counted toward the ladder, after idle exclusion.
    pub counted_memory: u64,
    pub usage_fraction: f64,
    /// `exceeded[i]` is true iff usage is at or above tier `i`.
    pub exceeded: Vec<bool>,
}

/// Tiers ordered by strictly decreasing fraction.
#[derive(Debug, Clone)]
pub struct ThresholdLadder {
    tiers: Vec<ThresholdTier>,
    exclude_idle: bool,
}

impl ThresholdLadder {
    /// Rejects empty ladders, fractions outside (0, 1] and tiers that are not
    /// strictly decreasing. Order is precedence, so it is never repaired.
    pub fn new(tiers: Vec<ThresholdTier>, exclude_idle: bool) -> Result<Self, ConfigError> {
        if tiers.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one threshold tier is required".to_string(),
            ));
        }
        for (i, tier) in tiers.iter().enumerate() {
            if !(tier.fraction > 0.0 && tier.fraction <= 1.0) {
                return Err(ConfigError::Invalid(format!(
                    "tier {} fraction {} is outside (0, 1]",
                    i, tier.fraction
                )));
            }
        }
        for (i, pair) in tiers.windows(2).enumerate() {
            if pair[1].fraction >= pair[0].fraction {
                return Err(ConfigError::Invalid(format!(
                    "tiers must be strictly decreasing by fraction: tier {} ({}) follows tier {} ({})",
                    i + 1,
                    pair[1].fraction,
                    i,
                    pair[0].fraction
                )));
            }
        }
        Ok(Self {
            tiers,
            exclude_idle,
        })
    }

    pub fn tiers(&self) -> &[ThresholdTier] {
        &self.tiers
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn excludes_idle(&self) -> bool {
        self.exclude_idle
    }

    /// Group memory that counts toward the ladder for this sample.
    pub fn counted_memory(&self, sample: &Sample) -> u64 {
        if self.exclude_idle {
            sample
                .process_group_memory
                .saturating_sub(sample.idle_memory())
        } else {
            sample.process_group_memory
        }
    }

    pub fn evaluate(&self, sample: &Sample) -> LadderEvaluation {
        let counted_memory = self.counted_memory(sample);
        let usage_fraction = sample.fraction_of_total(counted_memory);
        let exceeded = self
            .tiers
            .iter()
            .map(|tier| usage_fraction >= tier.fraction)
            .collect();
        LadderEvaluation {
            counted_memory,
            usage_fraction,
            exceeded,
        }
    }
}
