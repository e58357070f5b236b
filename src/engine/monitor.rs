use crate::engine::critical::{
    CriticalActionExecutor, CriticalDecision, CriticalMonitor, CriticalState, CriticalStatus,
    TerminationOutcome,
};
use crate::engine::errors::{ConfigError, MonitorError, SamplerError};
use crate::engine::ladder::{LadderEvaluation, ThresholdLadder};
use crate::engine::tracker::{TierStatus, WarningTracker};
use crate::engine::types::{Sample, as_gib};
use crate::notify::{Delivery, Dispatcher, WarningContext};
use crate::sampler::Sampler;
use crate::shared::config::MonitorConfig;
use crate::shared::time::{format_hours, format_local};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// What one tick observed and did.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    pub usage_fraction: f64,
    pub statuses: Vec<TierStatus>,
    pub warned_tier: Option<usize>,
    pub warning_delivery: Option<Delivery>,
    pub critical: CriticalDecision,
    pub critical_delivery: Option<Delivery>,
    pub termination: Option<TerminationOutcome>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickReport {
    /// No usable sample; no state was touched.
    Skipped,
    Evaluated(TickSummary),
}

/// Owns every piece of cross-tick state. One instance per process, driven by
/// the scheduler loop.
pub struct Monitor {
    ladder: ThresholdLadder,
    tracker: WarningTracker,
    critical: CriticalMonitor,
    sampler: Box<dyn Sampler>,
    dispatcher: Dispatcher,
    executor: Option<Box<dyn CriticalActionExecutor>>,
}

impl Monitor {
    pub fn new(
        config: &MonitorConfig,
        sampler: Box<dyn Sampler>,
        dispatcher: Dispatcher,
        executor: Option<Box<dyn CriticalActionExecutor>>,
    ) -> Result<Self, ConfigError> {
        let ladder = config.ladder.clone();
        let tracker = WarningTracker::new(ladder.len(), config.warning_cooldown);
        let critical = CriticalMonitor::new(config.critical, config.warning_cooldown)?;
        Ok(Self {
            ladder,
            tracker,
            critical,
            sampler,
            dispatcher,
            executor,
        })
    }

    pub fn tracker(&self) -> &WarningTracker {
        &self.tracker
    }

    pub fn critical_state(&self) -> &CriticalState {
        self.critical.state()
    }

    /// Runs one sample → evaluate → dispatch cycle at `now`.
    pub async fn tick(&mut self, now: DateTime<Utc>) -> TickReport {
        let sample = match self.sampler.sample(now) {
            Ok(sample) if sample.system_total_memory == 0 => {
                MonitorError::from(SamplerError::NoSystemMemory).log_error();
                return TickReport::Skipped;
            }
            Ok(sample) => sample,
            Err(e) => {
                MonitorError::from(e).log_error();
                return TickReport::Skipped;
            }
        };

        info!("[{}]", format_local(now));

        let evaluation = self.ladder.evaluate(&sample);
        let decision = self.tracker.observe(&self.ladder, &evaluation, now);
        self.log_tiers(&evaluation, &decision.statuses);

        let mut warning_delivery = None;
        if let Some(index) = decision.fired {
            let tier = self.ladder.tiers()[index];
            let exceeded_for = self
                .tracker
                .state(index)
                .and_then(|s| s.exceeded_for(now))
                .unwrap_or_default();
            let message = self.dispatcher.format_warning(
                &WarningContext {
                    tier: &tier,
                    evaluation: &evaluation,
                    exceeded_for,
                    idle_excluded: self.ladder.excludes_idle(),
                },
                &sample,
            );
            let delivery = self.dispatcher.send(&message).await;
            // counts against the cap even if nobody received it
            self.tracker.record_warning(index, now);
            warning_delivery = Some(delivery);
        }

        let critical = self.critical.observe(&sample, now);
        self.log_system(&sample, &critical);

        let mut critical_delivery = None;
        let mut termination = None;
        if let CriticalStatus::Firing { terminate } = critical.status {
            let outcome = if terminate {
                self.terminate(&sample)
            } else {
                TerminationOutcome::NotAttempted
            };
            let message = self.dispatcher.format_critical(&critical, &outcome, &sample);
            critical_delivery = Some(self.dispatcher.send(&message).await);
            self.critical.record_action(now);
            termination = Some(outcome);
        }

        TickReport::Evaluated(TickSummary {
            usage_fraction: evaluation.usage_fraction,
            statuses: decision.statuses,
            warned_tier: decision.fired,
            warning_delivery,
            critical,
            critical_delivery,
            termination,
        })
    }

    fn terminate(&mut self, sample: &Sample) -> TerminationOutcome {
        let Some(executor) = self.executor.as_mut() else {
            warn!("Termination authorized but no executor is configured");
            return TerminationOutcome::NotAttempted;
        };
        match executor.terminate(&sample.per_process) {
            Ok(victim) => {
                warn!(
                    pid = victim.pid,
                    name = %victim.name,
                    "Warning (terminated {}), freed {:.1}GB",
                    victim.pid,
                    as_gib(victim.memory)
                );
                TerminationOutcome::Terminated(victim)
            }
            Err(e) => {
                let reason = e.to_string();
                MonitorError::from(e).log_error();
                TerminationOutcome::Failed(reason)
            }
        }
    }

    fn log_tiers(&self, evaluation: &LadderEvaluation, statuses: &[TierStatus]) {
        let group = format!(
            "process group {:.1}GB ({:.2}%)",
            as_gib(evaluation.counted_memory),
            evaluation.usage_fraction * 100.0
        );
        for (tier, status) in self.ladder.tiers().iter().zip(statuses) {
            let threshold = tier.fraction * 100.0;
            match status {
                TierStatus::Normal => debug!("OK: {} below {:.1}% tier", group, threshold),
                TierStatus::Waiting { remaining } => info!(
                    "Waiting: {} above {:.1}% tier, eligible in {}",
                    group,
                    threshold,
                    format_hours(*remaining)
                ),
                TierStatus::Muted => info!("Warning (muted): {} above {:.1}% tier", group, threshold),
                TierStatus::Suppressed => info!(
                    "Warning (suppressed): {} above {:.1}% tier, higher tier warned",
                    group, threshold
                ),
                TierStatus::Firing => warn!("Warning: {} above {:.1}% tier", group, threshold),
            }
        }
    }

    fn log_system(&self, sample: &Sample, critical: &CriticalDecision) {
        let available = sample.system_available_memory();
        let code = match critical.status {
            CriticalStatus::Normal => "OK",
            CriticalStatus::Waiting { .. } => "Waiting",
            CriticalStatus::Muted => "Warning (muted)",
            CriticalStatus::Firing { .. } => "Warning",
        };
        let line = format!(
            "{}: {:.1}GB of {:.1}GB available ({:.2}%).",
            code,
            as_gib(available),
            as_gib(sample.system_total_memory),
            sample.fraction_of_total(available) * 100.0
        );
        match critical.status {
            CriticalStatus::Normal => info!("{}", line),
            _ => warn!("{}", line),
        }
    }
}
