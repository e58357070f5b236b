use crate::engine::critical::CriticalPolicy;
use crate::engine::errors::ConfigError;
use crate::engine::ladder::{ThresholdLadder, ThresholdTier};
use crate::sampler::{IdlePolicy, ProcessSelection, SelectionRule};
use crate::shared::config::model::{GroupConfig, SelectorKind, Settings, TransportKind};
use std::time::Duration;

/// Checked, typed configuration consumed by the monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub ladder: ThresholdLadder,
    pub critical: CriticalPolicy,
    pub warning_cooldown: Duration,
    pub poll_interval: Duration,
    pub idle: IdlePolicy,
    pub selection: ProcessSelection,
    pub total_memory_override: Option<u64>,
    pub recipients: Vec<String>,
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}

fn non_negative_secs(name: &str, secs: i64) -> Result<Duration, ConfigError> {
    u64::try_from(secs)
        .map(Duration::from_secs)
        .map_err(|_| invalid(format!("{name} must not be negative (got {secs})")))
}

fn sustained(index: usize, hours: f64) -> Result<Duration, ConfigError> {
    if !hours.is_finite() || hours < 0.0 {
        return Err(invalid(format!(
            "tier {index} sustained_hours must be a non-negative number (got {hours})"
        )));
    }
    Duration::try_from_secs_f64(hours * 3600.0)
        .map_err(|e| invalid(format!("tier {index} sustained_hours: {e}")))
}

fn selection(group: &GroupConfig) -> Result<ProcessSelection, ConfigError> {
    let rule = match group.selector {
        SelectorKind::All => SelectionRule::All,
        SelectorKind::ProcessGroup => SelectionRule::ProcessGroup(
            group
                .pgid
                .ok_or_else(|| invalid("group.pgid is required for the process_group selector"))?,
        ),
        SelectorKind::Descendants => SelectionRule::Descendants(
            group
                .root_pid
                .ok_or_else(|| invalid("group.root_pid is required for the descendants selector"))?,
        ),
        SelectorKind::Pids => {
            if group.pids.is_empty() {
                return Err(invalid("group.pids must not be empty for the pids selector"));
            }
            SelectionRule::Pids(group.pids.clone())
        }
        SelectorKind::User => SelectionRule::User(
            group
                .user
                .clone()
                .filter(|u| !u.is_empty())
                .ok_or_else(|| invalid("group.user is required for the user selector"))?,
        ),
    };
    Ok(ProcessSelection::new(rule, group.exclude_users.clone()))
}

impl Settings {
    /// Fails fast on anything the monitor cannot run with. Nothing is clamped.
    pub fn validate(&self) -> Result<MonitorConfig, ConfigError> {
        let tiers = self
            .memory
            .tiers
            .iter()
            .enumerate()
            .map(|(i, t)| Ok(ThresholdTier::new(t.fraction, sustained(i, t.sustained_hours)?)))
            .collect::<Result<Vec<_>, ConfigError>>()?;
        let ladder = ThresholdLadder::new(tiers, self.idle.exclude_idle)?;

        let critical_fraction = self.memory.critical_fraction;
        if !(critical_fraction > 0.0 && critical_fraction <= 1.0) {
            return Err(invalid(format!(
                "memory.critical_fraction {critical_fraction} is outside (0, 1]"
            )));
        }
        let terminate_fraction = if self.memory.terminate.active {
            let fraction = self
                .memory
                .terminate
                .terminate_fraction
                .unwrap_or(critical_fraction);
            if !(fraction > 0.0 && fraction <= 1.0) {
                return Err(invalid(format!(
                    "memory.terminate.terminate_fraction {fraction} is outside (0, 1]"
                )));
            }
            Some(fraction)
        } else {
            None
        };
        let critical = CriticalPolicy {
            fraction: critical_fraction,
            min_sustained: non_negative_secs(
                "memory.critical_sustained_secs",
                self.memory.critical_sustained_secs,
            )?,
            terminate_fraction,
        };

        if self.memory.total_bytes == Some(0) {
            return Err(invalid("memory.total_bytes must be positive"));
        }

        let poll_interval = non_negative_secs("time.update_secs", self.time.update_secs)?;
        if poll_interval.is_zero() {
            return Err(invalid("time.update_secs must be positive"));
        }
        let warning_cooldown =
            non_negative_secs("time.warning_cooldown_secs", self.time.warning_cooldown_secs)?;
        let min_idle = non_negative_secs("time.min_idle_secs", self.time.min_idle_secs)?;

        let active_usage = self.cpu.active_usage;
        if !active_usage.is_finite() || active_usage < 0.0 {
            return Err(invalid(format!(
                "cpu.active_usage must be a non-negative number (got {active_usage})"
            )));
        }

        if self.email.iter().all(|e| e.trim().is_empty()) {
            return Err(invalid("at least one email recipient is required"));
        }
        if self.notify.transport == TransportKind::Smtp && self.notify.smtp.is_none() {
            return Err(invalid("notify.smtp is required for the smtp transport"));
        }

        Ok(MonitorConfig {
            ladder,
            critical,
            warning_cooldown,
            poll_interval,
            idle: IdlePolicy {
                active_usage,
                min_idle,
            },
            selection: selection(&self.group)?,
            total_memory_override: self.memory.total_bytes,
            recipients: self
                .email
                .iter()
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty())
                .collect(),
        })
    }
}
