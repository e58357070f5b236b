use crate::engine::critical::{CriticalDecision, TerminationOutcome};
use crate::engine::ladder::{LadderEvaluation, ThresholdTier};
use crate::engine::types::{Sample, as_gib};
use crate::notify::Notifier;
use crate::shared::time::{elapsed, format_hours, format_local};
use std::fmt::Write as _;
use std::time::Duration;
use tracing::error;

/// Processes listed in a warning body before the rest are summarized.
const MAX_BREAKDOWN: usize = 20;
/// Processes listed in a critical body.
const MAX_CRITICAL_BREAKDOWN: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub subject: String,
    pub body: String,
}

/// The tier that fired and what the ladder saw.
#[derive(Debug, Clone, Copy)]
pub struct WarningContext<'a> {
    pub tier: &'a ThresholdTier,
    pub evaluation: &'a LadderEvaluation,
    pub exceeded_for: Duration,
    pub idle_excluded: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    pub attempted: usize,
    pub failed: usize,
}

impl Delivery {
    /// True when at least one recipient got the message.
    pub fn delivered(&self) -> bool {
        self.attempted > self.failed
    }
}

/// Formats warnings and hands them to the notifier, one send per recipient.
pub struct Dispatcher {
    notifier: Box<dyn Notifier>,
    recipients: Vec<String>,
    subject_prefix: String,
    host: String,
}

impl Dispatcher {
    pub fn new(
        notifier: Box<dyn Notifier>,
        recipients: Vec<String>,
        subject_prefix: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        Self {
            notifier,
            recipients,
            subject_prefix: subject_prefix.into(),
            host: host.into(),
        }
    }

    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    fn subject(&self, text: &str) -> String {
        if self.subject_prefix.is_empty() {
            text.to_string()
        } else {
            format!("{} {}", self.subject_prefix, text)
        }
    }

    pub fn format_warning(&self, ctx: &WarningContext<'_>, sample: &Sample) -> Message {
        let counted = ctx.evaluation.counted_memory;
        let mut body = format!(
            "Warning: the monitored process group on {host} is using {gib:.1}GB ({pct:.2}%) of RAM, \
             at or above the {tier:.1}% warning threshold for {elapsed}.",
            host = self.host,
            gib = as_gib(counted),
            pct = ctx.evaluation.usage_fraction * 100.0,
            tier = ctx.tier.fraction * 100.0,
            elapsed = format_hours(ctx.exceeded_for),
        );
        if ctx.idle_excluded {
            let idle = sample.idle_memory();
            if idle > 0 {
                let _ = write!(body, " A further {:.1}GB held by idle processes is not counted.", as_gib(idle));
            }
        }
        let _ = write!(
            body,
            "\nSystem: {:.1}GB of {:.1}GB used ({:.2}%).\n",
            as_gib(sample.system_used_memory),
            as_gib(sample.system_total_memory),
            sample.system_fraction() * 100.0
        );

        body.push_str("\nProcesses:\n");
        self.write_breakdown(&mut body, sample, MAX_BREAKDOWN);
        body.push_str("\nKill a process with `kill <pid>`.\n");

        Message {
            subject: self.subject(&format!("Memory Usage Warning: {}", self.host)),
            body,
        }
    }

    pub fn format_critical(
        &self,
        decision: &CriticalDecision,
        outcome: &TerminationOutcome,
        sample: &Sample,
    ) -> Message {
        let available = sample.system_available_memory();
        let mut body = format!(
            "Critical warning: {host} memory usage high: {avail:.1}GB of {total:.1}GB available ({avail_pct:.2}%), \
             {used_pct:.2}% used for {elapsed}.",
            host = self.host,
            avail = as_gib(available),
            total = as_gib(sample.system_total_memory),
            avail_pct = sample.fraction_of_total(available) * 100.0,
            used_pct = decision.usage_fraction * 100.0,
            elapsed = format_hours(decision.exceeded_for),
        );

        let subject = match outcome {
            TerminationOutcome::NotAttempted => self.subject("System Memory Critical"),
            TerminationOutcome::Terminated(victim) => {
                let _ = write!(
                    body,
                    "\n\nTerminated {}'s process {} ({}) and freed {:.1}GB ({:.2}%) of RAM.",
                    victim.user.as_deref().unwrap_or("unknown"),
                    victim.pid,
                    victim.name,
                    as_gib(victim.memory),
                    sample.fraction_of_total(victim.memory) * 100.0
                );
                self.subject(&format!("System Memory Critical (Terminated {})", victim.pid))
            }
            TerminationOutcome::Failed(reason) => {
                let _ = write!(body, "\n\nTermination failed: {reason}");
                self.subject("System Memory Critical")
            }
        };

        if !sample.per_process.is_empty() {
            body.push_str("\n\nLargest monitored processes:\n");
            self.write_breakdown(&mut body, sample, MAX_CRITICAL_BREAKDOWN);
        }

        Message { subject, body }
    }

    fn write_breakdown(&self, body: &mut String, sample: &Sample, limit: usize) {
        for p in sample.per_process.iter().take(limit) {
            let activity = if p.is_idle {
                format!(
                    "idle since {} ({} ago)",
                    format_local(p.last_active),
                    format_hours(elapsed(p.last_active, sample.timestamp))
                )
            } else {
                "active".to_string()
            };
            let _ = writeln!(
                body,
                "  PID {} ({}, {}): {:.2}GB ({:.2}%), {}",
                p.pid,
                p.name,
                p.user.as_deref().unwrap_or("unknown"),
                as_gib(p.memory),
                sample.fraction_of_total(p.memory) * 100.0,
                activity
            );
        }
        if sample.per_process.len() > limit {
            let _ = writeln!(body, "  ... and {} more", sample.per_process.len() - limit);
        }
    }

    /// Sends to every recipient. Failures are logged, never retried.
    pub async fn send(&self, message: &Message) -> Delivery {
        let mut delivery = Delivery::default();
        for recipient in &self.recipients {
            delivery.attempted += 1;
            if let Err(e) = self
                .notifier
                .send(recipient, &message.subject, &message.body)
                .await
            {
                delivery.failed += 1;
                error!(to = %recipient, subject = %message.subject, "Notification delivery failed: {}", e);
            }
        }
        delivery
    }
}
