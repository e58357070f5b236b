use crate::engine::types::as_gib;
use crate::sampler::SelectionRule;
use crate::shared::config::validate::MonitorConfig;
use std::fmt::Write as _;

fn describe_rule(rule: &SelectionRule) -> String {
    match rule {
        SelectionRule::All => "all processes".to_string(),
        SelectionRule::ProcessGroup(pgid) => format!("process group {pgid}"),
        SelectionRule::Descendants(root) => format!("pid {root} and its descendants"),
        SelectionRule::Pids(pids) => format!(
            "pids {}",
            pids.iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ),
        SelectionRule::User(user) => format!("processes owned by {user}"),
    }
}

impl MonitorConfig {
    /// Human-readable configuration, as logged at startup.
    pub fn summary(&self, total_memory: u64) -> String {
        let total = as_gib(total_memory);
        let mut out = String::from("mem_monitor\n\nConfiguration:\n");

        let _ = writeln!(out, "  System memory: {total:.1}GB");
        let _ = writeln!(
            out,
            "  System critical warning memory threshold: {:.1}GB ({:.2}%)",
            self.critical.fraction * total,
            self.critical.fraction * 100.0
        );
        match self.critical.terminate_fraction {
            Some(fraction) => {
                let _ = writeln!(
                    out,
                    "  System critical process termination: Active\n    System critical process termination memory threshold: {:.1}GB ({:.2}%)",
                    fraction * total,
                    fraction * 100.0
                );
            }
            None => out.push_str("  System critical process termination: Inactive\n"),
        }

        let _ = writeln!(
            out,
            "  Monitored processes: {}",
            describe_rule(&self.selection.rule)
        );
        if !self.selection.exclude_users.is_empty() {
            let _ = writeln!(
                out,
                "  Excluded users: {}",
                self.selection.exclude_users.join(", ")
            );
        }

        out.push_str("  Process group warnings:\n");
        for tier in self.ladder.tiers() {
            let _ = writeln!(
                out,
                "    {:.1}% of memory ({:.1}GB), warn after {:.1} hours",
                tier.fraction * 100.0,
                tier.fraction * total,
                tier.min_sustained.as_secs_f64() / 3600.0
            );
        }
        if self.ladder.excludes_idle() {
            out.push_str("  Idle processes excluded from process group usage\n");
        }

        let _ = writeln!(
            out,
            "  Processes considered idle after: {} seconds",
            self.idle.min_idle.as_secs()
        );
        let _ = writeln!(
            out,
            "  Processes considered idle with CPU usage less than: {:.1}%",
            self.idle.active_usage * 100.0
        );
        let _ = writeln!(
            out,
            "  Processes polled every: {} seconds",
            self.poll_interval.as_secs()
        );
        let _ = writeln!(
            out,
            "  Maximum warning frequency: {} seconds",
            self.warning_cooldown.as_secs()
        );
        let _ = writeln!(
            out,
            "  Warnings will be sent to: {}",
            self.recipients.join(", ")
        );
        out
    }
}
