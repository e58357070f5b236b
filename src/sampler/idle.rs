use crate::shared::time::elapsed;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdlePolicy {
    /// CPU usage, in CPUs, above which a process counts as active.
    pub active_usage: f64,
    /// How long a process must stay inactive before it is idle.
    pub min_idle: Duration,
}

/// Remembers when each process was last seen active.
#[derive(Debug, Clone)]
pub struct IdleTracker {
    policy: IdlePolicy,
    last_active: HashMap<u32, DateTime<Utc>>,
}

impl IdleTracker {
    pub fn new(policy: IdlePolicy) -> Self {
        Self {
            policy,
            last_active: HashMap::new(),
        }
    }

    /// Records one CPU reading and returns `(is_idle, last_active)`.
    /// A process seen for the first time counts as active now.
    pub fn observe(
        &mut self,
        pid: u32,
        cpu_usage: f64,
        now: DateTime<Utc>,
    ) -> (bool, DateTime<Utc>) {
        let last = self.last_active.entry(pid).or_insert(now);
        if cpu_usage > self.policy.active_usage {
            *last = now;
        }
        let last = *last;
        (elapsed(last, now) >= self.policy.min_idle, last)
    }

    /// Forgets processes that are no longer present.
    pub fn retain(&mut self, live: &HashSet<u32>) {
        self.last_active.retain(|pid, _| live.contains(pid));
    }

    pub fn tracked(&self) -> usize {
        self.last_active.len()
    }
}
