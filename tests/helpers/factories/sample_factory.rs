use super::process_usage_factory::ProcessUsageFactory;
use super::time_factory::base_time;
use crate::engine::types::{ProcessUsage, Sample};
use chrono::{DateTime, Utc};

/// Builds samples against a 100-byte machine by default, so memory values
/// read directly as percentages.
pub struct SampleFactory {
    timestamp: DateTime<Utc>,
    total: u64,
    used: Option<u64>,
    processes: Vec<ProcessUsage>,
}

impl SampleFactory {
    pub fn new() -> Self {
        Self {
            timestamp: base_time(),
            total: 100,
            used: None,
            processes: Vec::new(),
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn total(mut self, total: u64) -> Self {
        self.total = total;
        self
    }

    /// System used memory; defaults to the group total.
    pub fn used(mut self, used: u64) -> Self {
        self.used = Some(used);
        self
    }

    pub fn process(mut self, pid: u32, memory: u64) -> Self {
        self.processes
            .push(ProcessUsageFactory::new(pid).memory(memory).create());
        self
    }

    pub fn idle_process(mut self, pid: u32, memory: u64) -> Self {
        self.processes.push(
            ProcessUsageFactory::new(pid)
                .memory(memory)
                .idle(true)
                .create(),
        );
        self
    }

    pub fn with_process(mut self, process: ProcessUsage) -> Self {
        self.processes.push(process);
        self
    }

    pub fn create(self) -> Sample {
        let group: u64 = self.processes.iter().map(|p| p.memory).sum();
        let used = self.used.unwrap_or(group);
        Sample::new(self.timestamp, self.total, used, self.processes)
    }
}
