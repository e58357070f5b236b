use chrono::{DateTime, Utc};

/// Bytes in one GiB.
pub const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

pub fn as_gib(bytes: u64) -> f64 {
    bytes as f64 / GIB
}

/// Memory attributed to one tracked process at sampling time.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessUsage {
    pub pid: u32,
    pub name: String,
    pub user: Option<String>,
    /// Proportional set size, in bytes.
    pub memory: u64,
    pub is_idle: bool,
    /// Last tick this process was seen using CPU.
    pub last_active: DateTime<Utc>,
}

/// Snapshot of system and process-group memory taken at one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub system_total_memory: u64,
    pub system_used_memory: u64,
    pub process_group_memory: u64,
    pub per_process: Vec<ProcessUsage>,
}

impl Sample {
    /// Builds a sample whose group memory is the sum over `per_process`.
    pub fn new(
        timestamp: DateTime<Utc>,
        system_total_memory: u64,
        system_used_memory: u64,
        per_process: Vec<ProcessUsage>,
    ) -> Self {
        let process_group_memory = per_process.iter().map(|p| p.memory).sum();
        Self {
            timestamp,
            system_total_memory,
            system_used_memory,
            process_group_memory,
            per_process,
        }
    }

    /// Memory held by processes currently flagged idle.
    pub fn idle_memory(&self) -> u64 {
        self.per_process
            .iter()
            .filter(|p| p.is_idle)
            .map(|p| p.memory)
            .sum()
    }

    pub fn system_available_memory(&self) -> u64 {
        self.system_total_memory
            .saturating_sub(self.system_used_memory)
    }

    /// Fraction of total memory in use system-wide. Zero when the total is unknown.
    pub fn system_fraction(&self) -> f64 {
        fraction_of(self.system_used_memory, self.system_total_memory)
    }

    /// Fraction of total memory for an arbitrary byte count.
    pub fn fraction_of_total(&self, bytes: u64) -> f64 {
        fraction_of(bytes, self.system_total_memory)
    }
}

fn fraction_of(bytes: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    bytes as f64 / total as f64
}
