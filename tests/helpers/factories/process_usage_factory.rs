use super::time_factory::base_time;
use crate::engine::types::ProcessUsage;
use chrono::{DateTime, Utc};

pub struct ProcessUsageFactory {
    usage: ProcessUsage,
}

impl ProcessUsageFactory {
    pub fn new(pid: u32) -> Self {
        Self {
            usage: ProcessUsage {
                pid,
                name: format!("worker-{pid}"),
                user: Some("alice".to_string()),
                memory: 0,
                is_idle: false,
                last_active: base_time(),
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.usage.name = name.to_string();
        self
    }

    pub fn user(mut self, user: Option<&str>) -> Self {
        self.usage.user = user.map(str::to_string);
        self
    }

    pub fn memory(mut self, memory: u64) -> Self {
        self.usage.memory = memory;
        self
    }

    pub fn idle(mut self, is_idle: bool) -> Self {
        self.usage.is_idle = is_idle;
        self
    }

    pub fn last_active(mut self, at: DateTime<Utc>) -> Self {
        self.usage.last_active = at;
        self
    }

    pub fn create(self) -> ProcessUsage {
        self.usage
    }
}
