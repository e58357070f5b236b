use crate::engine::errors::SamplerError;
use crate::engine::types::{ProcessUsage, Sample};
use crate::sampler::Sampler;
use crate::sampler::idle::{IdlePolicy, IdleTracker};
use crate::sampler::selection::{ProcessInfo, ProcessSelection};
use crate::sampler::smaps::read_pss;
use chrono::{DateTime, Utc};
use nix::unistd::{Pid, getpgid};
use std::collections::HashSet;
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind, Users};
use tracing::debug;

/// Samples the host through sysinfo and `/proc/<pid>/smaps`.
pub struct ProcSampler {
    system: System,
    selection: ProcessSelection,
    idle: IdleTracker,
    total_override: Option<u64>,
}

impl ProcSampler {
    pub fn new(
        selection: ProcessSelection,
        idle_policy: IdlePolicy,
        total_override: Option<u64>,
    ) -> Self {
        Self {
            system: System::new(),
            selection,
            idle: IdleTracker::new(idle_policy),
            total_override,
        }
    }

    /// Total memory as seen by this sampler, honouring the configured override.
    pub fn total_memory(&mut self) -> u64 {
        if let Some(total) = self.total_override {
            return total;
        }
        self.system.refresh_memory();
        self.system.total_memory()
    }

    fn refresh(&mut self) {
        self.system.refresh_memory();
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing()
                .with_cpu()
                .with_user(UpdateKind::OnlyIfNotSet),
        );
    }

    fn process_infos(&self) -> Vec<ProcessInfo> {
        let users = Users::new_with_refreshed_list();
        let resolve_pgid = self.selection.needs_pgid();

        self.system
            .processes()
            .values()
            // threads share their leader's address space
            .filter(|process| process.thread_kind().is_none())
            .map(|process| {
                let pid = process.pid().as_u32();
                let pgid = if resolve_pgid {
                    pgid_of(pid)
                } else {
                    None
                };
                ProcessInfo {
                    pid,
                    parent: process.parent().map(|p| p.as_u32()),
                    pgid,
                    name: process.name().to_string_lossy().into_owned(),
                    user: process
                        .user_id()
                        .and_then(|uid| users.get_user_by_id(uid))
                        .map(|u| u.name().to_string()),
                    cpu_usage: f64::from(process.cpu_usage()) / 100.0,
                }
            })
            .collect()
    }
}

fn pgid_of(pid: u32) -> Option<u32> {
    let raw = i32::try_from(pid).ok()?;
    getpgid(Some(Pid::from_raw(raw)))
        .ok()
        .and_then(|pgid| u32::try_from(pgid.as_raw()).ok())
}

impl Sampler for ProcSampler {
    fn sample(&mut self, now: DateTime<Utc>) -> Result<Sample, SamplerError> {
        self.refresh();

        if self.system.processes().is_empty() {
            return Err(SamplerError::NoProcesses);
        }

        let total = self
            .total_override
            .unwrap_or_else(|| self.system.total_memory());
        if total == 0 {
            return Err(SamplerError::NoSystemMemory);
        }
        let used = self.system.used_memory();

        let infos = self.process_infos();
        let selected = self.selection.select(&infos);

        let mut live = HashSet::with_capacity(selected.len());
        let mut per_process = Vec::with_capacity(selected.len());
        for info in selected {
            let memory = match read_pss(info.pid) {
                Ok(memory) if memory > 0 => memory,
                Ok(_) => continue,
                Err(e) => {
                    debug!(target: "mem_monitor::sampler", pid = info.pid, "Skipping process, smaps unreadable: {}", e);
                    continue;
                }
            };
            live.insert(info.pid);
            let (is_idle, last_active) = self.idle.observe(info.pid, info.cpu_usage, now);
            per_process.push(ProcessUsage {
                pid: info.pid,
                name: info.name.clone(),
                user: info.user.clone(),
                memory,
                is_idle,
                last_active,
            });
        }
        self.idle.retain(&live);

        per_process.sort_by(|a, b| b.memory.cmp(&a.memory));

        debug!(
            target: "mem_monitor::sampler",
            processes = per_process.len(),
            total,
            used,
            "Sampled memory"
        );

        Ok(Sample::new(now, total, used, per_process))
    }
}
