use crate::engine::errors::CriticalActionError;
use crate::engine::types::ProcessUsage;
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct TerminatedProcess {
    pub pid: u32,
    pub name: String,
    pub user: Option<String>,
    pub memory: u64,
}

impl From<&ProcessUsage> for TerminatedProcess {
    fn from(p: &ProcessUsage) -> Self {
        Self {
            pid: p.pid,
            name: p.name.clone(),
            user: p.user.clone(),
            memory: p.memory,
        }
    }
}

/// What the critical monitor did about a critical event.
#[derive(Debug, Clone, PartialEq)]
pub enum TerminationOutcome {
    NotAttempted,
    Terminated(TerminatedProcess),
    Failed(String),
}

pub trait CriticalActionExecutor: Send {
    fn terminate(
        &mut self,
        candidates: &[ProcessUsage],
    ) -> Result<TerminatedProcess, CriticalActionError>;
}

/// The largest process by memory.
pub fn select_victim(candidates: &[ProcessUsage]) -> Option<&ProcessUsage> {
    candidates.iter().max_by_key(|p| p.memory)
}

/// Sends `SIGTERM` to the largest candidate.
#[derive(Debug, Default)]
pub struct SignalExecutor;

impl SignalExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl CriticalActionExecutor for SignalExecutor {
    fn terminate(
        &mut self,
        candidates: &[ProcessUsage],
    ) -> Result<TerminatedProcess, CriticalActionError> {
        let victim = select_victim(candidates).ok_or(CriticalActionError::NoCandidate)?;
        let pid = i32::try_from(victim.pid).map_err(|_| CriticalActionError::Signal {
            pid: victim.pid,
            source: nix::Error::EINVAL,
        })?;

        warn!(pid = victim.pid, name = %victim.name, "Sending SIGTERM");
        kill(Pid::from_raw(pid), Signal::SIGTERM).map_err(|source| {
            CriticalActionError::Signal {
                pid: victim.pid,
                source,
            }
        })?;

        Ok(TerminatedProcess::from(victim))
    }
}
