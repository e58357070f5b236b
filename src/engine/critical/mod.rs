pub mod critical_monitor;
pub mod executor;

pub use critical_monitor::{
    CriticalDecision, CriticalMonitor, CriticalPolicy, CriticalState, CriticalStatus,
};
pub use executor::{
    CriticalActionExecutor, SignalExecutor, TerminatedProcess, TerminationOutcome, select_victim,
};
