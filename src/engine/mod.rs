pub mod critical;
pub mod errors;
pub mod ladder;
pub mod monitor;
pub mod scheduler;
pub mod tracker;
pub mod types;

pub use errors::*;
pub use monitor::{Monitor, TickReport, TickSummary};

#[cfg(test)]
mod monitor_test;
