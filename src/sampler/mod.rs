pub mod idle;
pub mod proc_sampler;
pub mod selection;
pub mod smaps;

pub use idle::{IdlePolicy, IdleTracker};
pub use proc_sampler::ProcSampler;
pub use selection::{ProcessInfo, ProcessSelection, SelectionRule};

use crate::engine::errors::SamplerError;
use crate::engine::types::Sample;
use chrono::{DateTime, Utc};

/// Produces one `Sample` per tick.
pub trait Sampler: Send {
    fn sample(&mut self, now: DateTime<Utc>) -> Result<Sample, SamplerError>;
}
