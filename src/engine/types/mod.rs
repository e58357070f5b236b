pub mod sample;

pub use sample::{GIB, ProcessUsage, Sample, as_gib};
