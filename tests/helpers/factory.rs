pub use super::factories::{ProcessUsageFactory, SampleFactory, SettingsFactory};

pub struct Factory;

impl Factory {
    pub fn sample() -> SampleFactory {
        SampleFactory::new()
    }

    pub fn process(pid: u32) -> ProcessUsageFactory {
        ProcessUsageFactory::new(pid)
    }

    pub fn settings() -> SettingsFactory {
        SettingsFactory::new()
    }
}
