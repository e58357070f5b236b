pub mod process_usage_factory;
pub mod sample_factory;
pub mod settings_factory;
pub mod time_factory;

pub use process_usage_factory::ProcessUsageFactory;
pub use sample_factory::SampleFactory;
pub use settings_factory::SettingsFactory;
pub use time_factory::{at_hours, base_time, hours};
