pub mod loader;
pub mod model;
pub mod summary;
pub mod validate;

pub use loader::{CONFIG_ENV, DEFAULT_CONFIG, config_path, load_settings, render_settings};
pub use model::Settings;
pub use validate::MonitorConfig;
