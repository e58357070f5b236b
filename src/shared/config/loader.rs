use crate::engine::errors::ConfigError;
use crate::shared::config::model::Settings;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming the config file when `--config` is not given.
pub const CONFIG_ENV: &str = "MEM_MONITOR_CONFIG";

const SUPPORTED_EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "json"];

/// Written on first run when no config file exists.
pub const DEFAULT_CONFIG: &str = r#"# mem_monitor configuration

# Warning recipients.
email = ["root@localhost"]

[memory]
# Detected automatically when unset.
# total_bytes = 68719476736
# System-wide used fraction that triggers a critical warning.
critical_fraction = 0.9
critical_sustained_secs = 0

[memory.terminate]
# Terminate the largest monitored process when memory is critical.
active = false
# terminate_fraction = 0.95

# Process-group warning ladder, most severe first.
[[memory.tiers]]
fraction = 0.5
sustained_hours = 0

[[memory.tiers]]
fraction = 0.2
sustained_hours = 6

[[memory.tiers]]
fraction = 0.1
sustained_hours = 24

[[memory.tiers]]
fraction = 0.05
sustained_hours = 168

[[memory.tiers]]
fraction = 0.01
sustained_hours = 720

[cpu]
# CPU usage, in CPUs, above which a process is active.
active_usage = 0.1

[time]
update_secs = 300
warning_cooldown_secs = 3600
min_idle_secs = 3600

[idle]
exclude_idle = false

[group]
# all | process_group (pgid) | descendants (root_pid) | pids (pids) | user (user)
selector = "all"
exclude_users = ["root", "sddm"]

[notify]
# mail | smtp | log
transport = "mail"
subject_prefix = "[mem_monitor]"

[logging]
log_dir = "logs"
stdout_level = "info"
file_level = "debug"
"#;

/// CLI flag, then `MEM_MONITOR_CONFIG`, then `config`.
pub fn config_path(cli: Option<&str>) -> String {
    cli.map(str::to_string)
        .or_else(|| env::var(CONFIG_ENV).ok())
        .unwrap_or_else(|| "config".to_string())
}

fn existing_file(path: &str) -> Option<PathBuf> {
    let direct = PathBuf::from(path);
    if direct.is_file() {
        return Some(direct);
    }
    SUPPORTED_EXTENSIONS
        .iter()
        .map(|ext| PathBuf::from(format!("{path}.{ext}")))
        .find(|p| p.is_file())
}

/// Writes [`DEFAULT_CONFIG`] when no config file exists for `path`.
/// Returns the path written, if any.
pub fn ensure_default_config(path: &str) -> Result<Option<PathBuf>, ConfigError> {
    if existing_file(path).is_some() {
        return Ok(None);
    }
    let target = match Path::new(path).extension().and_then(|e| e.to_str()) {
        None => PathBuf::from(format!("{path}.toml")),
        Some("toml") => PathBuf::from(path),
        // Only TOML defaults are written; other formats must exist already.
        Some(_) => return Ok(None),
    };
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, DEFAULT_CONFIG)?;
    info!("No configuration found, wrote defaults to {}", target.display());
    Ok(Some(target))
}

pub fn load_settings(path: &str) -> Result<Settings, ConfigError> {
    ensure_default_config(path)?;

    let settings: Settings = config::Config::builder()
        .add_source(config::File::with_name(path))
        .build()?
        .try_deserialize()?;

    Ok(settings)
}

/// Effective settings as TOML.
pub fn render_settings(settings: &Settings) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(settings)?)
}
