use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Warning recipients.
    #[serde(default)]
    pub email: Vec<String>,
    pub memory: MemoryConfig,
    #[serde(default)]
    pub cpu: CpuConfig,
    #[serde(default)]
    pub time: TimeConfig,
    #[serde(default)]
    pub idle: IdleConfig,
    pub group: GroupConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MemoryConfig {
    /// Overrides the detected system memory, in bytes.
    pub total_bytes: Option<u64>,
    pub critical_fraction: f64,
    #[serde(default)]
    pub critical_sustained_secs: i64,
    #[serde(default)]
    pub terminate: TerminateConfig,
    pub tiers: Vec<TierConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TierConfig {
    pub fraction: f64,
    #[serde(default)]
    pub sustained_hours: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TerminateConfig {
    pub active: bool,
    /// System usage at which termination is authorized; defaults to the critical fraction.
    pub terminate_fraction: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CpuConfig {
    /// CPU usage (in CPUs) above which a process counts as active.
    pub active_usage: f64,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self { active_usage: 0.1 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimeConfig {
    #[serde(default = "default_update_secs")]
    pub update_secs: i64,
    #[serde(default = "default_warning_cooldown_secs")]
    pub warning_cooldown_secs: i64,
    #[serde(default = "default_min_idle_secs")]
    pub min_idle_secs: i64,
}

fn default_update_secs() -> i64 {
    300
}

fn default_warning_cooldown_secs() -> i64 {
    3600
}

fn default_min_idle_secs() -> i64 {
    3600
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            update_secs: default_update_secs(),
            warning_cooldown_secs: default_warning_cooldown_secs(),
            min_idle_secs: default_min_idle_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IdleConfig {
    /// Leave idle processes out of the group total before evaluating tiers.
    pub exclude_idle: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorKind {
    All,
    ProcessGroup,
    Descendants,
    Pids,
    User,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GroupConfig {
    pub selector: SelectorKind,
    pub pgid: Option<u32>,
    pub root_pid: Option<u32>,
    #[serde(default)]
    pub pids: Vec<u32>,
    pub user: Option<String>,
    #[serde(default = "default_exclude_users")]
    pub exclude_users: Vec<String>,
}

fn default_exclude_users() -> Vec<String> {
    vec!["root".to_string(), "sddm".to_string()]
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    #[default]
    Mail,
    Smtp,
    Log,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub transport: TransportKind,
    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,
    pub smtp: Option<SmtpConfig>,
}

fn default_subject_prefix() -> String {
    "[mem_monitor]".to_string()
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::default(),
            subject_prefix: default_subject_prefix(),
            smtp: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub from: String,
    /// Password comes from `MEM_MONITOR_SMTP_PASSWORD`.
    pub user: Option<String>,
}

fn default_smtp_port() -> u16 {
    587
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub log_dir: String,
    pub stdout_level: String,
    pub file_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            stdout_level: "info".to_string(),
            file_level: "debug".to_string(),
        }
    }
}
