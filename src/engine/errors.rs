use thiserror::Error;
use tracing::{debug, error, warn};

/// The sampler could not produce a sample for this tick.
#[derive(Debug, Error)]
pub enum SamplerError {
    #[error("no processes visible on this host")]
    NoProcesses,

    #[error("system total memory reported as zero")]
    NoSystemMemory,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sampler error: {0}")]
    Other(String),
}

/// A notification could not be delivered.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Email build error: {0}")]
    Build(String),

    #[error("mail command failed: {0}")]
    Command(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The critical-action executor failed to terminate a process.
#[derive(Debug, Error)]
pub enum CriticalActionError {
    #[error("no candidate process to terminate")]
    NoCandidate,

    #[error("failed to signal pid {pid}: {source}")]
    Signal {
        pid: u32,
        #[source]
        source: nix::Error,
    },
}

/// Configuration could not be loaded or is invalid. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to write default configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),
}

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("sampler unavailable: {0}")]
    SamplerUnavailable(#[from] SamplerError),

    #[error("configuration invalid: {0}")]
    ConfigurationInvalid(#[from] ConfigError),

    #[error("notification delivery failed: {0}")]
    NotificationDeliveryFailed(#[from] NotifyError),

    #[error("critical action failed: {0}")]
    CriticalActionFailed(#[from] CriticalActionError),
}

impl MonitorError {
    pub fn log_error(&self) {
        match self {
            MonitorError::SamplerUnavailable(e) => {
                warn!("Sampler unavailable, skipping tick: {}", e);
                debug!("Sampler error details: {:?}", e);
            }
            MonitorError::ConfigurationInvalid(e) => {
                error!("Configuration invalid: {}", e);
            }
            MonitorError::NotificationDeliveryFailed(e) => {
                error!("Notification delivery failed: {}", e);
                debug!("Notification error details: {:?}", e);
            }
            MonitorError::CriticalActionFailed(e) => {
                error!("Critical action failed: {}", e);
                debug!("Critical action error details: {:?}", e);
            }
        }
    }
}
