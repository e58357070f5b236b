pub mod dispatcher;
pub mod log_notifier;
pub mod mail_command;
pub mod smtp;

pub use dispatcher::{Delivery, Dispatcher, Message, WarningContext};
pub use log_notifier::LogNotifier;
pub use mail_command::MailCommandNotifier;
pub use smtp::SmtpNotifier;

use crate::engine::errors::{ConfigError, NotifyError};
use crate::shared::config::model::{NotifyConfig, TransportKind};
use async_trait::async_trait;

/// Delivers one message to one recipient. No retries.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// Builds the notifier for the configured transport.
pub fn build_notifier(config: &NotifyConfig) -> Result<Box<dyn Notifier>, ConfigError> {
    match config.transport {
        TransportKind::Mail => Ok(Box::new(MailCommandNotifier::default())),
        TransportKind::Log => Ok(Box::new(LogNotifier)),
        TransportKind::Smtp => {
            let smtp = config.smtp.as_ref().ok_or_else(|| {
                ConfigError::Invalid("notify.smtp is required for the smtp transport".to_string())
            })?;
            let notifier = SmtpNotifier::from_config(smtp)
                .map_err(|e| ConfigError::Invalid(format!("smtp: {e}")))?;
            Ok(Box::new(notifier))
        }
    }
}

#[cfg(test)]
mod mail_command_test;
