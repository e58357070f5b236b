use crate::engine::errors::NotifyError;
use crate::notify::Notifier;
use async_trait::async_trait;
use tracing::info;

/// Dry-run transport: writes messages to the log instead of sending them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        info!(target: "mem_monitor::notify", to = recipient, subject, "{}", body);
        Ok(())
    }
}
