use crate::engine::errors::NotifyError;
use crate::notify::Notifier;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Hands the message to the local `mail -s <subject> <recipient>` command.
#[derive(Debug, Clone)]
pub struct MailCommandNotifier {
    program: String,
}

impl MailCommandNotifier {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for MailCommandNotifier {
    fn default() -> Self {
        Self::new("mail")
    }
}

#[async_trait]
impl Notifier for MailCommandNotifier {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        let mut child = Command::new(&self.program)
            .arg("-s")
            .arg(subject)
            .arg(recipient)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(body.as_bytes()).await?;
            stdin.shutdown().await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(NotifyError::Command(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        tracing::info!(to = recipient, subject, "Warning mail handed to {}", self.program);
        Ok(())
    }
}
