//! Email delivery via SMTP.
//!
//! [`SmtpNotifier`] wraps the `lettre` async SMTP transport. The transport is
//! built once at startup; the password, if any, is read from
//! `MEM_MONITOR_SMTP_PASSWORD` so it never has to live in the config file.

use crate::engine::errors::NotifyError;
use crate::notify::Notifier;
use crate::shared::config::model::SmtpConfig;
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

pub const SMTP_PASSWORD_ENV: &str = "MEM_MONITOR_SMTP_PASSWORD";

pub struct SmtpNotifier {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotifier {
    pub fn from_config(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let password = std::env::var(SMTP_PASSWORD_ENV).ok();
        Self::new(config, password)
    }

    pub fn new(config: &SmtpConfig, password: Option<String>) -> Result<Self, NotifyError> {
        let from: Mailbox = config.from.parse()?;

        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?.port(config.port);
        if let (Some(user), Some(pass)) = (&config.user, password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass));
        }

        Ok(Self {
            from,
            transport: builder.build(),
        })
    }

    pub fn build_message(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<Message, NotifyError> {
        Message::builder()
            .from(self.from.clone())
            .to(recipient.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| NotifyError::Build(e.to_string()))
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        let email = self.build_message(recipient, subject, body)?;
        self.transport.send(email).await?;
        tracing::info!(to = recipient, subject, "Warning email sent");
        Ok(())
    }
}
