//! SMTP delivery of alert digests

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, instrument};

use crate::common::errors::{Result, ScanError};
use crate::common::traits::Notifier;
use crate::config::types::MailConfig;

/// Email notifier speaking authenticated SMTP over implicit TLS
///
/// Built once at startup; the transport keeps a connection pool, so
/// repeated digests reuse the session where the relay allows it.
#[derive(Debug)]
pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
    timeout: Duration,
}

impl SmtpNotifier {
    /// Build the notifier from mail configuration
    pub fn from_config(config: &MailConfig) -> Result<Self> {
        let username = config.username.clone().ok_or_else(|| {
            ScanError::Configuration("mail.username is required (EMAIL_USER)".to_string())
        })?;
        let password = config.password.clone().ok_or_else(|| {
            ScanError::Configuration("mail.password is required (EMAIL_PASS)".to_string())
        })?;
        let recipient = config.recipient.as_deref().ok_or_else(|| {
            ScanError::Configuration("mail.recipient is required (RECEIVER_EMAIL)".to_string())
        })?;
        let from_raw = config.from_address().unwrap_or(&username);

        let from = parse_mailbox("mail.from", from_raw)?;
        let to = parse_mailbox("mail.recipient", recipient)?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| {
                ScanError::Configuration(format!(
                    "SMTP relay {}: {}",
                    config.smtp_host, e
                ))
            })?
            .port(config.smtp_port)
            .credentials(Credentials::new(username, password))
            .build();

        Ok(Self {
            mailer,
            from,
            to,
            timeout: Duration::from_secs(config.timeout_seconds),
        })
    }
}

fn parse_mailbox(field: &str, raw: &str) -> Result<Mailbox> {
    raw.parse()
        .map_err(|e| ScanError::Configuration(format!("{} {:?}: {}", field, raw, e)))
}

#[async_trait]
impl Notifier for SmtpNotifier {
    #[instrument(skip(self, body))]
    async fn deliver(&self, subject: &str, body: &str) -> Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| ScanError::Delivery(format!("building message: {}", e)))?;

        match tokio::time::timeout(self.timeout, self.mailer.send(message)).await {
            Ok(Ok(_)) => {
                debug!("Delivered digest to {}", self.to);
                Ok(())
            }
            Ok(Err(e)) => Err(ScanError::Delivery(e.to_string())),
            Err(_) => Err(ScanError::Timeout(format!(
                "SMTP delivery did not finish within {:?}",
                self.timeout
            ))),
        }
    }

    fn channel_name(&self) -> &'static str {
        "smtp"
    }
}
