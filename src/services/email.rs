use std::sync::LazyLock;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use regex::Regex;

use crate::config::SmtpSettings;
use crate::services::notifier::{NotifyError, Notifier};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

/// SMTP delivery with STARTTLS, authenticated as the sender.
pub struct EmailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl EmailNotifier {
    pub fn new(smtp: &SmtpSettings) -> Result<Self, NotifyError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.server)
            .map_err(|e| NotifyError::ChannelUnavailable(e.to_string()))?
            .port(smtp.port)
            .credentials(Credentials::new(
                smtp.sender_email.clone(),
                smtp.sender_password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from: smtp.sender_email.clone(),
        })
    }

    fn build_message(&self, recipient: &str, subject: &str, body: &str) -> Result<Message, NotifyError> {
        let to = recipient
            .trim()
            .parse()
            .map_err(|_| NotifyError::InvalidRecipient(recipient.to_string()))?;
        let from = self
            .from
            .parse()
            .map_err(|e| NotifyError::SendFailed(format!("bad sender address: {e}")))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| NotifyError::SendFailed(e.to_string()))
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        if !is_valid_email(recipient) {
            return Err(NotifyError::InvalidRecipient(recipient.to_string()));
        }

        let message = self.build_message(recipient, subject, body)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotifyError::SendFailed(e.to_string()))?;

        tracing::info!(recipient, "email sent");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "email"
    }
}
