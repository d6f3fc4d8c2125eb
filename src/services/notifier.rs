use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::Settings;
use crate::models::AlertRecord;
use crate::services::{desktop::DesktopNotifier, email::EmailNotifier};

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("failed to send notification: {0}")]
    SendFailed(String),
    #[error("notification channel unavailable: {0}")]
    ChannelUnavailable(String),
    #[error("invalid recipient: {0}")]
    InvalidRecipient(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotifyError>;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub subject: String,
    pub body: String,
}

pub fn alert_message(record: &AlertRecord, price: f64) -> Message {
    let when = record
        .triggered_at
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());

    Message {
        subject: format!("Stock Alert: {} {}", record.symbol, record.direction.label()),
        body: format!(
            "Your alert for {} was triggered.\nTarget: ${:.2}\nCurrent: ${:.2}\nTime (UTC): {}",
            record.symbol, record.target_price, price, when
        ),
    }
}

/// Writes alerts to the application log. Always enabled.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        tracing::info!(recipient, "{subject}: {}", body.replace('\n', " | "));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Forwards to every notifier in order. All of them are called; the first
/// error (if any) is returned.
pub struct CompositeNotifier {
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl CompositeNotifier {
    pub fn new(notifiers: Vec<Arc<dyn Notifier>>) -> Self {
        Self { notifiers }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.notifiers.iter().map(|n| n.name()).collect()
    }
}

#[async_trait]
impl Notifier for CompositeNotifier {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        let mut first_error = None;
        for notifier in &self.notifiers {
            if let Err(e) = notifier.send(recipient, subject, body).await {
                tracing::warn!(channel = notifier.name(), "notification failed: {e}");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn name(&self) -> &'static str {
        "composite"
    }
}

/// Log sink plus whatever the settings enable.
pub fn from_settings(settings: &Settings) -> Result<CompositeNotifier, String> {
    let mut notifiers: Vec<Arc<dyn Notifier>> = vec![Arc::new(LogNotifier)];

    if settings.desktop_notifications {
        notifiers.push(Arc::new(DesktopNotifier::new()));
    }

    if let Some(smtp) = &settings.smtp {
        let email = EmailNotifier::new(smtp).map_err(|e| e.to_string())?;
        notifiers.push(Arc::new(email));
    }

    Ok(CompositeNotifier::new(notifiers))
}
