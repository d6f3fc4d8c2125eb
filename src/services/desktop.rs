use async_trait::async_trait;
use notify_rust::{Notification, Timeout};

use crate::services::notifier::{NotifyError, Notifier};

const MAX_BODY_CHARS: usize = 250;
const POPUP_TITLE: &str = "Stock Price Alert";

/// Desktop popup through the platform notification server.
pub struct DesktopNotifier;

impl DesktopNotifier {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn send(&self, _recipient: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        let (summary, body) = popup_text(subject, body);

        // show() talks to the notification daemon synchronously
        tokio::task::spawn_blocking(move || {
            Notification::new()
                .summary(&summary)
                .body(&body)
                .timeout(Timeout::Milliseconds(5_000))
                .show()
                .map(|_| ())
                .map_err(|_| {
                    NotifyError::ChannelUnavailable(
                        "desktop notification server unreachable".to_string(),
                    )
                })
        })
        .await
        .map_err(|e| NotifyError::SendFailed(e.to_string()))?
    }

    fn name(&self) -> &'static str {
        "desktop"
    }
}

/// Fixed popup title; the alert subject leads the body.
fn popup_text(subject: &str, body: &str) -> (String, String) {
    let text = format!("{subject}\n{body}");
    (
        POPUP_TITLE.to_string(),
        truncate(&escape_markup(&text), MAX_BODY_CHARS),
    )
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_owned()
    } else {
        let mut out: String = s.chars().take(max_chars - 1).collect();
        out.push('\u{2026}');
        out
    }
}

fn escape_markup(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
