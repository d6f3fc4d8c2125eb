use serde_json::json;

use crate::AppState;

pub fn render_full(state: &AppState, title: &str, body_html: String) -> Result<String, String> {
    let ctx = json!({
        "title": title,
        "body": body_html,
        "source": state.poller.source_name(),
        "interval_secs": state.settings.poll_interval.as_secs(),
        "email_enabled": state.settings.smtp.is_some(),
        "desktop_enabled": state.settings.desktop_notifications,
    });

    state
        .hbs
        .render("layouts/base", &ctx)
        .map_err(|e| e.to_string())
}

pub fn render_shell(state: &AppState) -> Result<String, String> {
    render_full(state, "StockWatch", String::new())
}

/// Template errors end up in the returned HTML.
pub fn render_partial(state: &AppState, tpl: &str, ctx: &serde_json::Value) -> String {
    state
        .hbs
        .render(tpl, ctx)
        .unwrap_or_else(|e| format!("template error: {e}"))
}
