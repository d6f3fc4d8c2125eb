use axum::{
    extract::{Form, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::{
    controllers::hx_headers,
    render,
    services::{alerts_service, export},
    AppState,
};

fn fmt2(x: f64) -> String {
    format!("{:.2}", x)
}

fn fmt_ts(t: &DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn esc(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn csv_download(filename: &str, body: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

#[derive(Deserialize)]
pub struct CreateAlertForm {
    #[serde(default)]
    pub symbol: String,
    #[serde(rename = "targetPrice", default)]
    pub target_price: String,
    #[serde(default)]
    pub direction: String,
    #[serde(default)]
    pub recipient: String,
}

// GET /alerts/list
pub async fn get_alerts_list(State(state): State<AppState>) -> Response {
    let book = state.book.lock().await;

    let items: Vec<serde_json::Value> = book
        .alerts()
        .iter()
        .map(|a| {
            json!({
                "id": a.id,
                "symbol": a.symbol,
                "target_price": fmt2(a.target_price),
                "direction": a.direction.label(),
                "recipient": a.recipient,
                "triggered": a.triggered,
                "created_at": fmt_ts(&a.created_at),
                "triggered_at": a.triggered_at.as_ref().map(fmt_ts),
            })
        })
        .collect();
    drop(book);

    let ctx = json!({ "alerts": items, "has_alerts": !items.is_empty() });
    let html = render::render_partial(&state, "partials/alerts_list", &ctx);

    (StatusCode::OK, Html(html)).into_response()
}

// POST /alerts
pub async fn post_create_alert(
    State(state): State<AppState>,
    Form(form): Form<CreateAlertForm>,
) -> Response {
    let new = match alerts_service::validate(
        &form.symbol,
        &form.target_price,
        &form.direction,
        &form.recipient,
    ) {
        Ok(n) => n,
        Err(e) => {
            return (
                StatusCode::OK,
                Html(format!(r#"<div class="text-danger">{}</div>"#, esc(&e.to_string()))),
            )
                .into_response();
        }
    };

    let record = state.book.lock().await.create(new);
    tracing::info!(
        id = record.id,
        symbol = %record.symbol,
        target = record.target_price,
        direction = %record.direction,
        "alert created"
    );
    state.emit("alertsUpdated");

    let msg = format!(
        r#"<div class="text-success">Alert set for {} at ${} ({}) to {}</div>"#,
        esc(&record.symbol),
        fmt2(record.target_price),
        record.direction.label(),
        esc(&record.recipient),
    );

    (StatusCode::OK, hx_headers(&["alertsUpdated"]), Html(msg)).into_response()
}

// POST /alerts/clear
pub async fn post_clear_alerts(State(state): State<AppState>) -> Response {
    let removed = state.book.lock().await.clear_all();
    tracing::info!(removed, "all alerts removed");
    state.emit("alertsUpdated");

    (
        StatusCode::OK,
        hx_headers(&["alertsUpdated"]),
        Html(r#"<div class="text-success">All alerts removed.</div>"#.to_string()),
    )
        .into_response()
}

// GET /alerts/history
pub async fn get_alert_history(State(state): State<AppState>) -> Response {
    let book = state.book.lock().await;

    let items: Vec<serde_json::Value> = book
        .history()
        .iter()
        .rev()
        .map(|h| {
            json!({
                "id": h.id,
                "symbol": h.symbol,
                "target_price": fmt2(h.target_price),
                "actual_price": fmt2(h.actual_price),
                "direction": h.direction.label(),
                "recipient": h.recipient,
                "triggered_at": fmt_ts(&h.triggered_at),
            })
        })
        .collect();
    drop(book);

    let ctx = json!({ "history": items, "has_history": !items.is_empty() });
    let html = render::render_partial(&state, "partials/alert_history", &ctx);

    (StatusCode::OK, Html(html)).into_response()
}

// POST /alerts/history/clear
pub async fn post_clear_history(State(state): State<AppState>) -> Response {
    let removed = state.book.lock().await.clear_history();
    tracing::info!(removed, "alert history cleared");
    state.emit("alertsUpdated");

    (
        StatusCode::OK,
        hx_headers(&["alertsUpdated"]),
        Html(r#"<div class="text-success">Alert history cleared.</div>"#.to_string()),
    )
        .into_response()
}

// GET /alerts/export.csv
pub async fn get_alerts_csv(State(state): State<AppState>) -> Response {
    let csv = export::alerts_csv(state.book.lock().await.alerts());
    csv_download("alerts.csv", csv)
}

// GET /alerts/history/export.csv
pub async fn get_history_csv(State(state): State<AppState>) -> Response {
    let csv = export::history_csv(state.book.lock().await.history());
    csv_download("alerts_history.csv", csv)
}
