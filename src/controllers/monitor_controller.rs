use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde_json::json;

use crate::{
    controllers::hx_headers,
    render,
    services::alert_monitor,
    AppState,
};

async fn status_html(state: &AppState, message: Option<String>) -> String {
    let snap = state.monitor.snapshot().await;
    let pending = state.book.lock().await.pending_count();

    let ctx = json!({
        "running": state.monitor.is_running(),
        "pending": pending,
        "cycles": snap.cycles,
        "message": message,
    });

    render::render_partial(state, "partials/monitor_status", &ctx)
}

// GET /monitor/status
pub async fn get_status(State(state): State<AppState>) -> Response {
    (StatusCode::OK, Html(status_html(&state, None).await)).into_response()
}

// POST /monitor/start
pub async fn post_start(State(state): State<AppState>) -> Response {
    if !state.monitor.set_running(true) {
        tracing::info!("monitoring started");
        state.emit("monitorUpdated");
    }

    (StatusCode::OK, Html(status_html(&state, None).await)).into_response()
}

// POST /monitor/stop
pub async fn post_stop(State(state): State<AppState>) -> Response {
    if state.monitor.set_running(false) {
        tracing::info!("monitoring stopped");
        state.emit("monitorUpdated");
    }

    (StatusCode::OK, Html(status_html(&state, None).await)).into_response()
}

// POST /monitor/run
pub async fn post_run(State(state): State<AppState>) -> Response {
    let report = alert_monitor::run_cycle(&state).await;

    let mut message = format!(
        "Checked {} of {} symbols, {} alert(s) triggered.",
        report.priced,
        report.symbols,
        report.triggered.len()
    );
    if report.notify_failures > 0 {
        message.push_str(&format!(" {} notification(s) failed.", report.notify_failures));
    }

    (
        StatusCode::OK,
        hx_headers(&["alertsUpdated", "pricesUpdated"]),
        Html(status_html(&state, Some(message)).await),
    )
        .into_response()
}
