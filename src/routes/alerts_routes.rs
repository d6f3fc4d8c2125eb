use axum::{Router, routing::{get, post}};
use crate::{AppState, controllers::alerts_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/alerts", post(alerts_controller::post_create_alert))
        .route("/alerts/list", get(alerts_controller::get_alerts_list))
        .route("/alerts/clear", post(alerts_controller::post_clear_alerts))
        .route("/alerts/export.csv", get(alerts_controller::get_alerts_csv))
        .route("/alerts/history", get(alerts_controller::get_alert_history))
        .route("/alerts/history/clear", post(alerts_controller::post_clear_history))
        .route("/alerts/history/export.csv", get(alerts_controller::get_history_csv))
}
