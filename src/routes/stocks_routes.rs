use axum::{Router, routing::{get, post}};
use crate::{AppState, controllers::stocks_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/quote/:symbol", get(stocks_controller::get_quote))
        .route("/prices", get(stocks_controller::get_prices))
        .route("/watchlist", get(stocks_controller::get_watchlist).post(stocks_controller::post_watch))
        .route("/watchlist/:symbol/delete", post(stocks_controller::post_unwatch))
}
