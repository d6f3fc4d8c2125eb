use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    controllers::hx_headers,
    render,
    services::{alerts_service::normalize_symbol, stocks_service},
    AppState,
};

#[derive(Deserialize)]
pub struct WatchForm {
    #[serde(default)]
    pub symbol: String,
}

// GET /quote/:symbol
pub async fn get_quote(State(state): State<AppState>, Path(symbol): Path<String>) -> Response {
    let data = stocks_service::quote_ctx(&state, &symbol).await;
    let html = render::render_partial(&state, "partials/quote", &data);

    (StatusCode::OK, Html(html)).into_response()
}

// GET /prices
pub async fn get_prices(State(state): State<AppState>) -> Response {
    let data = stocks_service::prices_ctx(&state).await;
    let html = render::render_partial(&state, "partials/prices", &data);

    (StatusCode::OK, Html(html)).into_response()
}

// GET /watchlist
pub async fn get_watchlist(State(state): State<AppState>) -> Response {
    let symbols = state.book.lock().await.watchlist().to_vec();

    let ctx = json!({ "symbols": symbols, "has_symbols": !symbols.is_empty() });
    let html = render::render_partial(&state, "partials/watchlist", &ctx);

    (StatusCode::OK, Html(html)).into_response()
}

// POST /watchlist
pub async fn post_watch(State(state): State<AppState>, Form(form): Form<WatchForm>) -> Response {
    let sym = match normalize_symbol(&form.symbol) {
        Ok(s) => s,
        Err(e) => {
            return (
                StatusCode::OK,
                Html(format!(r#"<div class="text-danger small">{e}</div>"#)),
            )
                .into_response();
        }
    };

    let added = state.book.lock().await.watch(sym.clone());
    if !added {
        return (
            StatusCode::OK,
            Html(format!(r#"<div class="text-muted small">{sym} already in watchlist.</div>"#)),
        )
            .into_response();
    }

    tracing::info!(symbol = %sym, "added to watchlist");
    state.emit("watchlistUpdated");

    (
        StatusCode::OK,
        hx_headers(&["watchlistUpdated"]),
        Html(format!(r#"<div class="text-success small">Added {sym} to watchlist.</div>"#)),
    )
        .into_response()
}

// POST /watchlist/:symbol/delete
pub async fn post_unwatch(State(state): State<AppState>, Path(symbol): Path<String>) -> Response {
    let Ok(sym) = normalize_symbol(&symbol) else {
        return (StatusCode::BAD_REQUEST, Html("bad symbol".to_string())).into_response();
    };

    if state.book.lock().await.unwatch(&sym) {
        tracing::info!(symbol = %sym, "removed from watchlist");
        state.emit("watchlistUpdated");
    }

    (StatusCode::OK, hx_headers(&["watchlistUpdated"]), Html(String::new())).into_response()
}
