use serde_json::json;

use crate::{services::alerts_service::normalize_symbol, AppState};

fn fmt2(x: f64) -> String {
    format!("{:.2}", x)
}

/// Build the context used by the `partials/quote` template.
///
/// - malformed symbol => error, no network call
/// - provider failure => the provider's message
pub async fn quote_ctx(state: &AppState, symbol: &str) -> serde_json::Value {
    let sym = match normalize_symbol(symbol) {
        Ok(s) => s,
        Err(e) => {
            return json!({ "symbol": symbol, "quote": serde_json::Value::Null, "error": e.to_string() });
        }
    };

    match state.poller.fetch_latest_price(&sym).await {
        Ok(q) => json!({
            "symbol": sym,
            "quote": {
                "price": fmt2(q.price),
                "as_of": q.as_of.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            },
            "error": serde_json::Value::Null
        }),
        Err(err) => json!({ "symbol": sym, "quote": serde_json::Value::Null, "error": err.to_string() }),
    }
}

/// Build the context used by the `partials/prices` template from the last
/// poll cycle.
pub async fn prices_ctx(state: &AppState) -> serde_json::Value {
    let snap = state.monitor.snapshot().await;

    let mut rows: Vec<_> = snap.prices.values().collect();
    rows.sort_by(|a, b| a.symbol.cmp(&b.symbol));

    let items: Vec<serde_json::Value> = rows
        .into_iter()
        .map(|q| {
            json!({
                "symbol": q.symbol,
                "price": fmt2(q.price),
                "as_of": q.as_of.format("%H:%M:%S").to_string(),
            })
        })
        .collect();

    json!({
        "has_prices": !items.is_empty(),
        "prices": items,
        "last_refresh": snap
            .last_cycle_at
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
    })
}
