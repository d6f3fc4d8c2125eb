mod common;

use axum::http::{header, Request, StatusCode};
use stockwatch::{routes, services::alert_monitor};
use tower::ServiceExt;

use common::{harness, response_body_string};

fn get(uri: &str) -> Request<axum::body::Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap()
}

fn form_post(uri: &str, body: &str) -> Request<axum::body::Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_returns_ok() {
    let h = harness();
    let res = routes::app(h.state).oneshot(get("/health")).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(response_body_string(res).await, "ok");
}

#[tokio::test]
async fn home_renders_dashboard_shell() {
    let h = harness();
    let res = routes::app(h.state).oneshot(get("/")).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = response_body_string(res).await;
    assert!(body.contains("Stock Price Monitoring"));
    assert!(body.contains("Source: <strong>fake</strong>"));
    assert!(body.contains(r#"hx-get="/alerts/list""#));
}

#[tokio::test]
async fn unknown_path_is_404() {
    let h = harness();
    let res = routes::app(h.state).oneshot(get("/nope")).await.unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(response_body_string(res).await.contains("/nope"));
}

#[tokio::test]
async fn quote_renders_price_from_source() {
    let h = harness();
    h.prices.set("AAPL", 189.844);

    let res = routes::app(h.state).oneshot(get("/quote/aapl")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = response_body_string(res).await;
    assert!(body.contains("<strong>AAPL</strong> $189.84"));
}

#[tokio::test]
async fn quote_failure_renders_error() {
    let h = harness();

    let res = routes::app(h.state).oneshot(get("/quote/ZZZZ")).await.unwrap();
    let body = response_body_string(res).await;
    assert!(body.contains("text-danger"));
    assert!(body.contains("no price data available for ZZZZ"));
}

#[tokio::test]
async fn watchlist_add_duplicate_and_remove() {
    let h = harness();
    let app = routes::app(h.state.clone());

    let res = app
        .clone()
        .oneshot(form_post("/watchlist", "symbol=tcs.ns"))
        .await
        .unwrap();
    assert_eq!(res.headers().get("HX-Trigger").unwrap(), "watchlistUpdated");
    assert!(response_body_string(res).await.contains("Added TCS.NS to watchlist."));

    let res = app
        .clone()
        .oneshot(form_post("/watchlist", "symbol=TCS.NS"))
        .await
        .unwrap();
    assert!(response_body_string(res).await.contains("TCS.NS already in watchlist."));

    let res = app.clone().oneshot(get("/watchlist")).await.unwrap();
    assert!(response_body_string(res).await.contains("TCS.NS"));

    let res = app
        .clone()
        .oneshot(form_post("/watchlist/TCS.NS/delete", ""))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(h.state.book.lock().await.watchlist().is_empty());

    let res = app.oneshot(get("/watchlist")).await.unwrap();
    assert!(response_body_string(res).await.contains("No symbols yet."));
}

#[tokio::test]
async fn watchlist_rejects_bad_symbol() {
    let h = harness();
    let res = routes::app(h.state.clone())
        .oneshot(form_post("/watchlist", "symbol=%3Cscript%3E"))
        .await
        .unwrap();

    assert!(response_body_string(res).await.contains("Please enter a valid stock symbol."));
    assert!(h.state.book.lock().await.watchlist().is_empty());
}

#[tokio::test]
async fn prices_partial_shows_last_cycle() {
    let h = harness();
    let app = routes::app(h.state.clone());

    let res = app.clone().oneshot(get("/prices")).await.unwrap();
    assert!(response_body_string(res).await.contains("No prices yet."));

    h.state.book.lock().await.watch("MSFT".to_string());
    h.prices.set("MSFT", 410.1);
    alert_monitor::run_cycle(&h.state).await;

    let res = app.oneshot(get("/prices")).await.unwrap();
    let body = response_body_string(res).await;
    assert!(body.contains("MSFT"));
    assert!(body.contains("$410.10"));
    assert!(body.contains("UTC"));
}
