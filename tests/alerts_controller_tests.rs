mod common;

use axum::http::{header, Request, StatusCode};
use stockwatch::{models::Direction, routes, services::alert_monitor};
use tower::ServiceExt;

use common::{harness, response_body_string};

fn form_post(uri: &str, body: &str) -> Request<axum::body::Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<axum::body::Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap()
}

#[tokio::test]
async fn post_create_alert_adds_record_and_triggers_refresh() {
    let h = harness();
    let app = routes::app(h.state.clone());

    let res = app
        .oneshot(form_post(
            "/alerts",
            "symbol=aapl&targetPrice=150&direction=rises&recipient=trader%40example.com",
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get("HX-Trigger").unwrap(), "alertsUpdated");

    let body = response_body_string(res).await;
    assert!(body.contains("Alert set for AAPL at $150.00"));

    let book = h.state.book.lock().await;
    assert_eq!(book.alerts().len(), 1);
    let a = &book.alerts()[0];
    assert_eq!(a.symbol, "AAPL");
    assert_eq!(a.direction, Direction::RisesTo);
    assert!(!a.triggered);
}

#[tokio::test]
async fn post_create_alert_rejects_non_positive_price() {
    let h = harness();
    let app = routes::app(h.state.clone());

    let res = app
        .oneshot(form_post(
            "/alerts",
            "symbol=AAPL&targetPrice=0&direction=rises&recipient=trader%40example.com",
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = response_body_string(res).await;
    assert!(body.contains("Please enter a valid target price."));
    assert!(h.state.book.lock().await.alerts().is_empty());
}

#[tokio::test]
async fn post_create_alert_rejects_empty_recipient() {
    let h = harness();
    let app = routes::app(h.state.clone());

    let res = app
        .oneshot(form_post(
            "/alerts",
            "symbol=AAPL&targetPrice=150&direction=falls&recipient=+++",
        ))
        .await
        .unwrap();

    let body = response_body_string(res).await;
    assert!(body.contains("Please enter a recipient"));
    assert!(h.state.book.lock().await.alerts().is_empty());
}

#[tokio::test]
async fn post_create_alert_with_missing_fields_renders_error() {
    let h = harness();
    let app = routes::app(h.state.clone());

    let res = app.oneshot(form_post("/alerts", "")).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = response_body_string(res).await;
    assert!(body.contains("text-danger"));
    assert!(h.state.book.lock().await.alerts().is_empty());
}

#[tokio::test]
async fn get_alerts_list_renders_records() {
    let h = harness();
    let app = routes::app(h.state.clone());

    app.clone()
        .oneshot(form_post(
            "/alerts",
            "symbol=MSFT&targetPrice=399.5&direction=falls&recipient=desk%40example.com",
        ))
        .await
        .unwrap();

    let res = app.oneshot(get("/alerts/list")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = response_body_string(res).await;
    assert!(body.contains("MSFT"));
    assert!(body.contains("$399.50"));
    assert!(body.contains("Price falls to target"));
    assert!(body.contains("pending"));
}

#[tokio::test]
async fn get_alerts_list_empty_state() {
    let h = harness();
    let app = routes::app(h.state.clone());

    let res = app.oneshot(get("/alerts/list")).await.unwrap();
    let body = response_body_string(res).await;
    assert!(body.contains("No active alerts."));
}

#[tokio::test]
async fn post_clear_alerts_empties_collection_and_stops_triggers() {
    let h = harness();
    let app = routes::app(h.state.clone());

    app.clone()
        .oneshot(form_post(
            "/alerts",
            "symbol=AAPL&targetPrice=150&direction=rises&recipient=trader%40example.com",
        ))
        .await
        .unwrap();

    let res = app.oneshot(form_post("/alerts/clear", "")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(response_body_string(res).await.contains("All alerts removed."));
    assert!(h.state.book.lock().await.alerts().is_empty());

    h.prices.set("AAPL", 500.0);
    let report = alert_monitor::run_cycle(&h.state).await;
    assert!(report.triggered.is_empty());
    assert!(h.notifier.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn alerts_csv_export_has_header_and_rows() {
    let h = harness();
    let app = routes::app(h.state.clone());

    app.clone()
        .oneshot(form_post(
            "/alerts",
            "symbol=AAPL&targetPrice=150&direction=rises&recipient=trader%40example.com",
        ))
        .await
        .unwrap();

    let res = app.oneshot(get("/alerts/export.csv")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/csv; charset=utf-8"
    );
    assert!(res
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .contains("alerts.csv"));

    let body = response_body_string(res).await;
    let mut lines = body.lines();
    assert_eq!(
        lines.next(),
        Some("id,symbol,target_price,direction,recipient,triggered,created_at,triggered_at")
    );
    assert!(lines
        .next()
        .unwrap()
        .starts_with("1,AAPL,150,rises_to,trader@example.com,false,"));
}

#[tokio::test]
async fn history_is_listed_exported_and_cleared() {
    let h = harness();
    let app = routes::app(h.state.clone());

    app.clone()
        .oneshot(form_post(
            "/alerts",
            "symbol=TSLA&targetPrice=200&direction=falls&recipient=trader%40example.com",
        ))
        .await
        .unwrap();

    h.prices.set("TSLA", 195.25);
    alert_monitor::run_cycle(&h.state).await;

    let res = app.clone().oneshot(get("/alerts/history")).await.unwrap();
    let body = response_body_string(res).await;
    assert!(body.contains("TSLA"));
    assert!(body.contains("$195.25"));

    let res = app.clone().oneshot(get("/alerts/history/export.csv")).await.unwrap();
    let body = response_body_string(res).await;
    assert!(body.starts_with("id,symbol,target_price,actual_price,direction,recipient,triggered_at\n"));
    assert!(body.contains("1,TSLA,200,195.25,falls_to,trader@example.com,"));

    let res = app.clone().oneshot(form_post("/alerts/history/clear", "")).await.unwrap();
    assert!(response_body_string(res).await.contains("Alert history cleared."));

    let res = app.oneshot(get("/alerts/history")).await.unwrap();
    assert!(response_body_string(res).await.contains("No alerts have triggered yet."));

    // clearing history does not touch the alert itself
    let book = h.state.book.lock().await;
    assert_eq!(book.alerts().len(), 1);
    assert!(book.alerts()[0].triggered);
}
