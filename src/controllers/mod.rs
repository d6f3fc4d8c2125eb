use axum::http::{HeaderMap, HeaderValue};

pub mod alerts_controller;
pub mod home_controller;
pub mod monitor_controller;
pub mod realtime_controller;
pub mod stocks_controller;

pub(crate) fn hx_trigger_value(events: &[&str]) -> HeaderValue {
    if events.len() == 1 {
        return HeaderValue::from_str(events[0]).unwrap_or_else(|_| HeaderValue::from_static(""));
    }

    let mut map = serde_json::Map::new();
    for &e in events {
        map.insert(e.to_string(), serde_json::Value::Bool(true));
    }

    let json = serde_json::Value::Object(map).to_string();
    HeaderValue::from_str(&json).unwrap_or_else(|_| HeaderValue::from_static(""))
}

pub(crate) fn hx_headers(events: &[&str]) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("HX-Trigger", hx_trigger_value(events));
    headers
}
