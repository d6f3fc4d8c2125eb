use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::{AlertRecord, TriggeredAlert};

pub const ALERT_COLUMNS: [&str; 8] = [
    "id",
    "symbol",
    "target_price",
    "direction",
    "recipient",
    "triggered",
    "created_at",
    "triggered_at",
];

pub const HISTORY_COLUMNS: [&str; 7] = [
    "id",
    "symbol",
    "target_price",
    "actual_price",
    "direction",
    "recipient",
    "triggered_at",
];

/// Alert records as CSV, one row per record in collection order.
pub fn alerts_csv(alerts: &[AlertRecord]) -> String {
    let mut lines = Vec::with_capacity(alerts.len() + 1);
    lines.push(ALERT_COLUMNS.join(","));

    for a in alerts {
        let row = [
            a.id.to_string(),
            csv_escape(&a.symbol),
            a.target_price.to_string(),
            a.direction.as_str().to_string(),
            csv_escape(&a.recipient),
            a.triggered.to_string(),
            ts(&a.created_at),
            a.triggered_at.as_ref().map(ts).unwrap_or_default(),
        ];
        lines.push(row.join(","));
    }

    finish(lines)
}

pub fn history_csv(history: &[TriggeredAlert]) -> String {
    let mut lines = Vec::with_capacity(history.len() + 1);
    lines.push(HISTORY_COLUMNS.join(","));

    for h in history {
        let row = [
            h.id.to_string(),
            csv_escape(&h.symbol),
            h.target_price.to_string(),
            h.actual_price.to_string(),
            h.direction.as_str().to_string(),
            csv_escape(&h.recipient),
            ts(&h.triggered_at),
        ];
        lines.push(row.join(","));
    }

    finish(lines)
}

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn ts(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
