use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSourceKind {
    Yahoo,
    AlphaVantage,
}

impl PriceSourceKind {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "yahoo" | "yfinance" => Some(PriceSourceKind::Yahoo),
            "alpha_vantage" | "alphavantage" | "alpha-vantage" => Some(PriceSourceKind::AlphaVantage),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    pub sender_email: String,
    pub sender_password: String,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,

    pub price_source: PriceSourceKind,
    pub alpha_vantage_api_key: String,

    pub poll_interval: Duration,
    pub quote_cache_ttl: Duration,
    pub request_timeout: Duration,
    pub monitor_autostart: bool,

    pub desktop_notifications: bool,
    // None => email delivery disabled
    pub smtp: Option<SmtpSettings>,
}

pub const MIN_POLL_SECS: u64 = 5;
pub const MAX_POLL_SECS: u64 = 60;

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    from_lookup(|key| env::var(key).ok())
}

/// Builds settings from any key lookup; missing or malformed keys fall back
/// to their defaults.
pub fn from_lookup<F>(var: F) -> Settings
where
    F: Fn(&str) -> Option<String>,
{
    let host = var("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

    let port = var("PORT")
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let price_source = var("PRICE_SOURCE")
        .and_then(|s| PriceSourceKind::parse(&s))
        .unwrap_or(PriceSourceKind::Yahoo);

    let alpha_vantage_api_key = var("ALPHA_VANTAGE_API_KEY").unwrap_or_default();

    let poll_secs = parse_u64(var("POLL_INTERVAL_SECS"))
        .unwrap_or(15)
        .clamp(MIN_POLL_SECS, MAX_POLL_SECS);

    let cache_secs = cache_ttl_secs(parse_u64(var("QUOTE_CACHE_TTL_SECS")).unwrap_or(30), poll_secs);
    let timeout_secs = parse_u64(var("REQUEST_TIMEOUT_SECS")).unwrap_or(10).max(1);

    let monitor_autostart = var("MONITOR_AUTOSTART")
        .and_then(|s| parse_bool(&s))
        .unwrap_or(true);
    let desktop_notifications = var("DESKTOP_NOTIFICATIONS")
        .and_then(|s| parse_bool(&s))
        .unwrap_or(false);

    let smtp = match (var("SENDER_EMAIL"), var("SENDER_PASSWORD")) {
        (Some(sender_email), Some(sender_password))
            if !sender_email.trim().is_empty() && !sender_password.is_empty() =>
        {
            Some(SmtpSettings {
                server: var("SMTP_SERVER").unwrap_or_else(|| "smtp.gmail.com".to_string()),
                port: var("SMTP_PORT")
                    .and_then(|s| s.parse::<u16>().ok())
                    .unwrap_or(587),
                sender_email: sender_email.trim().to_string(),
                sender_password,
            })
        }
        _ => None,
    };

    Settings {
        host,
        port,
        price_source,
        alpha_vantage_api_key,
        poll_interval: Duration::from_secs(poll_secs),
        quote_cache_ttl: Duration::from_secs(cache_secs),
        request_timeout: Duration::from_secs(timeout_secs),
        monitor_autostart,
        desktop_notifications,
        smtp,
    }
}

fn parse_u64(raw: Option<String>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
}

/// A cached quote must expire before the next poll cycle, so the TTL is
/// capped at half the poll interval. Zero stays zero (cache off).
fn cache_ttl_secs(requested: u64, poll_secs: u64) -> u64 {
    requested.min(poll_secs / 2)
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
