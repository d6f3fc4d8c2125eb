pub mod price_source;
pub mod alpha_vantage;
pub mod yahoo;
pub mod price_cache;
pub mod poller;

pub mod evaluator;
pub mod alerts_service;
pub mod alert_monitor;

pub mod notifier;
pub mod desktop;
pub mod email;

pub mod export;
pub mod stocks_service;
