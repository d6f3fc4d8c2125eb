//! Library entrypoint for StockWatch.
//!
//! This file exists mainly to make controller tests easy (integration tests
//! under `tests/` can import the app state, routers, controllers, services).

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};

pub mod config;
pub mod models;
pub mod services;

#[path = "views/render.rs"]
pub mod render;
pub mod templates;

pub mod controllers;
pub mod routes;

use services::{
    alert_monitor::MonitorHandle,
    alerts_service::AlertBook,
    notifier::Notifier,
    poller::Poller,
    price_source::PriceSource,
};

#[derive(Clone)]
pub struct AppState {
    pub hbs: templates::Hbs,
    pub settings: config::Settings,
    pub poller: Poller,
    pub notifier: Arc<dyn Notifier>,
    pub book: Arc<Mutex<AlertBook>>,
    pub monitor: MonitorHandle,
    pub events_tx: broadcast::Sender<String>,
}

impl AppState {
    pub fn new(
        settings: config::Settings,
        prices: Arc<dyn PriceSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (events_tx, _events_rx) = broadcast::channel::<String>(64);

        Self {
            hbs: templates::build_handlebars(),
            poller: Poller::new(prices, settings.request_timeout),
            notifier,
            book: Arc::new(Mutex::new(AlertBook::new())),
            monitor: MonitorHandle::new(settings.monitor_autostart),
            settings,
            events_tx,
        }
    }

    /// Fire-and-forget UI event; no subscribers is fine.
    pub fn emit(&self, event: &str) {
        let _ = self.events_tx.send(event.to_string());
    }
}
