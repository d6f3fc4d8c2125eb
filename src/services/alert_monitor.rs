use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::models::{AlertRecord, PriceMap};
use crate::services::notifier::alert_message;
use crate::AppState;

/// Shared control surface of the monitor: running flag, cycle serialization
/// and what the last cycle saw.
#[derive(Clone)]
pub struct MonitorHandle {
    running: Arc<AtomicBool>,
    cycle_lock: Arc<Mutex<()>>,
    latest: Arc<RwLock<Snapshot>>,
}

#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub prices: PriceMap,
    pub last_cycle_at: Option<DateTime<Utc>>,
    pub cycles: u64,
}

impl MonitorHandle {
    pub fn new(running: bool) -> Self {
        Self {
            running: Arc::new(AtomicBool::new(running)),
            cycle_lock: Arc::new(Mutex::new(())),
            latest: Arc::new(RwLock::new(Snapshot::default())),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Returns the previous value.
    pub fn set_running(&self, running: bool) -> bool {
        self.running.swap(running, Ordering::SeqCst)
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.latest.read().await.clone()
    }
}

#[derive(Debug, Default)]
pub struct CycleReport {
    pub symbols: usize,
    pub priced: usize,
    pub triggered: Vec<(AlertRecord, f64)>,
    pub notify_failures: usize,
}

pub fn spawn_price_alert_monitor(state: AppState) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = time::interval(state.settings.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            every_secs = state.settings.poll_interval.as_secs(),
            source = state.poller.source_name(),
            "alert monitor started"
        );

        loop {
            interval.tick().await;

            if !state.monitor.is_running() {
                continue;
            }

            let report = run_cycle(&state).await;
            tracing::debug!(
                symbols = report.symbols,
                priced = report.priced,
                triggered = report.triggered.len(),
                "poll cycle done"
            );
        }
    })
}

/// One poll cycle: fetch, evaluate, notify. Cycles never overlap; a manual
/// run waits for an in-flight timer cycle and vice versa.
pub async fn run_cycle(state: &AppState) -> CycleReport {
    let _cycle = state.monitor.cycle_lock.lock().await;

    let symbols = state.book.lock().await.symbols_of_interest();

    // no book lock held across network calls
    let prices = if symbols.is_empty() {
        PriceMap::new()
    } else {
        state.poller.fetch_latest_prices(&symbols).await
    };

    let now = Utc::now();
    let triggered = state.book.lock().await.evaluate(&prices, now);

    let mut notify_failures = 0;
    for (record, price) in &triggered {
        tracing::info!(
            id = record.id,
            symbol = %record.symbol,
            target = record.target_price,
            price,
            direction = %record.direction,
            "alert triggered"
        );

        let msg = alert_message(record, *price);
        if let Err(e) = state
            .notifier
            .send(&record.recipient, &msg.subject, &msg.body)
            .await
        {
            // the record stays triggered either way
            notify_failures += 1;
            tracing::error!(id = record.id, recipient = %record.recipient, "failed sending alert: {e}");
        }
    }

    let report = CycleReport {
        symbols: symbols.len(),
        priced: prices.len(),
        triggered,
        notify_failures,
    };

    {
        let mut latest = state.monitor.latest.write().await;
        latest.prices = prices;
        latest.last_cycle_at = Some(now);
        latest.cycles += 1;
    }

    if !report.triggered.is_empty() {
        state.emit("alertsUpdated");
    }
    state.emit("pricesUpdated");

    report
}
