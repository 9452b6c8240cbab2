//! Prometheus metrics definitions for Pumpscout
//!
//! All metrics use the `pumpscout_` prefix.

use prometheus::{
    CounterVec, Gauge, IntCounter, Opts, Registry, TextEncoder,
    core::{AtomicF64, GenericGauge},
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Prometheus metrics for the signal pipeline
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    started_at: Instant,
    /// Confirmed candles that reached the volatility tracker
    pub candles_processed_total: IntCounter,
    /// Candle items dropped before processing, by reason
    pub candles_discarded_total: CounterVec,
    /// Signals emitted, by symbol category
    pub signals_total: CounterVec,
    /// Notification delivery failures
    pub notify_failures_total: IntCounter,
    /// WebSocket reconnection attempts, by cause
    pub websocket_reconnects_total: CounterVec,
    /// Universe refreshes, by outcome (unchanged/changed)
    pub universe_refreshes_total: CounterVec,
    /// Symbols in the current subscription set
    pub subscribed_symbols: GenericGauge<AtomicF64>,
    /// Uptime in seconds
    pub uptime_seconds: GenericGauge<AtomicF64>,
}

impl Metrics {
    /// Create a new Metrics instance with all gauges and counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let candles_processed_total = IntCounter::with_opts(Opts::new(
            "pumpscout_candles_processed_total",
            "Confirmed candles folded into the volatility tracker",
        ))?;
        registry.register(Box::new(candles_processed_total.clone()))?;

        let candles_discarded_total = CounterVec::new(
            Opts::new(
                "pumpscout_candles_discarded_total",
                "Candle items discarded before processing",
            ),
            &["reason"],
        )?;
        registry.register(Box::new(candles_discarded_total.clone()))?;

        let signals_total = CounterVec::new(
            Opts::new("pumpscout_signals_total", "Signals emitted by category"),
            &["category"],
        )?;
        registry.register(Box::new(signals_total.clone()))?;

        let notify_failures_total = IntCounter::with_opts(Opts::new(
            "pumpscout_notify_failures_total",
            "Signal notifications that failed to deliver",
        ))?;
        registry.register(Box::new(notify_failures_total.clone()))?;

        let websocket_reconnects_total = CounterVec::new(
            Opts::new(
                "pumpscout_websocket_reconnects_total",
                "Total WebSocket reconnection attempts",
            ),
            &["cause"],
        )?;
        registry.register(Box::new(websocket_reconnects_total.clone()))?;

        let universe_refreshes_total = CounterVec::new(
            Opts::new(
                "pumpscout_universe_refreshes_total",
                "Periodic symbol universe refreshes",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(universe_refreshes_total.clone()))?;

        let subscribed_symbols = Gauge::with_opts(Opts::new(
            "pumpscout_subscribed_symbols",
            "Symbols in the current subscription set",
        ))?;
        registry.register(Box::new(subscribed_symbols.clone()))?;

        let uptime_seconds = Gauge::with_opts(Opts::new(
            "pumpscout_uptime_seconds",
            "Process uptime in seconds",
        ))?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            started_at: Instant::now(),
            candles_processed_total,
            candles_discarded_total,
            signals_total,
            notify_failures_total,
            websocket_reconnects_total,
            universe_refreshes_total,
            subscribed_symbols,
            uptime_seconds,
        })
    }

    /// Time since these metrics were created; also refreshes the uptime gauge.
    pub fn uptime(&self) -> Duration {
        let uptime = self.started_at.elapsed();
        self.uptime_seconds.set(uptime.as_secs() as f64);
        uptime
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        self.uptime();
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    pub fn inc_discarded(&self, reason: &str) {
        self.candles_discarded_total
            .with_label_values(&[reason])
            .inc();
    }

    pub fn inc_signals(&self, category: &str) {
        self.signals_total.with_label_values(&[category]).inc();
    }

    pub fn inc_reconnects(&self, cause: &str) {
        self.websocket_reconnects_total
            .with_label_values(&[cause])
            .inc();
    }

    pub fn inc_refreshes(&self, outcome: &str) {
        self.universe_refreshes_total
            .with_label_values(&[outcome])
            .inc();
    }

    /// Current value of a labelled counter
    pub fn counter_value(counter: &CounterVec, label: &str) -> f64 {
        counter.with_label_values(&[label]).get()
    }
}
