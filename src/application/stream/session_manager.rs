//! Stream Session Manager
//!
//! Owns the feed connection lifecycle for the whole symbol universe:
//!
//! ```text
//! Disconnected -> Connecting -> Subscribing -> Monitoring -> (Refreshing | Reconnecting) -> Disconnected
//! ```
//!
//! - Symbols are subscribed in fixed-size chunks with a pacing delay between
//!   requests.
//! - The universe refresh deadline is checked before each receive, so a silent
//!   feed delays the refresh until the next message or a dropped connection.
//! - A changed universe reconnects immediately with the new set; a transport
//!   failure reconnects with the same set after a fixed delay, forever.
//!
//! The volatility tracker lives inside the pipeline owned by this manager and
//! is only touched from this single control flow.

use crate::application::market_data::candle_pipeline::CandlePipeline;
use crate::application::stream::protocol::{KlineTopics, parse_kline_message, subscribe_request};
use crate::domain::errors::FeedError;
use crate::domain::ports::{FeedConnection, FeedConnector, SignalSink, UniverseProvider};
use crate::infrastructure::observability::Metrics;
use chrono::Utc;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tokio::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Connection lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Subscribing,
    Monitoring,
    Refreshing,
    Reconnecting,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Why a monitoring session ended without a transport error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionExit {
    UniverseChanged,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub chunk_size: usize,
    pub subscribe_pacing: Duration,
    pub refresh_interval: Duration,
    pub reconnect_delay: Duration,
    pub atr_period: usize,
    pub topics: KlineTopics,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            chunk_size: 10,
            subscribe_pacing: Duration::from_millis(250),
            refresh_interval: Duration::from_secs(30 * 60),
            reconnect_delay: Duration::from_secs(5),
            atr_period: 15,
            topics: KlineTopics::default(),
        }
    }
}

pub struct StreamSessionManager {
    config: SessionConfig,
    connector: Arc<dyn FeedConnector>,
    universe: Arc<dyn UniverseProvider>,
    sink: Arc<dyn SignalSink>,
    pipeline: CandlePipeline,
    metrics: Metrics,
    symbols: BTreeSet<String>,
    next_refresh: Instant,
    state: SessionState,
}

impl StreamSessionManager {
    pub fn new(
        config: SessionConfig,
        connector: Arc<dyn FeedConnector>,
        universe: Arc<dyn UniverseProvider>,
        sink: Arc<dyn SignalSink>,
        metrics: Metrics,
    ) -> Self {
        let pipeline = CandlePipeline::new(config.atr_period).with_metrics(metrics.clone());
        let next_refresh = deadline_after(config.refresh_interval);

        Self {
            config,
            connector,
            universe,
            sink,
            pipeline,
            metrics,
            symbols: BTreeSet::new(),
            next_refresh,
            state: SessionState::Disconnected,
        }
    }

    /// Run indefinitely. Process shutdown is the only exit.
    pub async fn run(&mut self) {
        self.bootstrap().await;
        loop {
            self.step().await;
        }
    }

    /// Initial universe fetch and first refresh deadline.
    pub async fn bootstrap(&mut self) {
        let symbols = self.universe.fetch_universe().await;
        info!("Loaded {} symbols", symbols.len());
        self.set_symbols(symbols);
        self.schedule_refresh();
    }

    /// One connect/monitor cycle, including the reconnect delay after a
    /// transport failure.
    pub async fn step(&mut self) {
        match self.run_session().await {
            Ok(SessionExit::UniverseChanged) => {
                info!(
                    "Symbol universe changed ({} symbols). Resubscribing...",
                    self.symbols.len()
                );
                self.metrics.inc_reconnects("universe_changed");
            }
            Err(e) => {
                self.state = SessionState::Reconnecting;
                error!("Reconnect in {:?}: {}", self.config.reconnect_delay, e);
                self.metrics.inc_reconnects("transport");
                tokio::time::sleep(self.config.reconnect_delay).await;
            }
        }
        self.state = SessionState::Disconnected;
    }

    /// Connect, subscribe and monitor until the universe changes or the
    /// transport fails.
    pub async fn run_session(&mut self) -> Result<SessionExit, FeedError> {
        self.state = SessionState::Connecting;
        let mut connection = self.connector.connect().await?;

        self.state = SessionState::Subscribing;
        self.subscribe(connection.as_mut()).await?;
        info!("Subscribed. Monitoring...");

        self.state = SessionState::Monitoring;
        loop {
            if Instant::now() >= self.next_refresh && self.refresh_universe().await {
                return Ok(SessionExit::UniverseChanged);
            }

            let text = connection.next_text().await?;
            self.handle_text(&text).await;
        }
    }

    async fn subscribe(&mut self, connection: &mut dyn FeedConnection) -> Result<(), FeedError> {
        if self.symbols.is_empty() {
            warn!("Symbol universe is empty, nothing to subscribe");
        }

        let topics: Vec<String> = self
            .symbols
            .iter()
            .map(|s| self.config.topics.topic(s))
            .collect();

        for chunk in topics.chunks(self.config.chunk_size.max(1)) {
            debug!("Sending subscription batch: {} topics", chunk.len());
            connection.send_text(subscribe_request(chunk)).await?;
            tokio::time::sleep(self.config.subscribe_pacing).await;
        }

        Ok(())
    }

    /// Re-fetch the universe. Returns true when the set changed.
    async fn refresh_universe(&mut self) -> bool {
        self.state = SessionState::Refreshing;
        let fresh = self.universe.fetch_universe().await;

        if fresh != self.symbols {
            info!(
                "Universe refresh: {} -> {} symbols",
                self.symbols.len(),
                fresh.len()
            );
            self.metrics.inc_refreshes("changed");
            self.set_symbols(fresh);
            return true;
        }

        debug!("Universe refresh: unchanged ({} symbols)", fresh.len());
        self.metrics.inc_refreshes("unchanged");
        self.schedule_refresh();
        self.state = SessionState::Monitoring;
        false
    }

    /// Route one text frame through the pipeline and publish any signals.
    async fn handle_text(&mut self, text: &str) {
        let Some(message) = parse_kline_message(text, &self.config.topics) else {
            return;
        };

        let signals = self.pipeline.process_message(&message, Utc::now());
        for signal in signals {
            info!(
                "Signal: {} +{:.2}% close={} turnover={:.0}",
                signal.symbol,
                signal.change_pct(),
                signal.close_price,
                signal.turnover
            );
            if let Err(e) = self.sink.publish(&signal).await {
                warn!("Failed to deliver signal for {}: {}", signal.symbol, e);
                self.metrics.notify_failures_total.inc();
            }
        }
    }

    fn set_symbols(&mut self, symbols: BTreeSet<String>) {
        self.metrics.subscribed_symbols.set(symbols.len() as f64);
        self.symbols = symbols;
    }

    fn schedule_refresh(&mut self) {
        self.next_refresh = deadline_after(self.config.refresh_interval);
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn symbols(&self) -> &BTreeSet<String> {
        &self.symbols
    }

    pub fn next_refresh(&self) -> Instant {
        self.next_refresh
    }

    pub fn pipeline(&self) -> &CandlePipeline {
        &self.pipeline
    }
}

/// `now + interval`, capped far in the future instead of overflowing.
fn deadline_after(interval: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(interval)
        .unwrap_or_else(|| now + Duration::from_secs(u64::from(u32::MAX)))
}
