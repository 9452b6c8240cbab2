use crate::domain::errors::{FeedError, NotifyError};
use crate::domain::trading::types::SignalEvent;
use async_trait::async_trait;
use std::collections::BTreeSet;

/// Source of the tradable symbol universe.
///
/// Best effort: on a mid-pagination failure the symbols collected so far are
/// returned instead of an error.
#[async_trait]
pub trait UniverseProvider: Send + Sync {
    async fn fetch_universe(&self) -> BTreeSet<String>;
}

/// Opens connections to the streaming market-data feed.
#[async_trait]
pub trait FeedConnector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn FeedConnection>, FeedError>;
}

/// A live feed connection. Keep-alive pings are the connection's concern.
#[async_trait]
pub trait FeedConnection: Send {
    async fn send_text(&mut self, text: String) -> Result<(), FeedError>;

    /// Wait for the next text frame.
    async fn next_text(&mut self) -> Result<String, FeedError>;
}

/// Receiver of emitted signal events.
#[async_trait]
pub trait SignalSink: Send + Sync {
    async fn publish(&self, signal: &SignalEvent) -> Result<(), NotifyError>;
}
