use crate::domain::errors::NotifyError;
use crate::domain::ports::SignalSink;
use crate::domain::trading::types::SignalEvent;
use async_trait::async_trait;
use tracing::info;

/// Fallback sink used when no messaging credentials are configured.
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl SignalSink for LogSink {
    async fn publish(&self, signal: &SignalEvent) -> Result<(), NotifyError> {
        info!(
            symbol = %signal.symbol,
            change_pct = signal.change_pct(),
            close = signal.close_price,
            turnover = signal.turnover,
            "SIGNAL (no notifier configured)"
        );
        Ok(())
    }
}
