use thiserror::Error;

/// Errors raised by the market-data feed transport.
///
/// Every variant is recovered by the session manager with a delayed reconnect;
/// none of them is fatal to the process.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Connection failed: {reason}")]
    Connect { reason: String },

    #[error("Send failed: {reason}")]
    Send { reason: String },

    #[error("Receive failed: {reason}")]
    Receive { reason: String },

    #[error("Connection closed by server: {reason}")]
    Closed { reason: String },
}

/// Reasons a single candle item is discarded before reaching the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CandleRejection {
    #[error("Candle not confirmed")]
    Unconfirmed,

    #[error("Missing field: {field}")]
    MissingField { field: &'static str },

    #[error("Non-numeric value for {field}")]
    NonNumeric { field: &'static str },

    #[error("Non-positive price in candle")]
    NonPositivePrice,
}

impl CandleRejection {
    /// Short label used for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            CandleRejection::Unconfirmed => "unconfirmed",
            CandleRejection::MissingField { .. } => "missing_field",
            CandleRejection::NonNumeric { .. } => "non_numeric",
            CandleRejection::NonPositivePrice => "non_positive_price",
        }
    }
}

/// Errors related to signal notification delivery
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification transport error: {reason}")]
    Transport { reason: String },

    #[error("Notification rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}
