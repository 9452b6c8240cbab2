//! Kline stream wire format.
//!
//! Subscribe: `{"op": "subscribe", "args": ["kline.1.BTCUSDT", ...]}`
//! Data:      `{"topic": "kline.1.BTCUSDT", "data": [{"open": "...", ...}]}`
//!
//! Numeric fields arrive as strings or numbers; `confirm` is accepted as a
//! bool or as the case-insensitive text `"true"`.

use crate::domain::errors::CandleRejection;
use crate::domain::trading::types::CandleEvent;
use serde::Deserialize;
use serde_json::Value;

/// Builds and matches `kline.<interval>.<SYMBOL>` topics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KlineTopics {
    prefix: String,
}

impl KlineTopics {
    pub fn new(interval: &str) -> Self {
        Self {
            prefix: format!("kline.{}.", interval),
        }
    }

    pub fn topic(&self, symbol: &str) -> String {
        format!("{}{}", self.prefix, symbol)
    }

    /// Symbol carried by a matching topic, `None` for anything else.
    pub fn symbol_of<'a>(&self, topic: &'a str) -> Option<&'a str> {
        topic
            .strip_prefix(self.prefix.as_str())
            .filter(|symbol| !symbol.is_empty())
    }
}

impl Default for KlineTopics {
    fn default() -> Self {
        Self::new("1")
    }
}

pub fn subscribe_request(topics: &[String]) -> String {
    serde_json::json!({
        "op": "subscribe",
        "args": topics,
    })
    .to_string()
}

/// A data message on a kline topic.
#[derive(Debug, Clone, PartialEq)]
pub struct KlineMessage {
    pub symbol: String,
    pub items: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    data: Option<Value>,
}

/// Decode a text frame. Anything that is not a kline data message (acks,
/// pongs, other topics, non-JSON) yields `None`.
pub fn parse_kline_message(text: &str, topics: &KlineTopics) -> Option<KlineMessage> {
    let raw: RawMessage = serde_json::from_str(text).ok()?;
    let topic = raw.topic?;
    let symbol = topics.symbol_of(&topic)?.to_string();

    let items = match raw.data {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };

    Some(KlineMessage { symbol, items })
}

/// Decode one kline item. Confirmation is checked before any numeric field.
pub fn parse_candle(symbol: &str, item: &Value) -> Result<CandleEvent, CandleRejection> {
    if !is_confirmed(item.get("confirm")) {
        return Err(CandleRejection::Unconfirmed);
    }

    let open = required_f64(item, "open")?;
    let high = required_f64(item, "high")?;
    let low = required_f64(item, "low")?;
    let close = required_f64(item, "close")?;
    // Only an absent key defaults; an explicit null is malformed
    let turnover = match item.get("turnover") {
        None => 0.0,
        Some(value) => as_f64(value).ok_or(CandleRejection::NonNumeric { field: "turnover" })?,
    };

    Ok(CandleEvent {
        symbol: symbol.to_string(),
        open,
        high,
        low,
        close,
        turnover,
        confirmed: true,
    })
}

fn is_confirmed(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => text.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn required_f64(item: &Value, field: &'static str) -> Result<f64, CandleRejection> {
    let value = item
        .get(field)
        .ok_or(CandleRejection::MissingField { field })?;
    as_f64(value).ok_or(CandleRejection::NonNumeric { field })
}

fn as_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}
