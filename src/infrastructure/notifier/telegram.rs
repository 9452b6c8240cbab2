//! Telegram signal notifier
//!
//! Sends one HTML message per signal with two inline buttons: the exchange
//! trade view and the market-data page of the base asset.

use crate::domain::errors::NotifyError;
use crate::domain::ports::SignalSink;
use crate::domain::trading::types::SignalEvent;
use crate::infrastructure::core::http_client_factory::{HttpClientFactory, HttpClientSettings};
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

pub struct TelegramNotifier {
    client: ClientWithMiddleware,
    api_url: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(api_url: String, token: String, chat_id: String, timeout: Duration) -> Self {
        // No retries: a retried POST can deliver the same alert twice
        let client = HttpClientFactory::create_client(HttpClientSettings {
            timeout,
            connect_timeout: timeout,
            max_retries: 0,
        });

        Self {
            client,
            api_url,
            token,
            chat_id,
        }
    }

    pub fn build_payload(&self, signal: &SignalEvent) -> Value {
        let trade_url = trade_url(&signal.symbol);
        json!({
            "chat_id": self.chat_id,
            "text": format_message(signal),
            "parse_mode": "HTML",
            "reply_markup": {
                "inline_keyboard": [[
                    {"text": "📈 Open chart", "url": trade_url},
                    {"text": "📊 CoinMarketCap", "url": market_data_url(signal)}
                ]]
            }
        })
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_url.trim_end_matches('/'),
            self.token
        )
    }
}

#[async_trait]
impl SignalSink for TelegramNotifier {
    async fn publish(&self, signal: &SignalEvent) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(self.send_message_url())
            .header("Content-Type", "application/json")
            .body(self.build_payload(signal).to_string())
            .send()
            .await
            .map_err(|e| NotifyError::Transport {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Telegram notification sent for {}", signal.symbol);
        Ok(())
    }
}

pub fn trade_url(symbol: &str) -> String {
    format!("https://www.bybit.com/trade/usdt/{}", symbol)
}

pub fn market_data_url(signal: &SignalEvent) -> String {
    format!(
        "https://coinmarketcap.com/currencies/{}/",
        signal.base_asset().to_lowercase()
    )
}

pub fn format_message(signal: &SignalEvent) -> String {
    format!(
        "🔥 <a href='{}'>{}</a> +{:.2}%\nPrice: {}\nTurnover: ${}\nTime: {}",
        trade_url(&signal.symbol),
        signal.symbol,
        signal.change_pct(),
        signal.close_price,
        format_thousands(signal.turnover),
        signal.timestamp.format("%Y-%m-%d %H:%M UTC")
    )
}

/// Round to a whole number and group digits with commas.
fn format_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        grouped.insert(0, '-');
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn signal() -> SignalEvent {
        SignalEvent {
            symbol: "SOLUSDT".to_string(),
            change_fraction: 0.0123,
            close_price: 142.5,
            turnover: 1_234_567.6,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 14, 7, 33).unwrap(),
        }
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.4), "999");
        assert_eq!(format_thousands(1000.0), "1,000");
        assert_eq!(format_thousands(1_234_567.6), "1,234,568");
        assert_eq!(format_thousands(-50_000.0), "-50,000");
    }

    #[test]
    fn test_message_text() {
        let text = format_message(&signal());
        assert!(text.contains("<a href='https://www.bybit.com/trade/usdt/SOLUSDT'>SOLUSDT</a> +1.23%"));
        assert!(text.contains("Price: 142.5"));
        assert!(text.contains("Turnover: $1,234,568"));
        assert!(text.contains("Time: 2024-03-01 14:07 UTC"));
    }

    #[test]
    fn test_payload_links() {
        let notifier = TelegramNotifier::new(
            "https://api.telegram.org/".to_string(),
            "123:abc".to_string(),
            "-100200".to_string(),
            Duration::from_secs(10),
        );
        let payload = notifier.build_payload(&signal());

        assert_eq!(payload["chat_id"], "-100200");
        assert_eq!(payload["parse_mode"], "HTML");
        let buttons = &payload["reply_markup"]["inline_keyboard"][0];
        assert_eq!(buttons[0]["url"], "https://www.bybit.com/trade/usdt/SOLUSDT");
        assert_eq!(buttons[1]["url"], "https://coinmarketcap.com/currencies/sol/");
        assert_eq!(
            notifier.send_message_url(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }
}
