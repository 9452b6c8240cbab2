//! Bybit instrument universe
//!
//! Pages through `/v5/market/instruments-info` until no continuation cursor is
//! returned, keeping USDT-quoted instruments with status `Trading`.

use crate::domain::ports::UniverseProvider;
use crate::infrastructure::core::http_client_factory::{
    HttpClientFactory, HttpClientSettings, build_url_with_query,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

const QUOTE_COIN: &str = "USDT";
const TRADING_STATUS: &str = "Trading";

#[derive(Debug, Deserialize)]
struct InstrumentsResponse {
    #[serde(default)]
    result: Option<InstrumentsPage>,
}

#[derive(Debug, Default, Deserialize)]
struct InstrumentsPage {
    #[serde(default)]
    list: Option<Vec<InstrumentInfo>>,
    #[serde(rename = "nextPageCursor", default)]
    next_page_cursor: Option<String>,
    #[serde(default)]
    cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InstrumentInfo {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(rename = "quoteCoin", default)]
    quote_coin: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

impl InstrumentsPage {
    /// Tradable USDT symbols on this page.
    fn tradable_symbols(&self) -> impl Iterator<Item = &str> {
        self.list
            .iter()
            .flatten()
            .filter(|i| {
                i.quote_coin.as_deref() == Some(QUOTE_COIN)
                    && i.status.as_deref() == Some(TRADING_STATUS)
            })
            .filter_map(|i| i.symbol.as_deref())
    }

    fn continuation(&self) -> Option<String> {
        [&self.next_page_cursor, &self.cursor]
            .into_iter()
            .flatten()
            .find(|c| !c.is_empty())
            .cloned()
    }
}

pub struct BybitUniverseProvider {
    client: ClientWithMiddleware,
    base_url: String,
    category: String,
    page_limit: u32,
}

impl BybitUniverseProvider {
    pub fn new(base_url: String, category: String, page_limit: u32) -> Self {
        Self {
            client: HttpClientFactory::create_client(HttpClientSettings::default()),
            base_url,
            category,
            page_limit,
        }
    }

    async fn fetch_page(&self, cursor: Option<&str>) -> Result<InstrumentsPage> {
        let url = format!(
            "{}/v5/market/instruments-info",
            self.base_url.trim_end_matches('/')
        );
        let limit = self.page_limit.to_string();
        let mut params = vec![("category", self.category.as_str()), ("limit", limit.as_str())];
        if let Some(cursor) = cursor {
            params.push(("cursor", cursor));
        }

        let response = self
            .client
            .get(build_url_with_query(&url, &params))
            .send()
            .await
            .context("Failed to fetch instruments-info from Bybit")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Bybit instruments-info failed ({}): {}", status, error_text);
        }

        let body: InstrumentsResponse = response
            .json()
            .await
            .context("Failed to parse Bybit instruments-info")?;

        Ok(body.result.unwrap_or_default())
    }
}

#[async_trait]
impl UniverseProvider for BybitUniverseProvider {
    async fn fetch_universe(&self) -> BTreeSet<String> {
        let mut symbols = BTreeSet::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = match self.fetch_page(cursor.as_deref()).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(
                        "Symbol fetch error, keeping {} symbols collected so far: {:#}",
                        symbols.len(),
                        e
                    );
                    break;
                }
            };

            symbols.extend(page.tradable_symbols().map(String::from));
            debug!("Fetched instruments page, {} symbols so far", symbols.len());

            match page.continuation() {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        info!("BybitUniverseProvider: {} tradable USDT symbols", symbols.len());
        symbols
    }
}
