//! CoinMarketCap quote adapter.
//!
//! Fetches the latest USD quote from the `/v1/cryptocurrency/quotes/latest`
//! endpoint. Quote fields the listing omits normalize to 0 so a sparse
//! listing still produces a usable sample. Any transport or response problem
//! surfaces as `QuoteUnavailable` for that symbol only.

use crate::domain::error::SwingwatchError;
use crate::domain::price::PriceSample;
use crate::ports::quote_port::QuotePort;
use chrono::Utc;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

const QUOTES_LATEST_URL: &str =
    "https://pro-api.coinmarketcap.com/v1/cryptocurrency/quotes/latest";

#[derive(Debug, Deserialize)]
struct QuotesResponse {
    data: HashMap<String, AssetData>,
}

#[derive(Debug, Deserialize)]
struct AssetData {
    quote: QuoteBlock,
}

#[derive(Debug, Deserialize)]
struct QuoteBlock {
    #[serde(rename = "USD")]
    usd: UsdQuote,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UsdQuote {
    price: Option<f64>,
    volume_24h: Option<f64>,
    volume_change_24h: Option<f64>,
    percent_change_1h: Option<f64>,
    percent_change_24h: Option<f64>,
    percent_change_7d: Option<f64>,
    percent_change_30d: Option<f64>,
    percent_change_60d: Option<f64>,
    percent_change_90d: Option<f64>,
    market_cap: Option<f64>,
}

pub struct CoinMarketCapAdapter {
    client: reqwest::blocking::Client,
    api_key: String,
    endpoint: String,
}

impl CoinMarketCapAdapter {
    pub fn new(api_key: String) -> Result<Self, SwingwatchError> {
        Self::with_endpoint(api_key, QUOTES_LATEST_URL.to_string())
    }

    /// Endpoint override used by tests pointed at a local server.
    pub fn with_endpoint(api_key: String, endpoint: String) -> Result<Self, SwingwatchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| std::io::Error::other(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            endpoint,
        })
    }
}

impl QuotePort for CoinMarketCapAdapter {
    fn fetch_quote(&self, symbol: &str) -> Result<PriceSample, SwingwatchError> {
        let unavailable = |reason: String| SwingwatchError::QuoteUnavailable {
            symbol: symbol.to_string(),
            reason,
        };

        let response = self
            .client
            .get(&self.endpoint)
            .header("X-CMC_PRO_API_KEY", &self.api_key)
            .header("Accept", "application/json")
            .query(&[("symbol", symbol)])
            .send()
            .map_err(|e| unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unavailable(format!("HTTP {status}")));
        }

        let body = response.text().map_err(|e| unavailable(e.to_string()))?;
        parse_quote(symbol, &body, Utc::now().timestamp_millis())
    }
}

/// Parse the quotes/latest response body into a sample for `symbol`.
pub fn parse_quote(
    symbol: &str,
    body: &str,
    fetched_at: i64,
) -> Result<PriceSample, SwingwatchError> {
    let unavailable = |reason: String| SwingwatchError::QuoteUnavailable {
        symbol: symbol.to_string(),
        reason,
    };

    let response: QuotesResponse =
        serde_json::from_str(body).map_err(|e| unavailable(format!("bad response: {e}")))?;

    let asset = response
        .data
        .get(symbol)
        .ok_or_else(|| unavailable("symbol missing from response".to_string()))?;

    let usd = &asset.quote.usd;
    Ok(PriceSample {
        symbol: symbol.to_string(),
        price: usd.price.unwrap_or(0.0),
        volume_24h: usd.volume_24h.unwrap_or(0.0),
        volume_change_24h: usd.volume_change_24h.unwrap_or(0.0),
        percent_change_1h: usd.percent_change_1h.unwrap_or(0.0),
        percent_change_24h: usd.percent_change_24h.unwrap_or(0.0),
        percent_change_7d: usd.percent_change_7d.unwrap_or(0.0),
        percent_change_30d: usd.percent_change_30d.unwrap_or(0.0),
        percent_change_60d: usd.percent_change_60d.unwrap_or(0.0),
        percent_change_90d: usd.percent_change_90d.unwrap_or(0.0),
        market_cap: usd.market_cap.unwrap_or(0.0),
        fetched_at,
    })
}
