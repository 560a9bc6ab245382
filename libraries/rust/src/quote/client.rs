use async_trait::async_trait;
use chrono::Utc;
use mockall::automock;
use reqwest::Client as HTTPClient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error as ThisError;

const DEFAULT_BASE_URL: &str = "https://www.sharesansar.com";

const REQUEST_TIMEOUT_SECONDS: u64 = 5;

// Candidate upstream keys per quote field, tried in priority order. The
// provider has shipped both spellings; neither is contractually guaranteed.
const CURRENT_PRICE_KEYS: &[&str] = &["ltp", "lastPrice"];
const WEEK_52_HIGH_KEYS: &[&str] = &["high52", "fiftyTwoWeekHigh"];
const WEEK_52_LOW_KEYS: &[&str] = &["low52", "fiftyTwoWeekLow"];
const AVERAGE_120_DAY_KEYS: &[&str] = &["avg120", "averagePrice120Days"];
const MARKET_CAP_KEYS: &[&str] = &["marketCap", "mktCap"];
const OPEN_KEYS: &[&str] = &["open", "openPrice"];
const CLOSE_KEYS: &[&str] = &["close", "previousClose"];
const HIGH_KEYS: &[&str] = &["high", "highPrice"];
const LOW_KEYS: &[&str] = &["low", "lowPrice"];
const VOLUME_KEYS: &[&str] = &["volume", "totalTradedQuantity"];
const CHANGE_KEYS: &[&str] = &["change", "pointChange"];
const CHANGE_PERCENT_KEYS: &[&str] = &["changePercent", "percentageChange"];

#[derive(ThisError, Debug)]
pub enum Error {
    #[error("Network error fetching quote for {ticker}: {message}")]
    Network { ticker: String, message: String },
    #[error("Failed to parse quote response for {ticker}: {message}")]
    Parse { ticker: String, message: String },
    #[error("No data found for ticker {ticker}")]
    NoData { ticker: String },
}

/// A point-in-time quote for one listed security. Numeric fields the
/// provider omitted are zero; an absent market cap is "N/A".
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Quote {
    pub ticker: String,
    pub current_price: f64,
    #[serde(rename = "52_week_high")]
    pub week_52_high: f64,
    #[serde(rename = "52_week_low")]
    pub week_52_low: f64,
    #[serde(rename = "120_days_average")]
    pub average_120_day: f64,
    pub market_cap: String,
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    pub volume: u64,
    pub change: f64,
    pub change_percent: f64,
    pub last_updated: String,
}

#[automock]
#[async_trait]
pub trait Interface: Send + Sync {
    async fn fetch_quote(&self, ticker: String) -> Result<Quote, Error>;
}

pub struct Client {
    base_url: String,
    http_client: HTTPClient,
}

impl Client {
    pub fn new() -> Result<Self, reqwest::Error> {
        let http_client = HTTPClient::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()?;

        Ok(Client {
            base_url: DEFAULT_BASE_URL.to_string(),
            http_client,
        })
    }
}

// Provider values arrive as JSON numbers or comma-grouped strings
// ("1,250.00"); anything else counts as absent.
fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.replace(',', "").trim().parse().ok(),
        _ => None,
    }
}

fn numeric_field(data: &Value, keys: &[&str]) -> f64 {
    keys.iter()
        .find_map(|key| data.get(*key).and_then(numeric_value))
        .unwrap_or(0.0)
}

fn text_field(data: &Value, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| match data.get(*key) {
            Some(Value::String(text)) => Some(text.clone()),
            Some(Value::Number(number)) => Some(number.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| "N/A".to_string())
}

#[async_trait]
impl Interface for Client {
    async fn fetch_quote(&self, ticker: String) -> Result<Quote, Error> {
        let symbol = ticker.trim().to_uppercase();

        let url = format!(
            "{}/api/quote/{}",
            self.base_url.trim_end_matches('/'),
            symbol
        );

        let response = self
            .http_client
            .get(&url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::Network {
                ticker: symbol.clone(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(Error::Network {
                ticker: symbol.clone(),
                message: format!("upstream request failed with status {}", response.status()),
            });
        }

        let body: Value = response.json().await.map_err(|e| Error::Parse {
            ticker: symbol.clone(),
            message: e.to_string(),
        })?;

        let data = body.get("data").ok_or(Error::NoData {
            ticker: symbol.clone(),
        })?;

        Ok(Quote {
            ticker: symbol,
            current_price: numeric_field(data, CURRENT_PRICE_KEYS),
            week_52_high: numeric_field(data, WEEK_52_HIGH_KEYS),
            week_52_low: numeric_field(data, WEEK_52_LOW_KEYS),
            average_120_day: numeric_field(data, AVERAGE_120_DAY_KEYS),
            market_cap: text_field(data, MARKET_CAP_KEYS),
            open: numeric_field(data, OPEN_KEYS),
            close: numeric_field(data, CLOSE_KEYS),
            high: numeric_field(data, HIGH_KEYS),
            low: numeric_field(data, LOW_KEYS),
            volume: numeric_field(data, VOLUME_KEYS) as u64,
            change: numeric_field(data, CHANGE_KEYS),
            change_percent: numeric_field(data, CHANGE_PERCENT_KEYS),
            last_updated: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        })
    }
}
