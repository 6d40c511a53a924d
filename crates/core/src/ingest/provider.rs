use crate::config::Settings;
use crate::domain::snapshot::{Fundamentals, MarketSummary, StockSnapshot};
use crate::error::ChecklistError;
use crate::ingest::types::{HistoryResponse, OwnershipResponse};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RETRIES: u32 = 3;
const DEFAULT_BENCHMARK_TICKER: &str = "^GSPC";
const DEFAULT_HISTORY_START: &str = "2010-01-01";
const DEFAULT_HISTORY_INTERVAL: &str = "1mo";
const MAX_TICKER_LEN: usize = 16;

#[async_trait::async_trait]
pub trait SnapshotProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Gathers everything known about `ticker`. Sections the upstream could
    /// not deliver are left empty rather than failing the whole snapshot.
    async fn fetch_snapshot(&self, ticker: &str) -> Result<StockSnapshot>;
}

#[derive(Debug, Clone)]
pub struct HttpJsonSnapshotProvider {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
    retries: u32,
    benchmark_ticker: String,
    history_start: NaiveDate,
    history_interval: String,
}

impl HttpJsonSnapshotProvider {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings.require_data_provider_base_url()?;
        let base_url = Url::parse(base_url)
            .with_context(|| format!("DATA_PROVIDER_BASE_URL is not a valid URL: {base_url}"))?;
        let api_key = settings.data_provider_api_key.clone();

        let timeout_secs = std::env::var("DATA_PROVIDER_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let retries = std::env::var("DATA_PROVIDER_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_RETRIES);

        let benchmark_ticker = std::env::var("BENCHMARK_TICKER")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BENCHMARK_TICKER.to_string());

        let history_start = std::env::var("HISTORY_START_DATE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HISTORY_START.to_string());
        let history_start = NaiveDate::parse_from_str(history_start.trim(), "%Y-%m-%d")
            .with_context(|| format!("HISTORY_START_DATE must be YYYY-MM-DD (got {history_start})"))?;

        let history_interval = std::env::var("HISTORY_INTERVAL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HISTORY_INTERVAL.to_string());

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build data provider http client")?;

        Ok(Self {
            http,
            base_url,
            api_key,
            retries,
            benchmark_ticker,
            history_start,
            history_interval,
        })
    }

    /// `{base}/v1/{resource}/{ticker}`. The ticker is escaped as one path segment.
    fn endpoint(&self, resource: &str, ticker: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("DATA_PROVIDER_BASE_URL cannot be a base URL"))?
            .pop_if_empty()
            .extend(["v1", resource, ticker]);
        Ok(url)
    }

    fn history_query(&self, to: NaiveDate) -> Vec<(&'static str, String)> {
        vec![
            ("from", self.history_start.to_string()),
            ("to", to.to_string()),
            ("interval", self.history_interval.clone()),
        ]
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &self.api_key {
            headers.insert("x-api-key", HeaderValue::from_str(api_key)?);
        }
        Ok(headers)
    }

    async fn fetch_once<T: DeserializeOwned>(
        &self,
        url: &Url,
        query: &[(&'static str, String)],
    ) -> Result<T> {
        let headers = self.headers()?;

        let res = self
            .http
            .get(url.clone())
            .headers(headers)
            .query(query)
            .send()
            .await
            .with_context(|| format!("data provider request failed: {url}"))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read provider response")?;

        if !status.is_success() {
            anyhow::bail!("data provider HTTP {status} for {url}: {text}");
        }

        serde_json::from_str::<T>(&text)
            .with_context(|| format!("failed to parse provider response from {url}"))
    }

    async fn fetch_with_retry<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&'static str, String)],
    ) -> Result<T> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.fetch_once(&url, query).await {
                Ok(parsed) => return Ok(parsed),
                Err(err) => {
                    if attempt >= self.retries {
                        return Err(err);
                    }
                    let backoff = Duration::from_secs(1 << (attempt - 1));
                    tracing::warn!(attempt, ?backoff, %url, error = %err, "data provider fetch failed; retrying");
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl SnapshotProvider for HttpJsonSnapshotProvider {
    fn provider_name(&self) -> &'static str {
        "external_http_json"
    }

    async fn fetch_snapshot(&self, ticker: &str) -> Result<StockSnapshot> {
        let ticker = validate_ticker(ticker)?;

        let query = self.history_query(chrono::Utc::now().date_naive());
        let quote_url = self.endpoint("quote", ticker)?;
        let fundamentals_url = self.endpoint("fundamentals", ticker)?;
        let ownership_url = self.endpoint("ownership", ticker)?;
        let history_url = self.endpoint("history", ticker)?;
        let benchmark_url = self.endpoint("history", &self.benchmark_ticker)?;

        let (quote, fundamentals, ownership, history, benchmark) = tokio::join!(
            self.fetch_with_retry::<MarketSummary>(quote_url, &[]),
            self.fetch_with_retry::<Fundamentals>(fundamentals_url, &[]),
            self.fetch_with_retry::<OwnershipResponse>(ownership_url, &[]),
            self.fetch_with_retry::<HistoryResponse>(history_url, &query),
            self.fetch_with_retry::<HistoryResponse>(benchmark_url, &query),
        );

        let snapshot = StockSnapshot {
            ticker: ticker.to_string(),
            fundamentals: section(ticker, "fundamentals", fundamentals),
            ownership: section(ticker, "ownership", ownership).map(|o| o.records),
            price_series: section(ticker, "history", history).map(|h| h.bars),
            benchmark_price_series: section(ticker, "benchmark_history", benchmark).map(|h| h.bars),
            market_summary: section(ticker, "quote", quote),
        };

        tracing::info!(
            %ticker,
            provider = self.provider_name(),
            quote = snapshot.market_summary.is_some(),
            fundamentals = snapshot.fundamentals.is_some(),
            ownership = snapshot.ownership.is_some(),
            price_bars = snapshot.prices().len(),
            benchmark_bars = snapshot.benchmark_prices().len(),
            "fetched stock snapshot"
        );

        Ok(snapshot)
    }
}

/// A failed section degrades to `None`; the checklist reports no verdict for
/// the rows that needed it.
fn section<T>(ticker: &str, name: &'static str, res: Result<T>) -> Option<T> {
    match res {
        Ok(v) => Some(v),
        Err(err) => {
            tracing::warn!(%ticker, section = name, error = %format!("{err:#}"), "snapshot section unavailable");
            None
        }
    }
}

/// Trims and checks a ticker symbol before it reaches the network.
pub fn validate_ticker(ticker: &str) -> Result<&str> {
    let ticker = ticker.trim();
    if ticker.is_empty() {
        return Err(ChecklistError::MissingTicker.into());
    }
    anyhow::ensure!(
        ticker.len() <= MAX_TICKER_LEN,
        "ticker symbol is too long: {ticker}"
    );
    anyhow::ensure!(
        ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')),
        "ticker symbol has invalid characters: {ticker}"
    );
    Ok(ticker)
}
