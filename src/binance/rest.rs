use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use crate::error::ScanError;
use crate::market::MarketData;
use crate::model::candle::Candle;
use crate::model::ticker::Ticker;

use super::types::{parse_kline_row, BinanceApiErrorResponse, BinanceTicker24h};

/// Binance allows 1200 request weight per minute; warn at 80%.
const RATE_LIMIT_WARN_THRESHOLD: u64 = 960;
const MAX_KLINE_LIMIT: usize = 1000;

/// Client for the public (unsigned) Binance spot market-data endpoints.
pub struct BinanceRestClient {
    http: reqwest::Client,
    base_url: String,
    // Simple rate limiter: request count in current minute window
    request_count: AtomicU64,
    window_start: Mutex<Instant>,
}

impl BinanceRestClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            request_count: AtomicU64::new(0),
            window_start: Mutex::new(Instant::now()),
        }
    }

    fn check_rate_limit(&self) {
        let mut start = match self.window_start.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if start.elapsed().as_secs() >= 60 {
            *start = Instant::now();
            self.request_count.store(0, Ordering::Relaxed);
        }
        let count = self.request_count.fetch_add(1, Ordering::Relaxed);
        if count > RATE_LIMIT_WARN_THRESHOLD {
            tracing::warn!(count, "Approaching rate limit (80% of 1200/min)");
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        self.check_rate_limit();

        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("GET {} failed", path))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            if let Ok(err) = serde_json::from_str::<BinanceApiErrorResponse>(&body) {
                return Err(ScanError::BinanceApi {
                    code: err.code,
                    msg: err.msg,
                }
                .into());
            }
            return Err(anyhow::anyhow!("GET {} returned {}: {}", path, status, body));
        }

        resp.json()
            .await
            .with_context(|| format!("GET {} JSON parse failed", path))
    }

    pub async fn get_24h_tickers(&self) -> Result<Vec<Ticker>> {
        let raw: Vec<BinanceTicker24h> = self.get_json("/api/v3/ticker/24hr", &[]).await?;
        tracing::debug!(count = raw.len(), "Fetched 24h tickers");
        Ok(raw.into_iter().map(Ticker::from).collect())
    }

    pub async fn get_24h_ticker(&self, symbol: &str) -> Result<Ticker> {
        let raw: BinanceTicker24h = self
            .get_json("/api/v3/ticker/24hr", &[("symbol", symbol)])
            .await?;
        Ok(raw.into())
    }

    pub async fn get_klines(&self, symbol: &str, interval: &str, limit: usize) -> Result<Vec<Candle>> {
        let limit_s = limit.clamp(1, MAX_KLINE_LIMIT).to_string();
        let rows: Vec<Value> = self
            .get_json(
                "/api/v3/klines",
                &[
                    ("symbol", symbol),
                    ("interval", interval),
                    ("limit", limit_s.as_str()),
                ],
            )
            .await?;

        let mut candles = rows
            .iter()
            .map(parse_kline_row)
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("malformed klines for {}", symbol))?;
        candles.sort_by_key(|c| c.timestamp_ms);
        Ok(candles)
    }
}

impl MarketData for BinanceRestClient {
    async fn tickers(&self) -> Result<Vec<Ticker>> {
        self.get_24h_tickers().await
    }

    async fn ticker(&self, symbol: &str) -> Result<Ticker> {
        self.get_24h_ticker(symbol).await
    }

    async fn klines(&self, symbol: &str, interval: &str, limit: usize) -> Result<Vec<Candle>> {
        self.get_klines(symbol, interval, limit).await
    }
}
