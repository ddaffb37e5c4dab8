use std::future::Future;

use anyhow::Result;

use crate::model::candle::Candle;
use crate::model::ticker::Ticker;

/// Source of tickers and candles. Retries and backoff belong to implementors.
pub trait MarketData {
    /// 24h snapshot for every listed symbol.
    fn tickers(&self) -> impl Future<Output = Result<Vec<Ticker>>> + Send;

    fn ticker(&self, symbol: &str) -> impl Future<Output = Result<Ticker>> + Send;

    /// Most recent `limit` candles, ascending by time.
    fn klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Candle>>> + Send;
}
