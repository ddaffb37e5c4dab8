use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use futures_util::future::join_all;

use crate::analysis::analyze_symbol;
use crate::config::{Config, ScanConfig};
use crate::error::ScanError;
use crate::market::MarketData;
use crate::model::analysis::{RetracementAnalysis, ScanResult};
use crate::model::ticker::Ticker;

/// Rules that turn the exchange's ticker list into the scan universe.
#[derive(Debug, Clone, PartialEq)]
pub struct UniverseFilter {
    pub quote_asset: String,
    pub min_volume_usd: f64,
    pub limit: usize,
    pub excluded_bases: Vec<String>,
    pub excluded_suffixes: Vec<String>,
}

impl UniverseFilter {
    pub fn from_config(config: &Config) -> Self {
        Self {
            quote_asset: config.binance.quote_asset.trim().to_ascii_uppercase(),
            min_volume_usd: config.scan.min_volume_usd,
            limit: config.scan.universe_limit,
            excluded_bases: normalize(&config.scan.excluded_bases),
            excluded_suffixes: normalize(&config.scan.excluded_suffixes),
        }
    }

    fn accepts(&self, ticker: &Ticker) -> bool {
        let symbol = ticker.symbol.to_ascii_uppercase();
        let base = match symbol.strip_suffix(&self.quote_asset) {
            Some(base) if !base.is_empty() => base,
            _ => return false,
        };
        if self.excluded_bases.iter().any(|b| b == base) {
            return false;
        }
        if self.excluded_suffixes.iter().any(|s| symbol.ends_with(s.as_str())) {
            return false;
        }
        ticker.last_price.is_finite()
            && ticker.last_price > 0.0
            && ticker.quote_volume >= self.min_volume_usd
    }
}

fn normalize(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim().to_ascii_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Filter, rank by 24h quote volume (highest first) and cap the universe.
pub fn build_universe(tickers: &[Ticker], filter: &UniverseFilter) -> Vec<Ticker> {
    let mut universe: Vec<Ticker> = tickers
        .iter()
        .filter(|t| filter.accepts(t))
        .cloned()
        .collect();
    universe.sort_by(|a, b| b.quote_volume.total_cmp(&a.quote_volume));
    universe.truncate(filter.limit);
    universe
}

/// Apply the caller's criteria, rank, and keep the top `criteria.top_n`.
/// Returns the kept analyses and how many passed the filter before trimming.
pub fn select_results(
    analyses: Vec<RetracementAnalysis>,
    criteria: &ScanConfig,
) -> (Vec<RetracementAnalysis>, usize) {
    let mut kept: Vec<RetracementAnalysis> = analyses
        .into_iter()
        .filter(|a| {
            a.retrace_pct >= criteria.min_retracement_pct
                && a.retrace_pct <= criteria.max_retracement_pct
                && a.nearest_target_distance_pct() <= criteria.target_proximity_pct
                && (!criteria.require_poc_confluence || a.confluence)
        })
        .collect();

    kept.sort_by(|a, b| {
        b.confluence
            .cmp(&a.confluence)
            .then(b.quality.cmp(&a.quality))
            .then(
                a.nearest_target_distance_pct()
                    .total_cmp(&b.nearest_target_distance_pct()),
            )
    });

    let filtered_count = kept.len();
    kept.truncate(criteria.top_n);
    (kept, filtered_count)
}

/// Scan the whole universe in fixed-size batches.
///
/// Failing to fetch the ticker universe aborts the scan. Anything that goes
/// wrong for a single symbol only drops that symbol.
pub async fn scan<M: MarketData>(market: &M, config: &Config) -> Result<ScanResult> {
    let started = Instant::now();
    let now_ms = now_ms();

    let tickers = market
        .tickers()
        .await
        .context("failed to fetch ticker universe")?;
    let universe = build_universe(&tickers, &UniverseFilter::from_config(config));
    tracing::info!(
        listed = tickers.len(),
        universe = universe.len(),
        batch_size = config.scan.batch_size,
        "Starting retracement scan"
    );

    let batch_size = config.scan.batch_size.max(1);
    let mut analyses = Vec::new();
    for (batch_idx, batch) in universe.chunks(batch_size).enumerate() {
        if batch_idx > 0 && config.scan.batch_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(config.scan.batch_delay_ms)).await;
        }

        let results = join_all(
            batch
                .iter()
                .map(|ticker| analyze_ticker(market, ticker, config, now_ms)),
        )
        .await;

        for (ticker, result) in batch.iter().zip(results) {
            match result {
                Ok(analysis) => analyses.push(analysis),
                Err(e) if e.is_upstream() => {
                    tracing::warn!(symbol = %ticker.symbol, error = %e, "Skipping symbol");
                }
                Err(e) => {
                    tracing::debug!(symbol = %ticker.symbol, error = %e, "Skipping symbol");
                }
            }
        }
        tracing::debug!(batch = batch_idx, found = analyses.len(), "Batch complete");
    }

    let total_scanned = universe.len();
    let (analyses, filtered_count) = select_results(analyses, &config.scan);
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    tracing::info!(
        total_scanned,
        filtered_count,
        returned = analyses.len(),
        elapsed_ms,
        "Scan complete"
    );

    Ok(ScanResult {
        analyses,
        total_scanned,
        filtered_count,
        elapsed_ms,
        criteria: config.scan.clone(),
    })
}

/// On-demand lookup for one symbol. Fetch failures are errors; a symbol
/// without a usable setup is `Ok(None)`.
pub async fn analyze_single<M: MarketData>(
    market: &M,
    symbol: &str,
    config: &Config,
) -> Result<Option<RetracementAnalysis>> {
    let symbol = symbol.trim().to_ascii_uppercase();
    let ticker = market
        .ticker(&symbol)
        .await
        .with_context(|| format!("failed to fetch ticker for {}", symbol))?;
    let candles = market
        .klines(
            &symbol,
            &config.binance.kline_interval,
            config.binance.candle_limit,
        )
        .await
        .with_context(|| format!("failed to fetch klines for {}", symbol))?;

    match analyze_symbol(&symbol, &candles, &ticker, &config.analysis, now_ms()) {
        Ok(analysis) => Ok(Some(analysis)),
        Err(e) => {
            tracing::debug!(symbol = %symbol, error = %e, "No retracement setup");
            Ok(None)
        }
    }
}

async fn analyze_ticker<M: MarketData>(
    market: &M,
    ticker: &Ticker,
    config: &Config,
    now_ms: u64,
) -> Result<RetracementAnalysis, ScanError> {
    let candles = market
        .klines(
            &ticker.symbol,
            &config.binance.kline_interval,
            config.binance.candle_limit,
        )
        .await
        .map_err(|e| ScanError::UpstreamFetch(format!("{:#}", e)))?;
    analyze_symbol(&ticker.symbol, &candles, ticker, &config.analysis, now_ms)
}

fn now_ms() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}
