pub mod confluence;
pub mod fibonacci;
pub mod retracement;
pub mod swing;
pub mod volume_profile;

use crate::config::AnalysisConfig;
use crate::error::ScanError;
use crate::model::analysis::{AnalysisMetadata, RetracementAnalysis};
use crate::model::candle::Candle;
use crate::model::ticker::Ticker;

use confluence::{has_confluence, quality_score, quality_tier, QualityInputs};
use fibonacci::{fibonacci_levels, target_levels};
use retracement::resolve_retracement;
use swing::detect_swing_points;
use volume_profile::build_volume_profile;

/// Run the full retracement pipeline for one instrument.
///
/// Pure over its inputs: the caller supplies `now_ms`, so identical candles,
/// ticker and config always produce an identical analysis. A failed volume
/// profile only drops the POC and confluence fields.
pub fn analyze_symbol(
    symbol: &str,
    candles: &[Candle],
    ticker: &Ticker,
    cfg: &AnalysisConfig,
    now_ms: u64,
) -> Result<RetracementAnalysis, ScanError> {
    let required = cfg.min_candles();
    if candles.len() < required {
        return Err(ScanError::DataInsufficient {
            required,
            available: candles.len(),
        });
    }

    let current_price = if ticker.last_price.is_finite() && ticker.last_price > 0.0 {
        ticker.last_price
    } else {
        candles[candles.len() - 1].close
    };

    let swings = detect_swing_points(candles, cfg);
    let pair = resolve_retracement(&swings, current_price, cfg)?;
    let high = pair.swing_high.price;
    let low = pair.swing_low.price;

    let fib_levels = fibonacci_levels(high, low, pair.trend, current_price);
    let target_levels = target_levels(high, low, pair.trend, current_price);

    let profile = match build_volume_profile(symbol, candles, cfg) {
        Ok(profile) => Some(profile),
        Err(e) => {
            tracing::debug!(symbol, error = %e, "Volume profile unavailable, skipping POC");
            None
        }
    };
    let confluence = profile
        .as_ref()
        .map(|p| has_confluence(&target_levels, p.poc.price, cfg.confluence_tolerance_pct))
        .unwrap_or(false);

    let most_recent_swing_ms = pair
        .swing_high
        .timestamp_ms
        .max(pair.swing_low.timestamp_ms);
    let quality_score = quality_score(&QualityInputs {
        swing_high_strength: pair.swing_high.strength,
        swing_low_strength: pair.swing_low.strength,
        volume_24h: ticker.quote_volume,
        price_change_24h_pct: ticker.price_change_pct,
        confluence,
        most_recent_swing_age_ms: now_ms.saturating_sub(most_recent_swing_ms),
    });

    Ok(RetracementAnalysis {
        symbol: symbol.to_string(),
        trend: pair.trend,
        swing_high: pair.swing_high,
        swing_low: pair.swing_low,
        current_price,
        fib_levels,
        target_levels,
        poc_level: profile.as_ref().map(|p| p.poc.clone()),
        value_area_high: profile.as_ref().map(|p| p.value_area_high),
        value_area_low: profile.as_ref().map(|p| p.value_area_low),
        confluence,
        quality: quality_tier(quality_score),
        quality_score,
        retrace_pct: pair.retrace_pct,
        metadata: AnalysisMetadata {
            price_change_24h_pct: ticker.price_change_pct,
            volume_24h: ticker.quote_volume,
            computed_at_ms: now_ms,
        },
    })
}
