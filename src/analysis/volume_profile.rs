use std::collections::BTreeMap;

use crate::config::AnalysisConfig;
use crate::error::ScanError;
use crate::model::candle::Candle;
use crate::model::profile::{TimeWindow, VolumeProfile, VolumeProfileLevel};

/// Approximate a volume-by-price histogram from OHLCV candles.
///
/// Each candle's volume is spread evenly over `round(range / step)` price
/// steps starting at its low; a flat candle puts everything on its one price.
/// The step comes from `cfg.price_step`. With the default fixed step the
/// bucket count scales with absolute price, so expensive instruments can hit
/// `max_steps_per_candle` and fail with `ProfileApproximation`.
pub fn build_volume_profile(
    symbol: &str,
    candles: &[Candle],
    cfg: &AnalysisConfig,
) -> Result<VolumeProfile, ScanError> {
    let (first, last) = match (candles.first(), candles.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return Err(ScanError::ProfileApproximation("no candles".to_string())),
    };

    let step = cfg.price_step.resolve(last.close);
    if !step.is_finite() || step <= 0.0 {
        return Err(ScanError::ProfileApproximation(format!(
            "invalid price step {step}"
        )));
    }

    let buckets = accumulate(candles, step, cfg.max_steps_per_candle)?;
    let total_volume: f64 = buckets.values().sum();
    if !total_volume.is_finite() || total_volume <= 0.0 {
        return Err(ScanError::ProfileApproximation(
            "zero total volume".to_string(),
        ));
    }

    // Price-ordered (price, volume) pairs.
    let by_price: Vec<(f64, f64)> = buckets
        .iter()
        .map(|(&key, &volume)| (key as f64 * step, volume))
        .collect();

    let mut poc_idx = 0;
    for (i, &(_, volume)) in by_price.iter().enumerate() {
        if volume > by_price[poc_idx].1 {
            poc_idx = i;
        }
    }

    let (val_idx, vah_idx) =
        value_area_bounds(&by_price, poc_idx, total_volume * cfg.value_area_share);

    let mut levels: Vec<VolumeProfileLevel> = by_price
        .iter()
        .enumerate()
        .map(|(i, &(price, volume))| VolumeProfileLevel {
            price,
            volume,
            percentage_of_total: volume / total_volume * 100.0,
            is_poc: i == poc_idx,
            is_value_area_high: i == vah_idx,
            is_value_area_low: i == val_idx,
        })
        .collect();
    let poc = levels[poc_idx].clone();
    let value_area_high = levels[vah_idx].price;
    let value_area_low = levels[val_idx].price;

    levels.sort_by(|a, b| {
        b.volume
            .total_cmp(&a.volume)
            .then_with(|| b.is_poc.cmp(&a.is_poc))
    });

    tracing::trace!(
        symbol,
        levels = levels.len(),
        poc = poc.price,
        value_area_high,
        value_area_low,
        "Volume profile built"
    );

    Ok(VolumeProfile {
        symbol: symbol.to_string(),
        time_window: TimeWindow {
            start_ms: first.timestamp_ms,
            end_ms: last.timestamp_ms,
        },
        levels,
        poc,
        value_area_high,
        value_area_low,
        total_volume,
    })
}

fn accumulate(
    candles: &[Candle],
    step: f64,
    max_steps_per_candle: usize,
) -> Result<BTreeMap<i64, f64>, ScanError> {
    let mut buckets: BTreeMap<i64, f64> = BTreeMap::new();
    for candle in candles {
        if !candle.volume.is_finite() || candle.volume <= 0.0 {
            continue;
        }
        let raw_steps = (candle.range() / step).round();
        if !raw_steps.is_finite() || raw_steps > max_steps_per_candle as f64 {
            return Err(ScanError::ProfileApproximation(format!(
                "candle range {} needs {raw_steps} steps of {step}",
                candle.range()
            )));
        }
        // Non-negative and capped above.
        let steps = raw_steps.max(0.0) as usize;

        if steps == 0 {
            *buckets.entry(bucket_key(candle.high, step)).or_insert(0.0) += candle.volume;
            continue;
        }
        let per_step = candle.volume / steps as f64;
        // Offsets from one rounded base so each step owns exactly one bucket.
        let base = bucket_key(candle.low, step);
        for k in 0..steps {
            *buckets.entry(base + k as i64).or_insert(0.0) += per_step;
        }
    }
    Ok(buckets)
}

fn bucket_key(price: f64, step: f64) -> i64 {
    (price / step).round() as i64
}

/// Grow the value area outward from the POC, always taking the heavier
/// neighbour, until `target` volume is covered or both sides run out.
/// Returns `(low_idx, high_idx)` into the price-ordered levels.
fn value_area_bounds(by_price: &[(f64, f64)], poc_idx: usize, target: f64) -> (usize, usize) {
    let mut lo = poc_idx;
    let mut hi = poc_idx;
    let mut covered = by_price[poc_idx].1;

    while covered < target && (lo > 0 || hi + 1 < by_price.len()) {
        let above = by_price.get(hi + 1).map(|&(_, v)| v);
        let below = if lo > 0 { Some(by_price[lo - 1].1) } else { None };
        match (above, below) {
            (Some(up), Some(down)) if up >= down => {
                hi += 1;
                covered += up;
            }
            (_, Some(down)) => {
                lo -= 1;
                covered += down;
            }
            (Some(up), None) => {
                hi += 1;
                covered += up;
            }
            (None, None) => break,
        }
    }
    (lo, hi)
}
