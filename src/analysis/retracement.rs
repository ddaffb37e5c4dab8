use crate::config::AnalysisConfig;
use crate::error::ScanError;
use crate::model::analysis::Trend;
use crate::model::swing::{SwingKind, SwingPoint};

/// A swing high/low pair the current price is retracing inside.
#[derive(Debug, Clone, PartialEq)]
pub struct RetracementPair {
    pub trend: Trend,
    pub swing_high: SwingPoint,
    pub swing_low: SwingPoint,
    /// How far price has travelled back from the newer extreme toward the older one, 0..=100.
    pub retrace_pct: f64,
}

/// Pick the first recent high/low pair that describes an in-progress retracement.
///
/// Only swings with `strength >= min_pair_strength` are considered, at most
/// `recent_swings_per_side` of each kind. Pairs are tried newest first and the
/// first acceptable one wins; there is no search for a better-scoring pair.
pub fn resolve_retracement(
    swings: &[SwingPoint],
    current_price: f64,
    cfg: &AnalysisConfig,
) -> Result<RetracementPair, ScanError> {
    let highs = recent_of_kind(swings, SwingKind::High, cfg);
    let lows = recent_of_kind(swings, SwingKind::Low, cfg);

    let mut pairs: Vec<(&SwingPoint, &SwingPoint)> = highs
        .iter()
        .flat_map(|h| lows.iter().map(move |l| (*h, *l)))
        .collect();
    // Newest pair first: by the newer leg, then by the older leg.
    pairs.sort_by(|a, b| {
        let (a_newer, a_older) = pair_span(a.0, a.1);
        let (b_newer, b_older) = pair_span(b.0, b.1);
        b_newer.cmp(&a_newer).then(b_older.cmp(&a_older))
    });

    pairs
        .into_iter()
        .find_map(|(high, low)| evaluate_pair(high, low, current_price, cfg))
        .ok_or(ScanError::NoValidSwingPair)
}

fn recent_of_kind<'a>(
    swings: &'a [SwingPoint],
    kind: SwingKind,
    cfg: &AnalysisConfig,
) -> Vec<&'a SwingPoint> {
    let mut out: Vec<&SwingPoint> = swings
        .iter()
        .filter(|s| s.kind == kind && s.strength >= cfg.min_pair_strength)
        .collect();
    out.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));
    out.truncate(cfg.recent_swings_per_side);
    out
}

fn pair_span(high: &SwingPoint, low: &SwingPoint) -> (u64, u64) {
    (
        high.timestamp_ms.max(low.timestamp_ms),
        high.timestamp_ms.min(low.timestamp_ms),
    )
}

fn evaluate_pair(
    high: &SwingPoint,
    low: &SwingPoint,
    current_price: f64,
    cfg: &AnalysisConfig,
) -> Option<RetracementPair> {
    if high.timestamp_ms.abs_diff(low.timestamp_ms) < cfg.min_pair_separation_ms() {
        return None;
    }

    let range = high.price - low.price;
    if range <= 0.0 || range / high.price * 100.0 < cfg.min_pair_range_pct {
        return None;
    }
    if current_price < low.price || current_price > high.price {
        return None;
    }

    // The newer extreme sets direction: a fresh high is being given back (bearish),
    // a fresh low is being recovered from (bullish).
    let (trend, retrace_pct) = if high.timestamp_ms > low.timestamp_ms {
        (Trend::Bearish, (high.price - current_price) / range * 100.0)
    } else {
        (Trend::Bullish, (current_price - low.price) / range * 100.0)
    };

    if retrace_pct < cfg.min_valid_retrace_pct || retrace_pct > cfg.max_valid_retrace_pct {
        return None;
    }

    Some(RetracementPair {
        trend,
        swing_high: high.clone(),
        swing_low: low.clone(),
        retrace_pct,
    })
}
