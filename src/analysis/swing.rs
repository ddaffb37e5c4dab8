use crate::config::AnalysisConfig;
use crate::model::candle::Candle;
use crate::model::swing::{SwingKind, SwingPoint};

/// Half-width of the window used to grade swing strength.
const STRENGTH_WINDOW: usize = 3;
const MAX_STRENGTH: f64 = 10.0;

/// Find significant swing highs and lows, newest first.
///
/// A candle at index `i` is a swing high when its high strictly exceeds every
/// other high in `[i - L, i + L]` and sits at least `min_swing_pct` above the
/// average of those neighbouring highs. Lows mirror the rule. Series shorter
/// than `2L + 1` yield no swings. Same-type swings closer than
/// `min_swing_separation_periods` candles are collapsed to the stronger one.
pub fn detect_swing_points(candles: &[Candle], cfg: &AnalysisConfig) -> Vec<SwingPoint> {
    let lookback = cfg.swing_lookback;
    if lookback == 0 || candles.len() < cfg.min_candles() {
        return Vec::new();
    }

    let mut swings = Vec::new();
    for i in lookback..candles.len() - lookback {
        let candle = &candles[i];
        let window = &candles[i - lookback..=i + lookback];

        if is_strict_extreme(window, lookback, |c| c.high, |a, b| a > b) {
            let avg = neighbour_average(window, lookback, |c| c.high);
            if pct_change(avg, candle.high) >= cfg.min_swing_pct {
                swings.push(swing_at(candles, i, SwingKind::High));
            }
        }

        if is_strict_extreme(window, lookback, |c| c.low, |a, b| a < b) {
            let avg = neighbour_average(window, lookback, |c| c.low);
            if -pct_change(avg, candle.low) >= cfg.min_swing_pct {
                swings.push(swing_at(candles, i, SwingKind::Low));
            }
        }
    }

    let mut filtered = filter_close_swings(swings, cfg.min_swing_separation_ms());
    filtered.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));
    tracing::trace!(count = filtered.len(), "Swing points detected");
    filtered
}

/// Drop same-type swings closer than `min_distance_ms`, keeping the stronger
/// swing of each colliding pair (newer wins on equal strength). Output is newest first.
pub fn filter_close_swings(mut swings: Vec<SwingPoint>, min_distance_ms: u64) -> Vec<SwingPoint> {
    swings.sort_by(|a, b| {
        b.strength
            .cmp(&a.strength)
            .then(b.timestamp_ms.cmp(&a.timestamp_ms))
    });

    let mut kept: Vec<SwingPoint> = Vec::with_capacity(swings.len());
    for swing in swings {
        let collides = kept.iter().any(|k| {
            k.kind == swing.kind && k.timestamp_ms.abs_diff(swing.timestamp_ms) < min_distance_ms
        });
        if !collides {
            kept.push(swing);
        }
    }

    kept.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));
    kept
}

fn is_strict_extreme(
    window: &[Candle],
    center: usize,
    value: impl Fn(&Candle) -> f64,
    beats: impl Fn(f64, f64) -> bool,
) -> bool {
    let pivot = value(&window[center]);
    window
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != center)
        .all(|(_, c)| beats(pivot, value(c)))
}

fn neighbour_average(window: &[Candle], center: usize, value: impl Fn(&Candle) -> f64) -> f64 {
    let (sum, n) = window
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != center)
        .fold((0.0, 0usize), |(sum, n), (_, c)| (sum + value(c), n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Signed move from `from` to `to`, in percent of `from`.
fn pct_change(from: f64, to: f64) -> f64 {
    if from <= 0.0 {
        return 0.0;
    }
    (to - from) / from * 100.0
}

fn swing_at(candles: &[Candle], index: usize, kind: SwingKind) -> SwingPoint {
    let candle = &candles[index];
    let price = match kind {
        SwingKind::High => candle.high,
        SwingKind::Low => candle.low,
    };
    SwingPoint {
        kind,
        price,
        timestamp_ms: candle.timestamp_ms,
        index,
        strength: swing_strength(candles, index, kind),
        volume: candle.volume,
    }
}

/// Largest % deviation of the swing price from the same-side extremes of
/// nearby candles, rounded and clamped to 1..=10.
fn swing_strength(candles: &[Candle], index: usize, kind: SwingKind) -> u8 {
    let start = index.saturating_sub(STRENGTH_WINDOW);
    let end = (index + STRENGTH_WINDOW).min(candles.len() - 1);
    let pivot = &candles[index];

    let max_dev = (start..=end)
        .filter(|&j| j != index)
        .map(|j| match kind {
            SwingKind::High => pct_change(candles[j].high, pivot.high),
            SwingKind::Low => -pct_change(candles[j].low, pivot.low),
        })
        .fold(0.0_f64, f64::max);

    // Bounded to 1..=10 before the cast.
    max_dev.round().clamp(1.0, MAX_STRENGTH) as u8
}
