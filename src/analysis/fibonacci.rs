use crate::model::analysis::{FibonacciLevel, LevelKind, Trend};

pub const FIB_RATIOS: [f64; 7] = [0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0];

/// The "golden zone" a setup is expected to react from.
pub const GOLDEN_ZONE_RATIOS: [f64; 3] = [0.618, 0.65, 0.66];

pub fn fibonacci_level(
    swing_high: f64,
    swing_low: f64,
    trend: Trend,
    ratio: f64,
    current_price: f64,
) -> FibonacciLevel {
    let range = swing_high - swing_low;
    let (price, kind) = match trend {
        Trend::Bearish => {
            let kind = if ratio > 0.5 {
                LevelKind::Support
            } else {
                LevelKind::Resistance
            };
            (swing_high - range * ratio, kind)
        }
        Trend::Bullish => {
            let kind = if ratio > 0.5 {
                LevelKind::Resistance
            } else {
                LevelKind::Support
            };
            (swing_low + range * ratio, kind)
        }
    };

    FibonacciLevel {
        ratio,
        price,
        distance_to_current_pct: distance_pct(price, current_price),
        kind,
    }
}

/// Levels for every canonical ratio, ordered by ratio.
pub fn fibonacci_levels(
    swing_high: f64,
    swing_low: f64,
    trend: Trend,
    current_price: f64,
) -> Vec<FibonacciLevel> {
    FIB_RATIOS
        .iter()
        .map(|&r| fibonacci_level(swing_high, swing_low, trend, r, current_price))
        .collect()
}

pub fn target_levels(
    swing_high: f64,
    swing_low: f64,
    trend: Trend,
    current_price: f64,
) -> Vec<FibonacciLevel> {
    GOLDEN_ZONE_RATIOS
        .iter()
        .map(|&r| fibonacci_level(swing_high, swing_low, trend, r, current_price))
        .collect()
}

fn distance_pct(price: f64, current_price: f64) -> f64 {
    if current_price <= 0.0 {
        return f64::INFINITY;
    }
    (price - current_price).abs() / current_price * 100.0
}
