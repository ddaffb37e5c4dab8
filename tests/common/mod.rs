#![allow(dead_code)]

use golden_zone_scanner::model::candle::Candle;
use golden_zone_scanner::model::ticker::Ticker;

pub const H4: u64 = 4 * 3_600_000;
pub const T0: u64 = 1_700_000_000_000;

pub fn candle(i: usize, close: f64, volume: f64) -> Candle {
    Candle {
        timestamp_ms: T0 + i as u64 * H4,
        open: close,
        high: close * 1.002,
        low: close * 0.998,
        close,
        volume,
    }
}

/// 42 four-hour candles: rally to 100 (index 10), sell-off to 80 (index 24),
/// then a partial recovery to 92 (index 41).
pub fn retracement_closes() -> Vec<f64> {
    (0..42)
        .map(|i| {
            let x = i as f64;
            if i <= 10 {
                90.0 + x
            } else if i <= 24 {
                100.0 - (x - 10.0) * 20.0 / 14.0
            } else {
                80.0 + (x - 24.0) * 12.0 / 17.0
            }
        })
        .collect()
}

pub fn retracement_series() -> Vec<Candle> {
    retracement_closes()
        .into_iter()
        .enumerate()
        .map(|(i, c)| candle(i, c, 1_000.0))
        .collect()
}

pub fn flat_series(len: usize, price: f64) -> Vec<Candle> {
    (0..len).map(|i| candle(i, price, 1_000.0)).collect()
}

pub fn ticker(symbol: &str, last_price: f64, quote_volume: f64, change_pct: f64) -> Ticker {
    Ticker {
        symbol: symbol.to_string(),
        last_price,
        price_change_pct: change_pct,
        quote_volume,
    }
}
