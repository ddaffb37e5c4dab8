mod common;

use common::{candle, retracement_series, H4, T0};
use golden_zone_scanner::analysis::swing::{detect_swing_points, filter_close_swings};
use golden_zone_scanner::config::AnalysisConfig;
use golden_zone_scanner::model::candle::Candle;
use golden_zone_scanner::model::swing::{SwingKind, SwingPoint};

fn flat_with_spike(len: usize, spike_idx: usize, spike_high: f64) -> Vec<Candle> {
    (0..len)
        .map(|i| Candle {
            timestamp_ms: T0 + i as u64 * H4,
            open: 100.0,
            high: if i == spike_idx { spike_high } else { 100.0 },
            low: 100.0,
            close: 100.0,
            volume: 10.0,
        })
        .collect()
}

fn swing(kind: SwingKind, price: f64, hours: u64, strength: u8) -> SwingPoint {
    SwingPoint {
        kind,
        price,
        timestamp_ms: T0 + hours * 3_600_000,
        index: 0,
        strength,
        volume: 0.0,
    }
}

#[test]
fn too_few_candles_yields_no_swings() {
    let cfg = AnalysisConfig::default();
    let candles: Vec<Candle> = (0..10).map(|i| candle(i, 100.0 + i as f64, 1.0)).collect();
    assert!(detect_swing_points(&candles, &cfg).is_empty());
}

#[test]
fn finds_peak_and_trough_newest_first() {
    let cfg = AnalysisConfig::default();
    let swings = detect_swing_points(&retracement_series(), &cfg);

    assert_eq!(swings.len(), 2);
    assert_eq!(swings[0].kind, SwingKind::Low);
    assert_eq!(swings[0].index, 24);
    assert!((swings[0].price - 80.0 * 0.998).abs() < 1e-9);
    assert_eq!(swings[0].strength, 5);

    assert_eq!(swings[1].kind, SwingKind::High);
    assert_eq!(swings[1].index, 10);
    assert!((swings[1].price - 100.0 * 1.002).abs() < 1e-9);
    assert_eq!(swings[1].strength, 4);
    assert!((swings[1].volume - 1_000.0).abs() < f64::EPSILON);
}

#[test]
fn shallow_wiggle_is_not_a_swing() {
    let cfg = AnalysisConfig::default();
    let candles = flat_with_spike(30, 15, 101.0);
    assert!(detect_swing_points(&candles, &cfg).is_empty());
}

#[test]
fn significant_spike_is_a_swing_high() {
    let cfg = AnalysisConfig::default();
    let candles = flat_with_spike(30, 15, 105.0);
    let swings = detect_swing_points(&candles, &cfg);
    assert_eq!(swings.len(), 1);
    assert_eq!(swings[0].kind, SwingKind::High);
    assert_eq!(swings[0].index, 15);
    assert_eq!(swings[0].strength, 5);
}

#[test]
fn strength_is_capped_at_ten() {
    let cfg = AnalysisConfig::default();
    let candles = flat_with_spike(30, 15, 150.0);
    let swings = detect_swing_points(&candles, &cfg);
    assert_eq!(swings[0].strength, 10);
}

#[test]
fn close_same_type_swings_keep_the_stronger() {
    let swings = vec![
        swing(SwingKind::High, 101.0, 0, 3),
        swing(SwingKind::High, 102.0, 6, 7),
    ];
    let filtered = filter_close_swings(swings, 12 * 3_600_000);
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].strength, 7);
}

#[test]
fn close_swings_of_different_type_both_survive() {
    let swings = vec![
        swing(SwingKind::High, 101.0, 0, 3),
        swing(SwingKind::Low, 90.0, 6, 7),
        swing(SwingKind::High, 105.0, 48, 2),
    ];
    let filtered = filter_close_swings(swings, 12 * 3_600_000);
    assert_eq!(filtered.len(), 3);
    let times: Vec<u64> = filtered.iter().map(|s| s.timestamp_ms).collect();
    let mut sorted = times.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(times, sorted);
}
