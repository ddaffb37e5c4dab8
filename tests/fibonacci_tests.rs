use golden_zone_scanner::analysis::fibonacci::{
    fibonacci_levels, target_levels, FIB_RATIOS, GOLDEN_ZONE_RATIOS,
};
use golden_zone_scanner::model::analysis::{LevelKind, Trend};

#[test]
fn bullish_golden_zone_projects_up_from_low() {
    let targets = target_levels(100.0, 80.0, Trend::Bullish, 92.0);
    assert_eq!(targets.len(), 3);
    assert!((targets[0].ratio - 0.618).abs() < f64::EPSILON);
    assert!((targets[0].price - 92.36).abs() < 1e-9);
    assert!((targets[0].distance_to_current_pct - 0.36 / 92.0 * 100.0).abs() < 1e-9);
    assert!(targets[0].distance_to_current_pct < 5.0);
    assert!((targets[1].price - 93.0).abs() < 1e-9);
    assert!((targets[2].price - 93.2).abs() < 1e-9);
}

#[test]
fn bearish_levels_project_down_from_high() {
    let levels = fibonacci_levels(100.0, 80.0, Trend::Bearish, 90.0);
    assert!((levels[0].price - 100.0).abs() < 1e-9);
    assert!((levels[6].price - 80.0).abs() < 1e-9);
    let l618 = levels.iter().find(|l| (l.ratio - 0.618).abs() < 1e-12).unwrap();
    assert!((l618.price - 87.64).abs() < 1e-9);
}

#[test]
fn levels_are_monotonic_in_ratio() {
    let bull = fibonacci_levels(250.0, 170.0, Trend::Bullish, 200.0);
    assert!(bull.windows(2).all(|w| w[0].price < w[1].price));

    let bear = fibonacci_levels(250.0, 170.0, Trend::Bearish, 200.0);
    assert!(bear.windows(2).all(|w| w[0].price > w[1].price));

    let ratios: Vec<f64> = bull.iter().map(|l| l.ratio).collect();
    assert_eq!(ratios, FIB_RATIOS.to_vec());
}

#[test]
fn level_kinds_flip_around_the_midpoint() {
    for level in fibonacci_levels(100.0, 80.0, Trend::Bearish, 90.0) {
        let expected = if level.ratio > 0.5 {
            LevelKind::Support
        } else {
            LevelKind::Resistance
        };
        assert_eq!(level.kind, expected, "bearish ratio {}", level.ratio);
    }
    for level in fibonacci_levels(100.0, 80.0, Trend::Bullish, 90.0) {
        let expected = if level.ratio > 0.5 {
            LevelKind::Resistance
        } else {
            LevelKind::Support
        };
        assert_eq!(level.kind, expected, "bullish ratio {}", level.ratio);
    }
}

#[test]
fn targets_use_golden_zone_ratios() {
    let targets = target_levels(10.0, 5.0, Trend::Bearish, 7.0);
    let ratios: Vec<f64> = targets.iter().map(|l| l.ratio).collect();
    assert_eq!(ratios, GOLDEN_ZONE_RATIOS.to_vec());
    assert!(targets.iter().all(|l| l.kind == LevelKind::Support));
}
