use crate::model::analysis::{FibonacciLevel, Quality};

const DAY_MS: f64 = 86_400_000.0;
const CONFLUENCE_BONUS: f64 = 25.0;
const STRENGTH_WEIGHT: f64 = 1.5;

/// True when any golden-zone level sits within `tolerance_pct` of the POC price.
pub fn has_confluence(targets: &[FibonacciLevel], poc_price: f64, tolerance_pct: f64) -> bool {
    if !poc_price.is_finite() || poc_price <= 0.0 {
        return false;
    }
    targets
        .iter()
        .any(|t| (t.price - poc_price).abs() / poc_price * 100.0 <= tolerance_pct)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityInputs {
    pub swing_high_strength: u8,
    pub swing_low_strength: u8,
    pub volume_24h: f64,
    pub price_change_24h_pct: f64,
    pub confluence: bool,
    /// Age of the more recent of the two swings.
    pub most_recent_swing_age_ms: u64,
}

pub fn quality_score(inputs: &QualityInputs) -> f64 {
    let strength =
        STRENGTH_WEIGHT * (f64::from(inputs.swing_high_strength) + f64::from(inputs.swing_low_strength));
    let confluence = if inputs.confluence {
        CONFLUENCE_BONUS
    } else {
        0.0
    };
    strength
        + volume_tier(inputs.volume_24h)
        + confluence
        + volatility_tier(inputs.price_change_24h_pct)
        + recency_tier(inputs.most_recent_swing_age_ms as f64 / DAY_MS)
}

pub fn quality_tier(score: f64) -> Quality {
    if score >= 75.0 {
        Quality::High
    } else if score >= 50.0 {
        Quality::Medium
    } else {
        Quality::Low
    }
}

pub fn volume_tier(volume_24h: f64) -> f64 {
    if volume_24h > 1_000_000.0 {
        20.0
    } else if volume_24h > 100_000.0 {
        15.0
    } else if volume_24h > 10_000.0 {
        10.0
    } else {
        5.0
    }
}

pub fn volatility_tier(price_change_24h_pct: f64) -> f64 {
    let abs = price_change_24h_pct.abs();
    if abs > 5.0 {
        15.0
    } else if abs > 2.0 {
        10.0
    } else {
        5.0
    }
}

pub fn recency_tier(days_since_swing: f64) -> f64 {
    if days_since_swing < 1.0 {
        10.0
    } else if days_since_swing < 3.0 {
        7.0
    } else if days_since_swing < 7.0 {
        5.0
    } else {
        2.0
    }
}
