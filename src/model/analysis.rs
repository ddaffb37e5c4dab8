use serde::Serialize;

use crate::config::ScanConfig;
use crate::model::profile::VolumeProfileLevel;
use crate::model::swing::SwingPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelKind {
    Support,
    Resistance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FibonacciLevel {
    pub ratio: f64,
    pub price: f64,
    /// Absolute distance to the current price, in percent of the current price.
    pub distance_to_current_pct: f64,
    pub kind: LevelKind,
}

/// Ordered so that `High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisMetadata {
    pub price_change_24h_pct: f64,
    pub volume_24h: f64,
    pub computed_at_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetracementAnalysis {
    pub symbol: String,
    pub trend: Trend,
    pub swing_high: SwingPoint,
    pub swing_low: SwingPoint,
    pub current_price: f64,
    pub fib_levels: Vec<FibonacciLevel>,
    pub target_levels: Vec<FibonacciLevel>,
    pub poc_level: Option<VolumeProfileLevel>,
    pub value_area_high: Option<f64>,
    pub value_area_low: Option<f64>,
    pub confluence: bool,
    pub quality: Quality,
    pub quality_score: f64,
    pub retrace_pct: f64,
    pub metadata: AnalysisMetadata,
}

impl RetracementAnalysis {
    pub fn nearest_target_distance_pct(&self) -> f64 {
        self.target_levels
            .iter()
            .map(|l| l.distance_to_current_pct)
            .fold(f64::INFINITY, f64::min)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanResult {
    pub analyses: Vec<RetracementAnalysis>,
    pub total_scanned: usize,
    pub filtered_count: usize,
    pub elapsed_ms: u64,
    pub criteria: ScanConfig,
}
