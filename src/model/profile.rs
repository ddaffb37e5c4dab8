use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeProfileLevel {
    pub price: f64,
    pub volume: f64,
    pub percentage_of_total: f64,
    pub is_poc: bool,
    pub is_value_area_high: bool,
    pub is_value_area_low: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start_ms: u64,
    pub end_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeProfile {
    pub symbol: String,
    pub time_window: TimeWindow,
    /// Sorted by volume, highest first. `levels[0]` is the POC.
    pub levels: Vec<VolumeProfileLevel>,
    pub poc: VolumeProfileLevel,
    pub value_area_high: f64,
    pub value_area_low: f64,
    pub total_volume: f64,
}

impl VolumeProfile {
    /// Total volume of every level priced inside `[value_area_low, value_area_high]`.
    pub fn value_area_volume(&self) -> f64 {
        self.levels
            .iter()
            .filter(|l| l.price >= self.value_area_low && l.price <= self.value_area_high)
            .map(|l| l.volume)
            .sum()
    }
}
