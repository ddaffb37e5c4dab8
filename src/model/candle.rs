use serde::Serialize;

/// One OHLCV bar. Series are always handled in ascending time order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candle {
    pub timestamp_ms: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}
