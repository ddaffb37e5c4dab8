use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SwingKind {
    High,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwingPoint {
    pub kind: SwingKind,
    pub price: f64,
    pub timestamp_ms: u64,
    /// Position in the candle series the swing was detected in.
    pub index: usize,
    /// 1..=10
    pub strength: u8,
    pub volume: f64,
}
