use serde::Serialize;

/// 24h rolling ticker snapshot used to build and rank the scan universe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ticker {
    pub symbol: String,
    pub last_price: f64,
    pub price_change_pct: f64,
    /// Quote-asset volume, i.e. USD volume for USDT pairs.
    pub quote_volume: f64,
}
