use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::model::candle::Candle;
use crate::model::ticker::Ticker;

/// Deserialize Binance string-encoded numbers to f64.
pub fn string_to_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse::<f64>().map_err(serde::de::Error::custom)
}

/// Binance 24h rolling ticker (GET /api/v3/ticker/24hr).
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BinanceTicker24h {
    pub symbol: String,
    #[serde(deserialize_with = "string_to_f64")]
    pub last_price: f64,
    #[serde(deserialize_with = "string_to_f64")]
    pub price_change_percent: f64,
    #[serde(deserialize_with = "string_to_f64")]
    pub quote_volume: f64,
}

impl From<BinanceTicker24h> for Ticker {
    fn from(t: BinanceTicker24h) -> Self {
        Ticker {
            symbol: t.symbol,
            last_price: t.last_price,
            price_change_pct: t.price_change_percent,
            quote_volume: t.quote_volume,
        }
    }
}

/// Binance API error response.
#[derive(Debug, Deserialize)]
pub struct BinanceApiErrorResponse {
    pub code: i64,
    pub msg: String,
}

/// Decode one kline row (GET /api/v3/klines):
/// `[openTime, "open", "high", "low", "close", "volume", closeTime, ...]`.
pub fn parse_kline_row(row: &Value) -> Result<Candle> {
    let fields = match row.as_array() {
        Some(f) if f.len() >= 6 => f,
        _ => bail!("kline row is not an array of at least 6 fields: {}", row),
    };

    let timestamp_ms = fields[0]
        .as_u64()
        .with_context(|| format!("kline open time is not an integer: {}", fields[0]))?;
    let num = |i: usize, name: &str| -> Result<f64> {
        match &fields[i] {
            Value::String(s) => s
                .parse::<f64>()
                .with_context(|| format!("kline {} is not numeric: {}", name, s)),
            Value::Number(n) => n
                .as_f64()
                .with_context(|| format!("kline {} is out of range", name)),
            other => bail!("kline {} has unexpected type: {}", name, other),
        }
    };

    Ok(Candle {
        timestamp_ms,
        open: num(1, "open")?,
        high: num(2, "high")?,
        low: num(3, "low")?,
        close: num(4, "close")?,
        volume: num(5, "volume")?,
    })
}
