use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("insufficient data: need {required} candles, got {available}")]
    DataInsufficient { required: usize, available: usize },

    #[error("no valid swing high/low pair")]
    NoValidSwingPair,

    #[error("upstream fetch error: {0}")]
    UpstreamFetch(String),

    #[error("volume profile approximation error: {0}")]
    ProfileApproximation(String),

    #[error("binance API error (code {code}): {msg}")]
    BinanceApi { code: i64, msg: String },
}

impl ScanError {
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            ScanError::UpstreamFetch(_) | ScanError::BinanceApi { .. }
        )
    }
}
