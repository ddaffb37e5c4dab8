use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub binance: BinanceConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BinanceConfig {
    pub rest_base_url: String,
    pub quote_asset: String,
    pub kline_interval: String,
    pub candle_limit: usize,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            rest_base_url: "https://api.binance.com".to_string(),
            quote_asset: "USDT".to_string(),
            kline_interval: "4h".to_string(),
            candle_limit: 42,
        }
    }
}

/// Caller-facing scan criteria. Serialized back into every `ScanResult`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    pub min_retracement_pct: f64,
    pub max_retracement_pct: f64,
    pub require_poc_confluence: bool,
    pub universe_limit: usize,
    pub min_volume_usd: f64,
    pub batch_size: usize,
    pub batch_delay_ms: u64,
    pub top_n: usize,
    /// A result needs at least one golden-zone level this close (%) to the current price.
    pub target_proximity_pct: f64,
    pub excluded_bases: Vec<String>,
    pub excluded_suffixes: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_retracement_pct: 50.0,
            max_retracement_pct: 70.0,
            require_poc_confluence: false,
            universe_limit: 100,
            min_volume_usd: 1_000_000.0,
            batch_size: 10,
            batch_delay_ms: 1_000,
            top_n: 20,
            target_proximity_pct: 5.0,
            excluded_bases: ["USDC", "FDUSD", "TUSD", "BUSD", "DAI", "USDP", "EUR", "AEUR"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            excluded_suffixes: ["UPUSDT", "DOWNUSDT", "BULLUSDT", "BEARUSDT"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// How the volume profile sizes its price buckets.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PriceStep {
    /// Absolute price units per bucket, identical for every instrument.
    Fixed { step: f64 },
    /// Bucket size as a fraction of the instrument's reference price.
    Relative { fraction: f64 },
}

impl PriceStep {
    pub fn resolve(&self, reference_price: f64) -> f64 {
        match *self {
            PriceStep::Fixed { step } => step,
            PriceStep::Relative { fraction } => reference_price.abs() * fraction,
        }
    }
}

impl Default for PriceStep {
    fn default() -> Self {
        PriceStep::Fixed { step: 0.001 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub swing_lookback: usize,
    pub min_swing_pct: f64,
    pub min_swing_separation_periods: u64,
    pub min_pair_strength: u8,
    pub recent_swings_per_side: usize,
    pub min_pair_separation_hours: u64,
    pub min_pair_range_pct: f64,
    pub min_valid_retrace_pct: f64,
    pub max_valid_retrace_pct: f64,
    pub price_step: PriceStep,
    pub max_steps_per_candle: usize,
    pub value_area_share: f64,
    pub confluence_tolerance_pct: f64,
    /// Candle period, resolved from `binance.kline_interval` at load time.
    #[serde(skip, default = "default_period_ms")]
    pub period_ms: u64,
}

fn default_period_ms() -> u64 {
    4 * 3_600_000
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            swing_lookback: 8,
            min_swing_pct: 3.0,
            min_swing_separation_periods: 3,
            min_pair_strength: 4,
            recent_swings_per_side: 3,
            min_pair_separation_hours: 12,
            min_pair_range_pct: 8.0,
            min_valid_retrace_pct: 10.0,
            max_valid_retrace_pct: 90.0,
            price_step: PriceStep::default(),
            max_steps_per_candle: 200_000,
            value_area_share: 0.70,
            confluence_tolerance_pct: 2.0,
            period_ms: default_period_ms(),
        }
    }
}

impl AnalysisConfig {
    /// Minimum candle count the swing detector needs: `2L + 1`.
    pub fn min_candles(&self) -> usize {
        self.swing_lookback * 2 + 1
    }

    pub fn min_swing_separation_ms(&self) -> u64 {
        self.min_swing_separation_periods
            .saturating_mul(self.period_ms)
    }

    pub fn min_pair_separation_ms(&self) -> u64 {
        self.min_pair_separation_hours.saturating_mul(3_600_000)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Parse a Binance kline interval string (e.g. "1s", "1m", "1h", "1d", "1w", "1M") into milliseconds.
pub fn parse_interval_ms(s: &str) -> Result<u64> {
    if s.len() < 2 {
        bail!("invalid interval '{}': expected format like '1m'", s);
    }

    let (num_str, suffix) = s.split_at(s.len() - 1);
    let n: u64 = num_str.parse().with_context(|| {
        format!(
            "invalid interval '{}': quantity must be a positive integer",
            s
        )
    })?;
    if n == 0 {
        bail!("invalid interval '{}': quantity must be > 0", s);
    }

    let unit_ms = match suffix {
        "s" => 1_000,
        "m" => 60_000,
        "h" => 3_600_000,
        "d" => 86_400_000,
        "w" => 7 * 86_400_000,
        "M" => 30 * 86_400_000,
        _ => bail!(
            "invalid interval '{}': unsupported suffix '{}', expected one of s/m/h/d/w/M",
            s,
            suffix
        ),
    };

    n.checked_mul(unit_ms)
        .with_context(|| format!("invalid interval '{}': value is too large", s))
}

impl BinanceConfig {
    pub fn kline_interval_ms(&self) -> Result<u64> {
        parse_interval_ms(&self.kline_interval)
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut config = Self::from_toml_str(&config_str)
            .with_context(|| format!("failed to load {}", path.display()))?;

        if let Ok(url) = std::env::var("BINANCE_REST_BASE_URL") {
            if !url.trim().is_empty() {
                config.binance.rest_base_url = url.trim().to_string();
            }
        }

        Ok(config)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(s).context("failed to parse config TOML")?;
        config.analysis.period_ms = config
            .binance
            .kline_interval_ms()
            .context("binance.kline_interval is invalid")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let scan = &self.scan;
        if scan.min_retracement_pct > scan.max_retracement_pct {
            bail!(
                "scan.min_retracement_pct ({}) exceeds scan.max_retracement_pct ({})",
                scan.min_retracement_pct,
                scan.max_retracement_pct
            );
        }
        if scan.batch_size == 0 {
            bail!("scan.batch_size must be > 0");
        }

        let analysis = &self.analysis;
        if analysis.swing_lookback == 0 {
            bail!("analysis.swing_lookback must be > 0");
        }
        if analysis.min_valid_retrace_pct > analysis.max_valid_retrace_pct {
            bail!("analysis retracement validity band is inverted");
        }
        let step_ok = match analysis.price_step {
            PriceStep::Fixed { step } => step > 0.0,
            PriceStep::Relative { fraction } => fraction > 0.0,
        };
        if !step_ok {
            bail!("analysis.price_step must be positive");
        }
        if !(0.0..=1.0).contains(&analysis.value_area_share) {
            bail!("analysis.value_area_share must be within [0, 1]");
        }
        if self.binance.quote_asset.trim().is_empty() {
            bail!("binance.quote_asset must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_toml() {
        let toml_str = r#"
[binance]
rest_base_url = "https://api.binance.com"
quote_asset = "USDT"
kline_interval = "4h"
candle_limit = 42

[scan]
min_retracement_pct = 55.0
max_retracement_pct = 68.0
require_poc_confluence = true
universe_limit = 50
min_volume_usd = 5000000.0
excluded_bases = ["USDC"]

[analysis]
swing_lookback = 6
price_step = { mode = "relative", fraction = 0.0005 }

[logging]
level = "debug"
"#;
        let config = Config::from_toml_str(toml_str).unwrap();
        assert_eq!(config.binance.quote_asset, "USDT");
        assert_eq!(config.binance.candle_limit, 42);
        assert!((config.scan.min_retracement_pct - 55.0).abs() < f64::EPSILON);
        assert!(config.scan.require_poc_confluence);
        assert_eq!(config.scan.universe_limit, 50);
        assert_eq!(config.scan.excluded_bases, vec!["USDC".to_string()]);
        assert_eq!(config.scan.batch_size, 10);
        assert_eq!(config.analysis.swing_lookback, 6);
        assert_eq!(
            config.analysis.price_step,
            PriceStep::Relative { fraction: 0.0005 }
        );
        assert_eq!(config.analysis.period_ms, 14_400_000);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.binance.kline_interval, "4h");
        assert_eq!(config.analysis.swing_lookback, 8);
        assert_eq!(config.analysis.min_candles(), 17);
        assert_eq!(config.analysis.min_swing_separation_ms(), 3 * 14_400_000);
        assert_eq!(config.analysis.min_pair_separation_ms(), 43_200_000);
        assert_eq!(config.analysis.price_step, PriceStep::Fixed { step: 0.001 });
    }

    #[test]
    fn rejects_inverted_band_and_bad_interval() {
        assert!(Config::from_toml_str(
            "[scan]\nmin_retracement_pct = 80.0\nmax_retracement_pct = 20.0\n"
        )
        .is_err());
        assert!(Config::from_toml_str("[binance]\nkline_interval = \"4x\"\n").is_err());
        assert!(Config::from_toml_str("[scan]\nbatch_size = 0\n").is_err());
    }

    #[test]
    fn parse_interval_valid() {
        assert_eq!(parse_interval_ms("1m").unwrap(), 60_000);
        assert_eq!(parse_interval_ms("4h").unwrap(), 14_400_000);
        assert_eq!(parse_interval_ms("1M").unwrap(), 2_592_000_000);
    }

    #[test]
    fn parse_interval_rejects_invalid_inputs() {
        assert!(parse_interval_ms("").is_err());
        assert!(parse_interval_ms("m").is_err());
        assert!(parse_interval_ms("0m").is_err());
        assert!(parse_interval_ms("1x").is_err());
    }
}
