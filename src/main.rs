use anyhow::{Context, Result};

use golden_zone_scanner::binance::rest::BinanceRestClient;
use golden_zone_scanner::config::Config;
use golden_zone_scanner::input::{parse_args, Command};
use golden_zone_scanner::model::analysis::{RetracementAnalysis, ScanResult};
use golden_zone_scanner::scanner;

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args(std::env::args().skip(1))?;
    let config = Config::load(&args.config_path)?;

    // Logs go to stderr so stdout carries only results.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(if config.logging.level.trim().is_empty() {
            "info"
        } else {
            config.logging.level.as_str()
        })
    });
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }

    tracing::info!(
        rest_url = %config.binance.rest_base_url,
        interval = %config.binance.kline_interval,
        quote = %config.binance.quote_asset,
        "Starting golden-zone-scanner"
    );

    let client = BinanceRestClient::new(&config.binance.rest_base_url);

    match args.command {
        Command::Scan => {
            let result = scanner::scan(&client, &config).await?;
            if args.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&result).context("failed to encode scan result")?
                );
            } else {
                print_scan(&result);
            }
        }
        Command::Detail(symbol) => {
            let analysis = scanner::analyze_single(&client, &symbol, &config).await?;
            if args.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&analysis).context("failed to encode analysis")?
                );
            } else {
                match analysis {
                    Some(a) => print_detail(&a),
                    None => println!("{}: no retracement setup", symbol),
                }
            }
        }
    }

    Ok(())
}

fn print_scan(result: &ScanResult) {
    println!(
        "scanned {} symbols in {} ms, {} matched, showing {}",
        result.total_scanned,
        result.elapsed_ms,
        result.filtered_count,
        result.analyses.len()
    );
    println!(
        "{:<14} {:<8} {:>12} {:>8} {:>9} {:>6} {:>7}",
        "symbol", "trend", "price", "retrace", "tgt dist", "conf", "quality"
    );
    for a in &result.analyses {
        println!(
            "{:<14} {:<8} {:>12.6} {:>7.1}% {:>8.2}% {:>6} {:>7}",
            a.symbol,
            format!("{:?}", a.trend).to_lowercase(),
            a.current_price,
            a.retrace_pct,
            a.nearest_target_distance_pct(),
            if a.confluence { "yes" } else { "no" },
            format!("{:?}", a.quality).to_lowercase(),
        );
    }
}

fn print_detail(a: &RetracementAnalysis) {
    println!(
        "{} {:?} price={} retrace={:.1}% quality={:?} ({:.1})",
        a.symbol, a.trend, a.current_price, a.retrace_pct, a.quality, a.quality_score
    );
    println!(
        "swing high {} (strength {}), swing low {} (strength {})",
        a.swing_high.price, a.swing_high.strength, a.swing_low.price, a.swing_low.strength
    );
    for level in &a.fib_levels {
        println!(
            "  fib {:>5.3} {:>14.6} {:>7.2}% {:?}",
            level.ratio, level.price, level.distance_to_current_pct, level.kind
        );
    }
    for level in &a.target_levels {
        println!(
            "  target {:>5.3} {:>11.6} {:>7.2}%",
            level.ratio, level.price, level.distance_to_current_pct
        );
    }
    match &a.poc_level {
        Some(poc) => println!(
            "  poc {} ({:.1}% of volume), confluence={}",
            poc.price, poc.percentage_of_total, a.confluence
        ),
        None => println!("  poc unavailable"),
    }
}
