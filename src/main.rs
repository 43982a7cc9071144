//! Trade Funding - Main Entry Point
//!
//! Loads the configured holdings into a funding ledger and prints a
//! valuation report.

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use trade_funding::config::load_config;
use trade_funding::funding::setup::{fund_manager_from_config, valuer_from_config};
use trade_funding::funding::window_start;

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Report window in hours, ending now
    #[arg(long)]
    window_hours: Option<i64>,

    /// Print the report as compact JSON instead of pretty JSON
    #[arg(long, default_value_t = false)]
    compact: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let config = load_config(Some(args.config.as_str()))?;

    let log_level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.settings.log_level.clone());
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting trade funding");
    info!("Configuration file: {}", args.config);

    let manager = fund_manager_from_config(&config.funding)?;
    let valuer = valuer_from_config(&config.funding);

    let end = Utc::now();
    let window = args
        .window_hours
        .unwrap_or(config.settings.report_window_hours);
    let start = window_start(end, window)?;

    let report = manager.generate_report(start, end, &valuer).await;
    let unvalued = report.unvalued().count();
    if unvalued > 0 {
        info!("{} holdings have no USD rate configured", unvalued);
    }

    let output = if args.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{}", output);

    Ok(())
}
