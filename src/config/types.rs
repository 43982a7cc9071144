//! Configuration types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::common::types::Asset;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Holdings to fund the run with
    #[serde(default)]
    pub funding: FundingConfig,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

/// Funding for a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundingConfig {
    /// Share capital across all pairs on an exchange
    #[serde(default)]
    pub exchange_level_funding: bool,
    /// Standalone single-currency holdings
    #[serde(default)]
    pub items: Vec<ItemConfig>,
    /// Holdings dedicated to trading one market
    #[serde(default)]
    pub pairs: Vec<PairConfig>,
    /// USD price per currency code, used for reporting
    #[serde(default)]
    pub usd_rates: HashMap<String, Decimal>,
}

/// A standalone holding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemConfig {
    pub exchange: String,
    #[serde(default = "default_asset")]
    pub asset: Asset,
    pub currency: String,
    #[serde(default)]
    pub initial_funds: Decimal,
    #[serde(default)]
    pub transfer_fee: Decimal,
}

/// A base/quote holding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairConfig {
    pub exchange: String,
    #[serde(default = "default_asset")]
    pub asset: Asset,
    pub base: String,
    pub quote: String,
    #[serde(default)]
    pub base_initial_funds: Decimal,
    #[serde(default)]
    pub quote_initial_funds: Decimal,
    /// Applied to both sides of the pair
    #[serde(default)]
    pub transfer_fee: Decimal,
}

fn default_asset() -> Asset {
    Asset::Spot
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Length of the report window ending now
    #[serde(default = "default_report_window_hours")]
    pub report_window_hours: i64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            report_window_hours: default_report_window_hours(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_report_window_hours() -> i64 {
    24
}
