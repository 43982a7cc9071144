//! Valuation snapshot of every holding in a run

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::common::errors::{FundingError, Result};
use crate::common::types::{Asset, CurrencyCode};

/// One holding's start and end position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportItem {
    pub exchange: String,
    pub asset: Asset,
    pub currency: CurrencyCode,
    /// Counterparty currency when the holding belongs to a pair
    pub paired_with: Option<CurrencyCode>,
    pub transfer_fee: Decimal,
    pub initial_funds: Decimal,
    /// Available balance at report time
    pub final_funds: Decimal,
    /// `None` when the holding could not be valued
    pub initial_funds_usd: Option<Decimal>,
    /// `None` when the holding could not be valued
    pub final_funds_usd: Option<Decimal>,
}

impl ReportItem {
    /// Change in USD value over the report window
    pub fn usd_difference(&self) -> Option<Decimal> {
        match (self.initial_funds_usd, self.final_funds_usd) {
            (Some(initial), Some(fin)) => Some(fin - initial),
            _ => None,
        }
    }
}

/// Funding report for a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundingReport {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub using_exchange_level_funding: bool,
    pub items: Vec<ReportItem>,
    /// Sum of every valued item's final USD value, capped at `Decimal::MAX`
    pub total_final_usd: Decimal,
}

impl FundingReport {
    /// Items that could not be converted to USD
    pub fn unvalued(&self) -> impl Iterator<Item = &ReportItem> {
        self.items.iter().filter(|i| i.final_funds_usd.is_none())
    }
}

/// Start of a report window `hours` long that ends at `end`
pub fn window_start(end: DateTime<Utc>, hours: i64) -> Result<DateTime<Utc>> {
    if hours < 0 {
        return Err(FundingError::Configuration(format!(
            "report window must not be negative: {} hours",
            hours
        )));
    }
    Duration::try_hours(hours)
        .and_then(|window| end.checked_sub_signed(window))
        .ok_or_else(|| {
            FundingError::Configuration(format!("report window of {} hours is out of range", hours))
        })
}
