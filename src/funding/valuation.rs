//! Fixed-rate USD valuation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::common::errors::{FundingError, Result};
use crate::common::traits::UsdValuer;
use crate::common::types::CurrencyCode;

/// Values currencies at configured USD rates, ignoring the timestamp
///
/// Useful for offline reports where no price history is loaded.
#[derive(Debug, Clone, Default)]
pub struct StaticRateValuer {
    rates: HashMap<CurrencyCode, Decimal>,
}

impl StaticRateValuer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a `currency -> USD price` map
    pub fn from_rates<I, K>(rates: I) -> Self
    where
        I: IntoIterator<Item = (K, Decimal)>,
        K: Into<CurrencyCode>,
    {
        Self {
            rates: rates.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn with_rate(mut self, currency: impl Into<CurrencyCode>, usd_price: Decimal) -> Self {
        self.rates.insert(currency.into(), usd_price);
        self
    }
}

#[async_trait]
impl UsdValuer for StaticRateValuer {
    async fn value_in_usd(
        &self,
        currency: &CurrencyCode,
        amount: Decimal,
        _as_of: DateTime<Utc>,
    ) -> Result<Decimal> {
        if currency.is_usd() {
            return Ok(amount);
        }
        let rate = self
            .rates
            .get(currency)
            .ok_or_else(|| FundingError::Valuation(format!("no USD rate for {}", currency)))?;
        amount.checked_mul(*rate).ok_or_else(|| {
            FundingError::Valuation(format!("USD value of {} {} overflows", amount, currency))
        })
    }
}
