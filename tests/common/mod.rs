//! Common test utilities and fixtures

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use trade_funding::{
    create_item, create_pair, Asset, CurrencyCode, CurrencyPair, FundingEvent, Interval, Item,
    Pair,
};

pub const EXCH: &str = "exch";
pub const ELITE: Decimal = dec!(1337);

pub static DOGE: Lazy<CurrencyCode> = Lazy::new(|| CurrencyCode::new("DOGE"));
pub static XRP: Lazy<CurrencyCode> = Lazy::new(|| CurrencyCode::new("XRP"));
pub static DOGE_XRP: Lazy<CurrencyPair> = Lazy::new(|| CurrencyPair::new("DOGE", "XRP"));

/// Spot item on the shared test exchange
pub fn spot_item(currency: &CurrencyCode, funds: Decimal) -> Item {
    create_item(EXCH, Asset::Spot, currency.clone(), funds, Decimal::ZERO)
        .expect("valid test item")
}

/// DOGE/XRP pair with no DOGE and 1337 XRP
pub fn doge_xrp_pair() -> Pair {
    let base = spot_item(&DOGE, Decimal::ZERO);
    let quote = spot_item(&XRP, ELITE);
    create_pair(Some(&base), Some(&quote)).expect("valid test pair")
}

/// Minimal engine event for funding lookups
#[derive(Debug, Clone)]
pub struct FakeEvent {
    pub exchange: String,
    pub asset: Asset,
    pub pair: CurrencyPair,
    pub time: DateTime<Utc>,
    pub interval: Interval,
    pub reason: String,
}

impl FakeEvent {
    pub fn doge_xrp() -> Self {
        Self {
            exchange: EXCH.to_string(),
            asset: Asset::Spot,
            pair: DOGE_XRP.clone(),
            time: Utc::now(),
            interval: Interval::ONE_MIN,
            reason: String::new(),
        }
    }
}

impl FundingEvent for FakeEvent {
    fn exchange(&self) -> &str {
        &self.exchange
    }

    fn asset_type(&self) -> Asset {
        self.asset
    }

    fn pair(&self) -> &CurrencyPair {
        &self.pair
    }

    fn time(&self) -> DateTime<Utc> {
        self.time
    }

    fn interval(&self) -> Interval {
        self.interval
    }

    fn reason(&self) -> &str {
        &self.reason
    }

    fn append_reason(&mut self, reason: &str) {
        if !self.reason.is_empty() {
            self.reason.push_str(". ");
        }
        self.reason.push_str(reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doge_xrp_pair_fixture() {
        let pair = doge_xrp_pair();
        assert!(pair.base.available().is_zero());
        assert_eq!(pair.quote.available(), ELITE);
    }

    #[test]
    fn test_fake_event_reason() {
        let mut event = FakeEvent::doge_xrp();
        event.append_reason("no funds");
        event.append_reason("skipped");
        assert_eq!(event.reason(), "no funds. skipped");
    }
}
