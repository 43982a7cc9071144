//! Capabilities the ledger consumes from the rest of the engine

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::errors::Result;
use super::types::{Asset, CurrencyCode, CurrencyPair, Interval};

/// Anything the engine passes around that identifies a market at a point in
/// time: data events, signals, orders and fills.
///
/// The ledger only reads the exchange/asset/pair triple to find funding.
pub trait FundingEvent: Send + Sync {
    /// Name of the exchange the event belongs to
    fn exchange(&self) -> &str;

    /// Asset class of the market
    fn asset_type(&self) -> Asset;

    /// Market the event is for
    fn pair(&self) -> &CurrencyPair;

    /// When the event happened
    fn time(&self) -> DateTime<Utc>;

    /// Interval of the underlying data stream
    fn interval(&self) -> Interval;

    /// Human-readable annotation explaining what happened to this event
    fn reason(&self) -> &str;

    /// Append to the annotation
    fn append_reason(&mut self, reason: &str);
}

/// Converts an amount of some currency into USD
///
/// Implemented by whatever owns price history (live tickers, candle store).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsdValuer: Send + Sync {
    /// Value `amount` of `currency` in USD as of `as_of`
    async fn value_in_usd(
        &self,
        currency: &CurrencyCode,
        amount: Decimal,
        as_of: DateTime<Utc>,
    ) -> Result<Decimal>;
}
