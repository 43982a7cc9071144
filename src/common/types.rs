//! Identity types shared by the ledger and its collaborators

use serde::{Deserialize, Serialize};
use std::fmt;

/// Asset class a holding belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Asset {
    Spot,
    Margin,
    Futures,
    PerpetualSwap,
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asset::Spot => write!(f, "spot"),
            Asset::Margin => write!(f, "margin"),
            Asset::Futures => write!(f, "futures"),
            Asset::PerpetualSwap => write!(f, "perpetual_swap"),
        }
    }
}

/// Currency code such as `BTC` or `USD`
///
/// Codes are stored upper case so `btc` and `BTC` compare equal.
/// An empty code is "unset" and never matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_uppercase())
    }

    pub fn usd() -> Self {
        Self::new("USD")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_usd(&self) -> bool {
        self.0 == "USD"
    }
}

impl From<String> for CurrencyCode {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl From<&str> for CurrencyCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A base/quote market, e.g. DOGE-XRP
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub base: CurrencyCode,
    pub quote: CurrencyCode,
}

impl CurrencyPair {
    pub fn new(base: impl Into<CurrencyCode>, quote: impl Into<CurrencyCode>) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.base, self.quote)
    }
}

/// Order direction as carried by engine events
///
/// Only `Buy` and `Sell` move funds; the other values are signals the engine
/// emits when it decides not to trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Buy,
    Sell,
    DoNothing,
    MissingData,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Buy => write!(f, "BUY"),
            Direction::Sell => write!(f, "SELL"),
            Direction::DoNothing => write!(f, "DO NOTHING"),
            Direction::MissingData => write!(f, "MISSING DATA"),
        }
    }
}

/// Candle interval of the data stream an event came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Interval(pub u64);

impl Interval {
    pub const ONE_MIN: Interval = Interval(60);
    pub const FIFTEEN_MIN: Interval = Interval(15 * 60);
    pub const ONE_HOUR: Interval = Interval(60 * 60);
    pub const ONE_DAY: Interval = Interval(24 * 60 * 60);

    pub fn seconds(&self) -> u64 {
        self.0
    }

    pub fn duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.0)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
