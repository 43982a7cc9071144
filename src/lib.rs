//! Trade Funding Library
//!
//! Capital accounting and task wakeup for a multi-exchange backtesting and
//! live trading engine.

pub mod alert;
pub mod common;
pub mod config;
pub mod funding;

// Re-export commonly used types
pub use alert::{Kick, Notice};
pub use common::errors::{FundingError, Result};
pub use common::traits::{FundingEvent, UsdValuer};
pub use common::types::{Asset, CurrencyCode, CurrencyPair, Direction, Interval};
pub use config::types::AppConfig;
pub use funding::{
    create_item, create_pair, Balances, FundManager, FundingReport, Item, Pair, PairReader,
    PairReleaser, PairReserver, ReportItem, StaticRateValuer,
};
