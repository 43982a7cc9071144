//! Funding ledger
//!
//! Tracks how much of each currency is available or reserved on each
//! exchange, and moves it between holdings.
//!
//! # Components
//!
//! - [`Item`]: one currency on one exchange and asset class
//! - [`Pair`]: a base/quote pair of items dedicated to one market
//! - [`FundManager`]: registry of every item and pair in a run
//! - [`FundingReport`]: start/end valuation of every holding
//!
//! # Lifecycle of an order
//!
//! ```text
//!   reserve(amount, Buy)          quote.available -> quote.reserved
//!        │
//!        ▼
//!   release(amount, fee, Buy)     quote.reserved  -> base.available (less fee)
//! ```
//!
//! A buy spends quote and receives base. A sell spends base and receives
//! quote. `increase_available` credits the receiving side directly.

mod item;
mod manager;
mod pair;
mod report;
pub mod setup;
mod valuation;

pub use item::{create_item, Balances, Item};
pub use manager::FundManager;
pub use pair::{create_pair, Pair, PairReader, PairReleaser, PairReserver};
pub use report::{window_start, FundingReport, ReportItem};
pub use valuation::StaticRateValuer;
