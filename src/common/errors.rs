//! Error types for the funding ledger

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias using our FundingError
pub type Result<T> = std::result::Result<T, FundingError>;

/// Main error type for ledger operations
///
/// None of these are fatal to the engine. The caller decides whether a
/// failed reservation means "skip this trade" or "halt the run".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FundingError {
    /// A strictly positive quantity was required
    #[error("zero or negative amount received: {0}")]
    ZeroOrNegativeAmount(Decimal),

    /// A fee argument was negative
    #[error("negative fee received: {0}")]
    NegativeFee(Decimal),

    /// A quantity that must not be negative was negative
    #[error("negative {field} received: {amount}")]
    NegativeAmount { field: &'static str, amount: Decimal },

    /// Requested amount exceeds the available balance
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },

    /// Requested amount exceeds the reserved balance
    #[error("insufficient reserved funds: requested {requested}, reserved {reserved}")]
    InsufficientReserved {
        requested: Decimal,
        reserved: Decimal,
    },

    /// A fee larger than the amount it is charged against
    #[error("fee {fee} exceeds amount {amount}")]
    FeeExceedsAmount { amount: Decimal, fee: Decimal },

    /// A balance would exceed the largest representable amount
    #[error("balance overflow: {balance} + {amount}")]
    Overflow { balance: Decimal, amount: Decimal },

    /// Side argument was neither buy nor sell
    #[error("invalid direction: {0}")]
    InvalidDirection(String),

    /// Registry insert collided with an existing entry
    #[error("funding already exists: {0}")]
    AlreadyExists(String),

    /// Registry lookup found nothing
    #[error("funds not found: {0}")]
    FundsNotFound(String),

    /// A required argument was absent
    #[error("nil argument: {0}")]
    NilArgument(&'static str),

    /// Transfer source and destination are the same holding
    #[error("cannot transfer to the same funds")]
    SameFundTransfer,

    /// Transfer source and destination hold different currencies
    #[error("transfer must be same currency: {from} -> {to}")]
    CurrencyMismatch { from: String, to: String },

    /// USD valuation collaborator failed
    #[error("valuation error: {0}")]
    Valuation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}
