//! A single currency balance on one exchange

use parking_lot::{Mutex, MutexGuard};
use rust_decimal::Decimal;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

use crate::common::errors::{FundingError, Result};
use crate::common::types::{Asset, CurrencyCode};

/// Point-in-time read of an item's balances, taken under one lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Balances {
    /// Spendable now
    pub available: Decimal,
    /// Committed to an in-flight order
    pub reserved: Decimal,
}

struct ItemInner {
    exchange: String,
    asset: Asset,
    currency: CurrencyCode,
    initial_funds: Decimal,
    transfer_fee: Decimal,
    balances: Mutex<Balances>,
    paired_with: Mutex<Weak<ItemInner>>,
}

/// Funds of one currency, scoped to an exchange and asset class
///
/// `Item` is a shared handle: clones refer to the same balances. The
/// `paired_with` link to a pair's counterparty is weak and never keeps the
/// other side alive.
///
/// Balances never go negative. `available` only decreases through
/// [`Item::reserve`] (and being the source of a transfer) and only increases
/// through [`Item::increase_available`], a counterparty's release, or being
/// the destination of a transfer. Operations touching two items lock both,
/// always in the same order, so each one is all or nothing.
#[derive(Clone)]
pub struct Item {
    inner: Arc<ItemInner>,
}

/// Create a new item with `available` set to `initial_funds`
pub fn create_item(
    exchange: impl Into<String>,
    asset: Asset,
    currency: CurrencyCode,
    initial_funds: Decimal,
    transfer_fee: Decimal,
) -> Result<Item> {
    if initial_funds < Decimal::ZERO {
        return Err(FundingError::NegativeAmount {
            field: "initial funds",
            amount: initial_funds,
        });
    }
    if transfer_fee < Decimal::ZERO {
        return Err(FundingError::NegativeFee(transfer_fee));
    }

    Ok(Item {
        inner: Arc::new(ItemInner {
            exchange: exchange.into(),
            asset,
            currency,
            initial_funds,
            transfer_fee,
            balances: Mutex::new(Balances {
                available: initial_funds,
                reserved: Decimal::ZERO,
            }),
            paired_with: Mutex::new(Weak::new()),
        }),
    })
}

impl Item {
    pub fn exchange(&self) -> &str {
        &self.inner.exchange
    }

    pub fn asset(&self) -> Asset {
        self.inner.asset
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.inner.currency
    }

    /// Funds at creation, kept for P&L reporting
    pub fn initial_funds(&self) -> Decimal {
        self.inner.initial_funds
    }

    /// Fee charged when this item is the source of a transfer
    pub fn transfer_fee(&self) -> Decimal {
        self.inner.transfer_fee
    }

    pub fn available(&self) -> Decimal {
        self.inner.balances.lock().available
    }

    pub fn reserved(&self) -> Decimal {
        self.inner.balances.lock().reserved
    }

    /// Consistent read of both balances
    pub fn snapshot(&self) -> Balances {
        *self.inner.balances.lock()
    }

    /// The counterparty item if this item belongs to a pair
    pub fn paired_with(&self) -> Option<Item> {
        self.inner
            .paired_with
            .lock()
            .upgrade()
            .map(|inner| Item { inner })
    }

    pub(crate) fn set_paired_with(&self, other: &Item) {
        *self.inner.paired_with.lock() = Arc::downgrade(&other.inner);
    }

    /// True when both handles point at the same holding
    pub fn same_holding(&self, other: &Item) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Move `amount` from available to reserved
    ///
    /// All or nothing: a reservation larger than `available` fails without
    /// touching either balance.
    pub fn reserve(&self, amount: Decimal) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(FundingError::ZeroOrNegativeAmount(amount));
        }
        let mut balances = self.inner.balances.lock();
        if amount > balances.available {
            return Err(FundingError::InsufficientFunds {
                requested: amount,
                available: balances.available,
            });
        }
        balances.reserved = checked_credit(balances.reserved, amount)?;
        balances.available -= amount;
        Ok(())
    }

    /// Consume `amount` of reserved funds, crediting `amount - fee`
    ///
    /// The credit goes to the paired counterparty's available balance. An
    /// unpaired item has no counterparty and credits itself. Either both
    /// balances change or neither does.
    pub fn release(&self, amount: Decimal, fee: Decimal) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(FundingError::ZeroOrNegativeAmount(amount));
        }
        if fee < Decimal::ZERO {
            return Err(FundingError::NegativeFee(fee));
        }
        if fee > amount {
            return Err(FundingError::FeeExceedsAmount { amount, fee });
        }
        let credit = amount - fee;

        let counterparty = self.paired_with().filter(|c| !c.same_holding(self));
        let Some(counterparty) = counterparty else {
            let mut balances = self.inner.balances.lock();
            check_reserved(&balances, amount)?;
            balances.available = checked_credit(balances.available, credit)?;
            balances.reserved -= amount;
            return Ok(());
        };

        {
            let (mut own, mut other) = lock_both(&self.inner, &counterparty.inner);
            check_reserved(&own, amount)?;
            other.available = checked_credit(other.available, credit)?;
            own.reserved -= amount;
        }
        debug!(
            "released {} {} on {}, credited {} {}",
            amount, self.inner.currency, self.inner.exchange, credit, counterparty.inner.currency
        );
        Ok(())
    }

    /// Add to available; non-positive amounts are ignored
    ///
    /// A top-up that would overflow the balance is dropped with a warning.
    pub fn increase_available(&self, amount: Decimal) {
        if amount <= Decimal::ZERO {
            if amount < Decimal::ZERO {
                warn!(
                    "ignoring negative top-up of {} {} on {}",
                    amount, self.inner.currency, self.inner.exchange
                );
            }
            return;
        }
        let mut balances = self.inner.balances.lock();
        match checked_credit(balances.available, amount) {
            Ok(available) => balances.available = available,
            Err(e) => warn!(
                "ignoring top-up of {} {} on {}: {}",
                amount, self.inner.currency, self.inner.exchange, e
            ),
        }
    }

    /// Move `amount` out of this item's available funds and `credit` into
    /// `to`'s, atomically. Caller has validated everything but the balances.
    pub(crate) fn transfer_to(&self, to: &Item, amount: Decimal, credit: Decimal) -> Result<()> {
        if self.same_holding(to) {
            return Err(FundingError::SameFundTransfer);
        }
        let (mut from, mut dest) = lock_both(&self.inner, &to.inner);
        if amount > from.available {
            return Err(FundingError::InsufficientFunds {
                requested: amount,
                available: from.available,
            });
        }
        dest.available = checked_credit(dest.available, credit)?;
        from.available -= amount;
        Ok(())
    }

    /// Same exchange, asset and currency
    pub fn matches_item_currency(&self, other: Option<&Item>) -> bool {
        match other {
            Some(other) => {
                self.inner.exchange == other.inner.exchange
                    && self.inner.asset == other.inner.asset
                    && self.inner.currency == other.inner.currency
            }
            None => false,
        }
    }

    /// Same exchange name
    pub fn matches_exchange(&self, other: Option<&Item>) -> bool {
        match other {
            Some(other) => self.inner.exchange == other.inner.exchange,
            None => false,
        }
    }

    /// Currency equality; an unset code matches nothing
    pub fn matches_currency(&self, code: &CurrencyCode) -> bool {
        !code.is_empty() && self.inner.currency == *code
    }

    /// Identity plus balance equality
    pub fn equal(&self, other: &Item) -> bool {
        if self.same_holding(other) {
            return true;
        }
        self.matches_item_currency(Some(other))
            && self.inner.initial_funds == other.inner.initial_funds
            && self.inner.transfer_fee == other.inner.transfer_fee
            && self.snapshot() == other.snapshot()
    }

    pub(crate) fn matches_identity(
        &self,
        exchange: &str,
        asset: Asset,
        currency: &CurrencyCode,
    ) -> bool {
        self.inner.exchange == exchange
            && self.inner.asset == asset
            && self.matches_currency(currency)
    }
}

fn checked_credit(balance: Decimal, amount: Decimal) -> Result<Decimal> {
    balance
        .checked_add(amount)
        .ok_or(FundingError::Overflow { balance, amount })
}

fn check_reserved(balances: &Balances, amount: Decimal) -> Result<()> {
    if amount > balances.reserved {
        return Err(FundingError::InsufficientReserved {
            requested: amount,
            reserved: balances.reserved,
        });
    }
    Ok(())
}

/// Lock two distinct items in address order so concurrent two-item
/// operations cannot deadlock. Guards come back in argument order.
fn lock_both<'a>(
    a: &'a ItemInner,
    b: &'a ItemInner,
) -> (MutexGuard<'a, Balances>, MutexGuard<'a, Balances>) {
    if (a as *const ItemInner) < (b as *const ItemInner) {
        let first = a.balances.lock();
        (first, b.balances.lock())
    } else {
        let first = b.balances.lock();
        (a.balances.lock(), first)
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let balances = self.snapshot();
        f.debug_struct("Item")
            .field("exchange", &self.inner.exchange)
            .field("asset", &self.inner.asset)
            .field("currency", &self.inner.currency)
            .field("initial_funds", &self.inner.initial_funds)
            .field("transfer_fee", &self.inner.transfer_fee)
            .field("available", &balances.available)
            .field("reserved", &balances.reserved)
            .field(
                "paired_with",
                &self.paired_with().map(|p| p.inner.currency.clone()),
            )
            .finish()
    }
}
