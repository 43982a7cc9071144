//! Registry of every holding in a backtest or live run

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, instrument, warn};

use super::item::Item;
use super::pair::Pair;
use super::report::{FundingReport, ReportItem};
use crate::common::errors::{FundingError, Result};
use crate::common::traits::{FundingEvent, UsdValuer};
use crate::common::types::{Asset, CurrencyCode, CurrencyPair};

#[derive(Debug, Default)]
struct Registry {
    items: Vec<Item>,
    pairs: Vec<Pair>,
}

impl Registry {
    fn holdings(&self) -> impl Iterator<Item = &Item> {
        self.items
            .iter()
            .chain(self.pairs.iter().flat_map(|p| [&p.base, &p.quote]))
    }
}

/// Owns all funding for a run
///
/// Standalone items are unique by (exchange, asset, currency) and pairs by
/// (exchange, asset, base, quote). A pair's items are discoverable through
/// [`FundManager::exists`] and [`FundManager::get_funding_for_eac`] alongside
/// the standalone ones.
#[derive(Debug, Default)]
pub struct FundManager {
    using_exchange_level_funding: AtomicBool,
    registry: RwLock<Registry>,
}

impl FundManager {
    /// `using_exchange_level_funding`: capital is shared across all pairs on
    /// an exchange rather than dedicated to each pair
    pub fn new(using_exchange_level_funding: bool) -> Self {
        Self {
            using_exchange_level_funding: AtomicBool::new(using_exchange_level_funding),
            registry: RwLock::new(Registry::default()),
        }
    }

    pub fn is_using_exchange_level_funding(&self) -> bool {
        self.using_exchange_level_funding.load(Ordering::SeqCst)
    }

    /// Drop all holdings and return to per-pair funding
    pub fn reset(&self) {
        let mut registry = self.registry.write();
        registry.items.clear();
        registry.pairs.clear();
        self.using_exchange_level_funding.store(false, Ordering::SeqCst);
        info!("funding manager reset");
    }

    /// Register a standalone item. `None` is ignored.
    pub fn add_item(&self, item: Option<Item>) -> Result<()> {
        let Some(item) = item else {
            return Ok(());
        };
        let mut registry = self.registry.write();
        if registry
            .holdings()
            .any(|existing| existing.matches_item_currency(Some(&item)))
        {
            return Err(FundingError::AlreadyExists(format!(
                "{} {} {}",
                item.exchange(),
                item.asset(),
                item.currency()
            )));
        }
        debug!(
            "registered {} {} {} with {} available",
            item.exchange(),
            item.asset(),
            item.currency(),
            item.available()
        );
        registry.items.push(item);
        Ok(())
    }

    /// Register a pair
    pub fn add_pair(&self, pair: Pair) -> Result<()> {
        let mut registry = self.registry.write();
        if registry.pairs.iter().any(|existing| existing.matches_pair(&pair)) {
            return Err(FundingError::AlreadyExists(format!(
                "{} {} {}",
                pair.exchange(),
                pair.asset(),
                pair.currency_pair()
            )));
        }
        debug!(
            "registered pair {} {} {}",
            pair.exchange(),
            pair.asset(),
            pair.currency_pair()
        );
        registry.pairs.push(pair);
        Ok(())
    }

    /// Whether a holding with the same (exchange, asset, currency) is
    /// registered, regardless of which handle is passed in
    pub fn exists(&self, item: Option<&Item>) -> bool {
        let Some(item) = item else {
            return false;
        };
        self.registry
            .read()
            .holdings()
            .any(|existing| existing.matches_item_currency(Some(item)))
    }

    /// Look up a holding by exchange, asset and currency. Standalone items
    /// take precedence over pair constituents.
    pub fn get_funding_for_eac(
        &self,
        exchange: &str,
        asset: Asset,
        currency: &CurrencyCode,
    ) -> Result<Item> {
        self.registry
            .read()
            .holdings()
            .find(|item| item.matches_identity(exchange, asset, currency))
            .cloned()
            .ok_or_else(|| {
                FundingError::FundsNotFound(format!("{} {} {}", exchange, asset, currency))
            })
    }

    /// Look up a pair by exchange, asset and market
    pub fn get_funding_for_eap(
        &self,
        exchange: &str,
        asset: Asset,
        pair: &CurrencyPair,
    ) -> Result<Pair> {
        self.registry
            .read()
            .pairs
            .iter()
            .find(|p| p.matches(exchange, asset, pair))
            .cloned()
            .ok_or_else(|| FundingError::FundsNotFound(format!("{} {} {}", exchange, asset, pair)))
    }

    /// Look up the pair an engine event trades
    pub fn get_funding_for_event(&self, event: &dyn FundingEvent) -> Result<Pair> {
        self.get_funding_for_eap(event.exchange(), event.asset_type(), event.pair())
    }

    /// Move `amount` of available funds between two holdings of the same
    /// currency, possibly on different exchanges
    ///
    /// With `include_fee` the destination receives `amount` less the source's
    /// transfer fee.
    pub fn transfer(
        &self,
        amount: Decimal,
        from: Option<&Item>,
        to: Option<&Item>,
        include_fee: bool,
    ) -> Result<()> {
        let from = from.ok_or(FundingError::NilArgument("transfer source"))?;
        let to = to.ok_or(FundingError::NilArgument("transfer destination"))?;
        if amount <= Decimal::ZERO {
            return Err(FundingError::ZeroOrNegativeAmount(amount));
        }
        let available = from.available();
        if amount > available {
            return Err(FundingError::InsufficientFunds {
                requested: amount,
                available,
            });
        }
        if from.same_holding(to) {
            return Err(FundingError::SameFundTransfer);
        }
        if from.currency() != to.currency() {
            return Err(FundingError::CurrencyMismatch {
                from: from.currency().to_string(),
                to: to.currency().to_string(),
            });
        }

        let credit = if include_fee {
            let fee = from.transfer_fee();
            if fee > amount {
                return Err(FundingError::FeeExceedsAmount { amount, fee });
            }
            amount - fee
        } else {
            amount
        };

        // The balance may have moved since the check above.
        from.transfer_to(to, amount, credit)?;

        info!(
            "transferred {} {} from {} to {}, {} received",
            amount,
            from.currency(),
            from.exchange(),
            to.exchange(),
            credit
        );
        Ok(())
    }

    /// Value every holding at the start and end of the run
    ///
    /// Holdings already in USD are not converted. A holding the valuer cannot
    /// price is reported with no USD figures rather than failing the report.
    #[instrument(skip(self, valuer))]
    pub async fn generate_report(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        valuer: &dyn UsdValuer,
    ) -> FundingReport {
        let holdings: Vec<Item> = self.registry.read().holdings().cloned().collect();

        let mut items = Vec::with_capacity(holdings.len());
        let mut total_final_usd = Decimal::ZERO;
        for holding in holdings {
            let balances = holding.snapshot();
            let initial_funds_usd =
                value_in_usd(valuer, &holding, holding.initial_funds(), start).await;
            let final_funds_usd = value_in_usd(valuer, &holding, balances.available, end).await;
            if let Some(usd) = final_funds_usd {
                total_final_usd = total_final_usd.saturating_add(usd);
            }

            items.push(ReportItem {
                exchange: holding.exchange().to_string(),
                asset: holding.asset(),
                currency: holding.currency().clone(),
                paired_with: holding.paired_with().map(|p| p.currency().clone()),
                transfer_fee: holding.transfer_fee(),
                initial_funds: holding.initial_funds(),
                final_funds: balances.available,
                initial_funds_usd,
                final_funds_usd,
            });
        }

        info!("generated funding report for {} holdings", items.len());
        FundingReport {
            start,
            end,
            using_exchange_level_funding: self.is_using_exchange_level_funding(),
            items,
            total_final_usd,
        }
    }
}

async fn value_in_usd(
    valuer: &dyn UsdValuer,
    holding: &Item,
    amount: Decimal,
    as_of: DateTime<Utc>,
) -> Option<Decimal> {
    if holding.currency().is_usd() {
        return Some(amount);
    }
    match valuer.value_in_usd(holding.currency(), amount, as_of).await {
        Ok(usd) => Some(usd),
        Err(e) => {
            warn!(
                "could not value {} {} on {}: {}",
                amount,
                holding.currency(),
                holding.exchange(),
                e
            );
            None
        }
    }
}
