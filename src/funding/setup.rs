//! Build a ledger from configuration

use tracing::info;

use super::item::create_item;
use super::manager::FundManager;
use super::pair::create_pair;
use super::valuation::StaticRateValuer;
use crate::common::errors::Result;
use crate::common::types::CurrencyCode;
use crate::config::types::FundingConfig;

/// Create and register every configured holding
///
/// Stops at the first invalid or duplicate holding.
pub fn fund_manager_from_config(config: &FundingConfig) -> Result<FundManager> {
    let manager = FundManager::new(config.exchange_level_funding);

    for item in &config.items {
        let created = create_item(
            item.exchange.as_str(),
            item.asset,
            CurrencyCode::new(&item.currency),
            item.initial_funds,
            item.transfer_fee,
        )?;
        manager.add_item(Some(created))?;
    }

    for pair in &config.pairs {
        let base = create_item(
            pair.exchange.as_str(),
            pair.asset,
            CurrencyCode::new(&pair.base),
            pair.base_initial_funds,
            pair.transfer_fee,
        )?;
        let quote = create_item(
            pair.exchange.as_str(),
            pair.asset,
            CurrencyCode::new(&pair.quote),
            pair.quote_initial_funds,
            pair.transfer_fee,
        )?;
        manager.add_pair(create_pair(Some(&base), Some(&quote))?)?;
    }

    info!(
        "funding set up with {} items and {} pairs, exchange level funding: {}",
        config.items.len(),
        config.pairs.len(),
        config.exchange_level_funding
    );
    Ok(manager)
}

/// Valuer over the configured USD rates
pub fn valuer_from_config(config: &FundingConfig) -> StaticRateValuer {
    StaticRateValuer::from_rates(
        config
            .usd_rates
            .iter()
            .map(|(currency, rate)| (currency.as_str(), *rate)),
    )
}
