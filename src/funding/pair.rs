//! Base/quote funding dedicated to one market

use rust_decimal::Decimal;

use super::item::Item;
use crate::common::errors::{FundingError, Result};
use crate::common::types::{Asset, CurrencyPair, Direction};

/// Read-only view of a pair's balances
pub trait PairReader: Send + Sync {
    fn base_initial_funds(&self) -> Decimal;
    fn quote_initial_funds(&self) -> Decimal;
    fn base_available(&self) -> Decimal;
    fn quote_available(&self) -> Decimal;
}

/// What order sizing needs: check and reserve funds
pub trait PairReserver: PairReader {
    /// Whether there is anything to spend for `direction`
    fn can_place_order(&self, direction: Direction) -> bool;

    /// Reserve the side of the pair that `direction` consumes
    fn reserve(&self, amount: Decimal, direction: Direction) -> Result<()>;
}

/// What fill handling needs: settle reserved funds
pub trait PairReleaser: PairReserver {
    /// Credit the side of the pair that `direction` produces
    fn increase_available(&self, amount: Decimal, direction: Direction);

    /// Release reserved funds for `direction`, crediting the other side
    fn release(&self, amount: Decimal, fee: Decimal, direction: Direction) -> Result<()>;
}

/// Two linked items. A buy spends quote and receives base; a sell spends base
/// and receives quote.
#[derive(Debug, Clone)]
pub struct Pair {
    pub base: Item,
    pub quote: Item,
}

/// Link two items as a pair
pub fn create_pair(base: Option<&Item>, quote: Option<&Item>) -> Result<Pair> {
    let base = base.ok_or(FundingError::NilArgument("base"))?;
    let quote = quote.ok_or(FundingError::NilArgument("quote"))?;
    base.set_paired_with(quote);
    quote.set_paired_with(base);
    Ok(Pair {
        base: base.clone(),
        quote: quote.clone(),
    })
}

impl Pair {
    pub fn exchange(&self) -> &str {
        self.base.exchange()
    }

    pub fn asset(&self) -> Asset {
        self.base.asset()
    }

    pub fn currency_pair(&self) -> CurrencyPair {
        CurrencyPair::new(self.base.currency().clone(), self.quote.currency().clone())
    }

    pub(crate) fn matches(&self, exchange: &str, asset: Asset, pair: &CurrencyPair) -> bool {
        self.base.matches_identity(exchange, asset, &pair.base)
            && self.quote.matches_identity(exchange, asset, &pair.quote)
    }

    pub(crate) fn matches_pair(&self, other: &Pair) -> bool {
        self.base.matches_item_currency(Some(&other.base))
            && self.quote.matches_item_currency(Some(&other.quote))
    }
}

impl PairReader for Pair {
    fn base_initial_funds(&self) -> Decimal {
        self.base.initial_funds()
    }

    fn quote_initial_funds(&self) -> Decimal {
        self.quote.initial_funds()
    }

    fn base_available(&self) -> Decimal {
        self.base.available()
    }

    fn quote_available(&self) -> Decimal {
        self.quote.available()
    }
}

impl PairReserver for Pair {
    fn can_place_order(&self, direction: Direction) -> bool {
        match direction {
            Direction::Buy => self.quote.available() > Decimal::ZERO,
            Direction::Sell => self.base.available() > Decimal::ZERO,
            _ => false,
        }
    }

    fn reserve(&self, amount: Decimal, direction: Direction) -> Result<()> {
        match direction {
            Direction::Buy => self.quote.reserve(amount),
            Direction::Sell => self.base.reserve(amount),
            other => Err(FundingError::InvalidDirection(other.to_string())),
        }
    }
}

impl PairReleaser for Pair {
    fn increase_available(&self, amount: Decimal, direction: Direction) {
        match direction {
            Direction::Buy => self.base.increase_available(amount),
            Direction::Sell => self.quote.increase_available(amount),
            _ => {}
        }
    }

    fn release(&self, amount: Decimal, fee: Decimal, direction: Direction) -> Result<()> {
        match direction {
            Direction::Buy => self.quote.release(amount, fee),
            Direction::Sell => self.base.release(amount, fee),
            other => Err(FundingError::InvalidDirection(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::CurrencyCode;
    use crate::funding::item::create_item;
    use rust_decimal_macros::dec;

    const ELITE: Decimal = dec!(1337);

    fn spot(currency: &str, funds: Decimal) -> Item {
        create_item("exch", Asset::Spot, CurrencyCode::new(currency), funds, Decimal::ZERO).unwrap()
    }

    fn doge_xrp() -> Pair {
        let base = spot("DOGE", Decimal::ZERO);
        let quote = spot("XRP", ELITE);
        create_pair(Some(&base), Some(&quote)).unwrap()
    }

    #[test]
    fn test_create_pair_links_both_sides() {
        let p = doge_xrp();
        assert!(p.base.paired_with().unwrap().same_holding(&p.quote));
        assert!(p.quote.paired_with().unwrap().same_holding(&p.base));
        assert_eq!(p.currency_pair(), CurrencyPair::new("DOGE", "XRP"));
    }

    #[test]
    fn test_create_pair_requires_both_items() {
        let p = doge_xrp();
        assert_eq!(
            create_pair(Some(&p.base), None).unwrap_err(),
            FundingError::NilArgument("quote")
        );
        assert_eq!(
            create_pair(None, Some(&p.quote)).unwrap_err(),
            FundingError::NilArgument("base")
        );
    }

    #[test]
    fn test_initial_funds_and_available() {
        let p = doge_xrp();
        assert!(p.base_initial_funds().is_zero());
        assert_eq!(p.quote_initial_funds(), ELITE);
        assert!(p.base_available().is_zero());
        assert_eq!(p.quote_available(), ELITE);
    }

    #[test]
    fn test_reserve_pair() {
        let p = doge_xrp();
        assert_eq!(
            p.reserve(Decimal::ZERO, Direction::Buy),
            Err(FundingError::ZeroOrNegativeAmount(Decimal::ZERO))
        );
        assert!(p.reserve(ELITE, Direction::Buy).is_ok());
        assert_eq!(
            p.reserve(Decimal::ZERO, Direction::Sell),
            Err(FundingError::ZeroOrNegativeAmount(Decimal::ZERO))
        );
        assert!(matches!(
            p.reserve(ELITE, Direction::Sell),
            Err(FundingError::InsufficientFunds { .. })
        ));
        assert!(matches!(
            p.reserve(ELITE, Direction::DoNothing),
            Err(FundingError::InvalidDirection(_))
        ));
    }

    #[test]
    fn test_release_pair() {
        let p = doge_xrp();
        p.reserve(ELITE, Direction::Buy).unwrap();

        assert_eq!(
            p.release(Decimal::ZERO, Decimal::ZERO, Direction::Buy),
            Err(FundingError::ZeroOrNegativeAmount(Decimal::ZERO))
        );
        assert!(p.release(ELITE, Decimal::ZERO, Direction::Buy).is_ok());
        assert_eq!(p.base_available(), ELITE);
        assert!(matches!(
            p.release(ELITE, Decimal::ZERO, Direction::Buy),
            Err(FundingError::InsufficientReserved { .. })
        ));
        assert!(matches!(
            p.release(ELITE, Decimal::ZERO, Direction::MissingData),
            Err(FundingError::InvalidDirection(_))
        ));
        assert!(matches!(
            p.release(ELITE, Decimal::ZERO, Direction::Sell),
            Err(FundingError::InsufficientReserved { .. })
        ));
        assert_eq!(
            p.release(Decimal::ZERO, Decimal::ZERO, Direction::Sell),
            Err(FundingError::ZeroOrNegativeAmount(Decimal::ZERO))
        );
    }

    #[test]
    fn test_sell_release_credits_quote() {
        let p = doge_xrp();
        p.reserve(ELITE, Direction::Buy).unwrap();
        p.release(ELITE, Decimal::ZERO, Direction::Buy).unwrap();

        p.reserve(dec!(1000), Direction::Sell).unwrap();
        p.release(dec!(1000), dec!(10), Direction::Sell).unwrap();
        assert_eq!(p.base_available(), dec!(337));
        assert_eq!(p.quote_available(), dec!(990));
    }

    #[test]
    fn test_increase_available_pair() {
        let p = doge_xrp();
        p.increase_available(Decimal::ZERO, Direction::Buy);
        assert_eq!(p.quote_available(), ELITE);
        p.increase_available(Decimal::ZERO, Direction::Sell);
        assert!(p.base_available().is_zero());

        p.increase_available(-ELITE, Direction::Sell);
        assert_eq!(p.quote_available(), ELITE);
        p.increase_available(ELITE, Direction::Buy);
        assert_eq!(p.base_available(), ELITE);

        p.increase_available(ELITE, Direction::DoNothing);
        assert_eq!(p.base_available(), ELITE);
        assert_eq!(p.quote_available(), ELITE);
    }

    #[test]
    fn test_can_place_order() {
        let base = spot("DOGE", Decimal::ZERO);
        let quote = spot("XRP", Decimal::ZERO);
        let p = create_pair(Some(&base), Some(&quote)).unwrap();
        assert!(!p.can_place_order(Direction::DoNothing));
        assert!(!p.can_place_order(Direction::Buy));
        assert!(!p.can_place_order(Direction::Sell));

        p.quote.increase_available(dec!(32));
        assert!(p.can_place_order(Direction::Buy));
        assert!(!p.can_place_order(Direction::Sell));
        p.base.increase_available(dec!(32));
        assert!(p.can_place_order(Direction::Sell));
    }
}
