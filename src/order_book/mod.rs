//! Order books assembled from AMM reserves and liquidity maps.
//!
//! Every book is built for a `(token_a, token_b)` pair, prices are quoted in
//! `token_b` per `token_a`, and levels are `(price, quantity)` tuples.

use std::{future::Future, str::FromStr};

use bigdecimal::{BigDecimal, FromPrimitive, ToPrimitive, Zero};
use chrono::Utc;

use crate::{
    configuration::State,
    error::Error,
    types::{find_token, OrderBookSnapshot, PriceLevel, TokenSettings},
};

pub use self::{
    ekubo::EkuboOrderBook,
    haiko::HaikoOrderBook,
    myswap::MySwapOrderBook,
    processor::calculate_price_change,
    uniswap_v2::{find_pool, UniswapV2OrderBook},
};

mod ekubo;
mod haiko;
mod myswap;
mod processor;
mod uniswap_v2;

/// Venues with a stored order book.
pub const DEXES: [&str; 4] = [uniswap_v2::DEX, myswap::DEX, ekubo::DEX, haiko::DEX];

const PRICE_PRECISION: u64 = 18;

pub fn min_price_range() -> BigDecimal {
    BigDecimal::from_str("0.0001").unwrap_or_else(|_| BigDecimal::zero())
}

pub fn max_price_range() -> BigDecimal {
    BigDecimal::from(100)
}

#[derive(Debug, Clone)]
pub struct OrderBookBase {
    pub token_a: &'static TokenSettings,
    pub token_b: &'static TokenSettings,
    pub dex: &'static str,
    pub block: Option<i64>,
    pub current_price: BigDecimal,
    pub asks: Vec<PriceLevel>,
    pub bids: Vec<PriceLevel>,
}

impl OrderBookBase {
    pub fn new(
        dex: &'static str,
        token_a: &str,
        token_b: &str,
    ) -> Result<Self, Error> {
        let token_a = find_token(token_a)
            .ok_or_else(|| Error::UnknownToken(token_a.to_owned()))?;
        let token_b = find_token(token_b)
            .ok_or_else(|| Error::UnknownToken(token_b.to_owned()))?;

        Ok(Self {
            token_a,
            token_b,
            dex,
            block: None,
            current_price: BigDecimal::zero(),
            asks: Vec::new(),
            bids: Vec::new(),
        })
    }

    pub fn decimals_a(&self) -> u32 {
        self.token_a.decimals
    }

    pub fn decimals_b(&self) -> u32 {
        self.token_b.decimals
    }
}

pub trait OrderBook {
    fn base(&self) -> &OrderBookBase;

    /// Loads prices and liquidity from the venue and fills asks and bids.
    fn fetch_price_and_liquidity(
        &mut self,
        state: &State,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    fn calculate_price_range(&self) -> (BigDecimal, BigDecimal) {
        let current = &self.base().current_price;
        (current * min_price_range(), current * max_price_range())
    }

    fn get_order_book(&self) -> OrderBookSnapshot {
        let base = self.base();
        let mut asks = base.asks.clone();
        let mut bids = base.bids.clone();
        asks.sort_by(|a, b| a.0.cmp(&b.0));
        bids.sort_by(|a, b| a.0.cmp(&b.0));

        OrderBookSnapshot {
            token_a: base.token_a.symbol.to_owned(),
            token_b: base.token_b.symbol.to_owned(),
            timestamp: Utc::now().timestamp(),
            block: base.block,
            dex: base.dex.to_owned(),
            current_price: base.current_price.clone(),
            asks,
            bids,
        }
    }
}

/// Values from `start` (inclusive) to `stop` (exclusive).
pub fn decimal_range(
    start: &BigDecimal,
    stop: &BigDecimal,
    step: &BigDecimal,
) -> Vec<BigDecimal> {
    let mut items = Vec::new();
    if step <= &BigDecimal::zero() {
        return items;
    }

    let mut value = start.clone();
    while &value < stop {
        items.push(value.clone());
        value += step;
    }

    items
}

/// Price grid for the collateral tokens that have a fixed step.
pub fn get_collateral_token_range(
    symbol: &str,
    price: &BigDecimal,
) -> Option<Vec<BigDecimal>> {
    let step = match symbol {
        "ETH" => BigDecimal::from(50),
        "wBTC" => BigDecimal::from(500),
        "STRK" => BigDecimal::from_str("0.05").ok()?,
        _ => return None,
    };
    let stop = price * BigDecimal::from_str("1.2").ok()?;
    Some(decimal_range(&step, &stop, &step))
}

pub(crate) fn to_f64(value: &BigDecimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Float level rounded to 18 significant digits, `None` for NaN or infinity.
pub(crate) fn price_level(price: f64, amount: f64) -> Option<PriceLevel> {
    let price = BigDecimal::from_f64(price)?.with_prec(PRICE_PRECISION);
    let amount = BigDecimal::from_f64(amount)?.with_prec(PRICE_PRECISION);
    Some((price, amount))
}

pub(crate) fn to_decimal_price(price: f64) -> Option<BigDecimal> {
    BigDecimal::from_f64(price).map(|value| value.with_prec(PRICE_PRECISION))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    struct FixedBook(OrderBookBase);

    impl OrderBook for FixedBook {
        fn base(&self) -> &OrderBookBase {
            &self.0
        }

        async fn fetch_price_and_liquidity(
            &mut self,
            _state: &State,
        ) -> Result<(), Error> {
            Ok(())
        }
    }

    #[test]
    fn test_decimal_range() {
        let items = decimal_range(&dec("0"), &dec("1"), &dec("0.25"));
        assert_eq!(items, vec![dec("0"), dec("0.25"), dec("0.5"), dec("0.75")]);
        assert!(decimal_range(&dec("0"), &dec("1"), &dec("0")).is_empty());
    }

    #[test]
    fn test_collateral_token_range() {
        let items = get_collateral_token_range("ETH", &dec("200")).unwrap();
        assert_eq!(items, vec![dec("50"), dec("100"), dec("150"), dec("200")]);
        assert!(get_collateral_token_range("USDC", &dec("1")).is_none());
    }

    #[test]
    fn test_price_level_skips_non_finite() {
        assert!(price_level(f64::NAN, 1.0).is_none());
        assert!(price_level(1.0, f64::INFINITY).is_none());
        let (price, amount) = price_level(0.5, 2.0).unwrap();
        assert_eq!(price, dec("0.5"));
        assert_eq!(amount, dec("2"));
    }

    #[test]
    fn test_base_rejects_unknown_token() {
        assert!(OrderBookBase::new("Starknet", "ETH", "XYZ").is_err());
        let base = OrderBookBase::new("Starknet", "ETH", "USDC").unwrap();
        assert_eq!(base.decimals_a(), 18);
        assert_eq!(base.decimals_b(), 6);
    }

    #[test]
    fn test_price_range_and_sorted_book() {
        let mut base = OrderBookBase::new("Starknet", "ETH", "USDC").unwrap();
        base.current_price = dec("2000");
        base.asks = vec![(dec("2100"), dec("1")), (dec("2050"), dec("2"))];
        base.bids = vec![(dec("1950"), dec("3")), (dec("1900"), dec("4"))];
        let book = FixedBook(base);

        let (low, high) = book.calculate_price_range();
        assert_eq!(low, dec("0.2"));
        assert_eq!(high, dec("200000"));

        let snapshot = book.get_order_book();
        assert_eq!(snapshot.token_a, "ETH");
        assert_eq!(snapshot.dex, "Starknet");
        assert_eq!(snapshot.asks[0].0, dec("2050"));
        assert_eq!(snapshot.bids[0].0, dec("1900"));
    }
}
