use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use tracing::info;

use crate::{
    configuration::State,
    error::Error,
    helpers::u256_to_decimal,
    order_book::{decimal_range, get_collateral_token_range, OrderBook, OrderBookBase},
    types::TokenSettings,
};

pub const DEX: &str = "Starknet";

/// Constant product pools per pair, reserves are summed over every address.
static POOLS: [(&str, &str, &[&str]); 9] = [
    (
        "ETH",
        "USDC",
        &[
            "0x04d0390b777b424e43839cd1e744799f3de6c176c7e32c1812a41dbd9c19db6a",
            "0x030615bec9c1506bfac97d9dbd3c546307987d467a7f95d5533c2e861eb81f3f",
            "0x000023c72abdf49dffc85ae3ede714f2168ad384cc67d08524732acea90df325",
        ],
    ),
    (
        "DAI",
        "ETH",
        &[
            "0x07e2a13b40fc1119ec55e0bcf9428eedaa581ab3c924561ad4e955f95da63138",
            "0x0032ebb8e68553620b97b308684babf606d9556d5c0a652450c32e85f40d000d",
            "0x017e9e62c04b50800d7c59454754fe31a2193c9c3c6c92c093f2ab0faadf8c87",
        ],
    ),
    (
        "ETH",
        "USDT",
        &[
            "0x045e7131d776dddc137e30bdd490b431c7144677e97bf9369f629ed8d3fb7dd6",
            "0x00691fa7f66d63dc8c89ff4e77732fff5133f282e7dbd41813273692cc595516",
            "0x05900cfa2b50d53b097cb305d54e249e31f24f881885aae5639b0cd6af4ed298",
        ],
    ),
    (
        "wBTC",
        "ETH",
        &[
            "0x0260e98362e0949fefff8b4de85367c035e44f734c9f8069b6ce2075ae86b45c",
            "0x02a6e0ecda844736c4803a385fb1372eff458c365d2325c7d4e08032c7a908f3",
        ],
    ),
    (
        "wBTC",
        "USDC",
        &[
            "0x005a8054e5ca0b277b295a830e53bd71a6a6943b42d0dbb22329437522bc80c8",
            "0x022e45d94d5c6c477d9efd440aad71b2c02a5cd5bed9a4d6da10bb7c19fd93ba",
        ],
    ),
    (
        "wBTC",
        "USDT",
        &[
            "0x044d13ad98a46fd2322ef2637e5e4c292ce8822f47b7cb9a1d581176a801c1a0",
            "0x050031010bcee2f43575b3afe197878e064e1a03c12f2ff437f29a2710e0b6ef",
        ],
    ),
    (
        "DAI",
        "wBTC",
        &[
            "0x039c183c8e5a2df130eefa6fbaa3b8aad89b29891f6272cb0c90deaa93ec6315",
            "0x00f9d8f827734f5fd54571f0e78398033a3c1f1074a471cd4623f2aa45163718",
        ],
    ),
    (
        "DAI",
        "USDC",
        &[
            "0x00cfd39f5244f7b617418c018204a8a9f9a7f72e71f0ef38f968eeb2a9ca302b",
            "0x015e9cd2d4d6b4bb9f1124688b1e6bc19b4ff877a01011d28c25c9ee918e83e5",
            "0x02e767b996c8d4594c73317bb102c2018b9036aee8eed08ace5f45b3568b94e5",
        ],
    ),
    (
        "DAI",
        "USDT",
        &["0x00f0f5b3eed258344152e1f17baf84a2e1b621cd754b625bec169e8595aea767"],
    ),
];

/// `A/B` with the symbols sorted.
pub fn tokens_to_id(token_a: &str, token_b: &str) -> String {
    if token_a <= token_b {
        format!("{}/{}", token_a, token_b)
    } else {
        format!("{}/{}", token_b, token_a)
    }
}

pub fn find_pool(token_a: &str, token_b: &str) -> Option<&'static [&'static str]> {
    let id = tokens_to_id(token_a, token_b);
    POOLS
        .iter()
        .find(|(a, b, _)| tokens_to_id(a, b) == id)
        .map(|(_, _, addresses)| *addresses)
}

#[derive(Debug, Clone)]
pub struct UniswapV2OrderBook {
    base: OrderBookBase,
}

impl UniswapV2OrderBook {
    pub fn new(token_a: &str, token_b: &str) -> Result<Self, Error> {
        Ok(Self {
            base: OrderBookBase::new(DEX, token_a, token_b)?,
        })
    }

    async fn get_reserves(
        state: &State,
        token: &TokenSettings,
        pools: &[&str],
    ) -> Result<BigDecimal, Error> {
        let mut total = BigDecimal::zero();

        for pool in pools {
            let balance = state.starknet.balance_of(token.address, pool).await?;
            let (low, high) = match balance.as_slice() {
                [low, high, ..] => (low.as_str(), high.as_str()),
                [low] => (low.as_str(), "0x0"),
                [] => {
                    return Err(Error::Rpc(format!(
                        "Empty balance of {} in pool {}",
                        token.symbol, pool
                    )))
                },
            };
            total += u256_to_decimal(low, high)?;
        }

        Ok(total / token.decimal_factor())
    }

    pub fn get_prices_range(&self, current_price: &BigDecimal) -> Vec<BigDecimal> {
        if let Some(range) =
            get_collateral_token_range(self.base.token_a.symbol, current_price)
        {
            return range;
        }

        let step = current_price / BigDecimal::from(100);
        let stop = current_price * BigDecimal::from_str("1.3").unwrap_or_else(|_| BigDecimal::from(1));
        decimal_range(&BigDecimal::zero(), &stop, &step)
    }

    /// Supply available at `price` for a constant product pool.
    pub fn supply_at_price(
        price: &BigDecimal,
        reserves_a: &BigDecimal,
        reserves_b: &BigDecimal,
    ) -> BigDecimal {
        let constant = reserves_a * reserves_b;
        let supply = (price * constant).sqrt().unwrap_or_else(BigDecimal::zero);
        let factor = BigDecimal::from(1)
            - BigDecimal::from_str("0.95")
                .ok()
                .and_then(|value| value.sqrt())
                .unwrap_or_else(BigDecimal::zero);
        supply * factor
    }

    pub fn calculate_order_book(
        &mut self,
        reserves_a: &BigDecimal,
        reserves_b: &BigDecimal,
    ) -> Result<(), Error> {
        if reserves_a.is_zero() || reserves_b.is_zero() {
            return Err(Error::OrderBook(String::from("Reserves can't be zero")));
        }

        let current_price = reserves_b / reserves_a;
        let prices = self.get_prices_range(&current_price);
        self.add_quantities_data(&prices, &current_price, reserves_a, reserves_b)?;
        self.set_current_price()?;
        self.base.block = Some(0);

        Ok(())
    }

    fn add_quantities_data(
        &mut self,
        prices: &[BigDecimal],
        current_price: &BigDecimal,
        reserves_a: &BigDecimal,
        reserves_b: &BigDecimal,
    ) -> Result<(), Error> {
        if current_price.is_zero() {
            return Err(Error::OrderBook(String::from(
                "Provide valid prices range and current price for analysis.",
            )));
        }

        for price in prices {
            let supply = Self::supply_at_price(price, reserves_a, reserves_b);
            if price < current_price {
                self.base.bids.push((price.clone(), supply));
            } else {
                self.base.asks.push((price.clone(), supply));
            }
        }

        Ok(())
    }

    fn set_current_price(&mut self) -> Result<(), Error> {
        let max_bid = self.base.bids.iter().map(|(price, _)| price).max();
        let min_ask = self.base.asks.iter().map(|(price, _)| price).min();

        match (max_bid, min_ask) {
            (Some(bid), Some(ask)) => {
                self.base.current_price = (bid + ask) / BigDecimal::from(2);
                Ok(())
            },
            _ => Err(Error::OrderBook(String::from(
                "Asks and bids are required to calculate the current price.",
            ))),
        }
    }
}

impl OrderBook for UniswapV2OrderBook {
    fn base(&self) -> &OrderBookBase {
        &self.base
    }

    async fn fetch_price_and_liquidity(&mut self, state: &State) -> Result<(), Error> {
        let token_a = self.base.token_a;
        let token_b = self.base.token_b;
        let pools = find_pool(token_a.symbol, token_b.symbol).ok_or_else(|| {
            Error::OrderBook(format!(
                "Pool {} not found.",
                tokens_to_id(token_a.symbol, token_b.symbol)
            ))
        })?;

        let reserves_a = Self::get_reserves(state, token_a, pools).await?;
        let reserves_b = Self::get_reserves(state, token_b, pools).await?;
        info!(
            "{} reserves {} {} / {} {}",
            DEX, reserves_a, token_a.symbol, reserves_b, token_b.symbol
        );

        self.calculate_order_book(&reserves_a, &reserves_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    #[test]
    fn test_tokens_to_id() {
        assert_eq!(tokens_to_id("USDC", "ETH"), "ETH/USDC");
        assert_eq!(tokens_to_id("wBTC", "ETH"), "ETH/wBTC");
        assert!(find_pool("USDC", "ETH").is_some());
        assert!(find_pool("ETH", "wBTC").is_some());
        assert!(find_pool("ETH", "STRK").is_none());
    }

    #[test]
    fn test_zero_reserves_fail() {
        let mut book = UniswapV2OrderBook::new("ETH", "USDC").unwrap();
        let result = book.calculate_order_book(&BigDecimal::zero(), &dec("100"));
        assert!(result.is_err());
    }

    #[test]
    fn test_order_book_from_reserves() {
        let mut book = UniswapV2OrderBook::new("DAI", "USDC").unwrap();
        book.calculate_order_book(&dec("1000"), &dec("1000")).unwrap();

        let snapshot = book.get_order_book();
        assert_eq!(snapshot.block, Some(0));
        assert_eq!(snapshot.dex, "Starknet");
        assert!(snapshot.bids.iter().all(|(price, _)| price < &dec("1")));
        assert!(snapshot.asks.iter().all(|(price, _)| price >= &dec("1")));
        assert_eq!(snapshot.bids.len(), 100);
        assert_eq!(snapshot.asks.len(), 30);
        assert_eq!(snapshot.current_price, dec("0.995"));
    }

    #[test]
    fn test_collateral_price_grid() {
        let book = UniswapV2OrderBook::new("ETH", "USDC").unwrap();
        let prices = book.get_prices_range(&dec("100"));
        assert_eq!(prices, vec![dec("50"), dec("100")]);
    }

    #[test]
    fn test_supply_at_price() {
        let supply = UniswapV2OrderBook::supply_at_price(&dec("1"), &dec("100"), &dec("100"));
        assert!(supply > dec("2.5") && supply < dec("2.6"));
    }
}
