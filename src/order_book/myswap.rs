use bigdecimal::ToPrimitive;
use tracing::{info, warn};

use crate::{
    configuration::State,
    error::Error,
    helpers::hex_to_decimal,
    order_book::{price_level, to_decimal_price, to_f64, OrderBook, OrderBookBase},
    provider::selectors,
    types::{normalize_address, LiquidityTick, MySwapPool},
};

pub const DEX: &str = "MySwap";

pub const MYSWAP_CL_MM_ADDRESS: &str =
    "0x01114c7103e12c2b2ecbd3a2472ba9c48ddcbf702b1c242dd570057e26212111";

/// Highest tick in the liquidity maps, ticks are stored unsigned.
pub const MAX_MYSWAP_TICK: i64 = 1_774_532;

fn two_pow_128() -> f64 {
    2_f64.powi(128)
}

#[derive(Debug, Clone)]
pub struct MySwapOrderBook {
    base: OrderBookBase,
    apply_filtering: bool,
    decimals_diff: f64,
}

impl MySwapOrderBook {
    pub fn new(
        token_a: &str,
        token_b: &str,
        apply_filtering: bool,
    ) -> Result<Self, Error> {
        let base = OrderBookBase::new(DEX, token_a, token_b)?;
        let decimals_diff =
            10_f64.powi(base.decimals_a() as i32 - base.decimals_b() as i32);

        Ok(Self {
            base,
            apply_filtering,
            decimals_diff,
        })
    }

    pub fn filter_pools(&self, pools: Vec<MySwapPool>) -> Vec<MySwapPool> {
        let token_a = normalize_address(self.base.token_a.address);
        let token_b = normalize_address(self.base.token_b.address);

        pools
            .into_iter()
            .filter(|pool| {
                normalize_address(&pool.token0.address) == token_a
                    && normalize_address(&pool.token1.address) == token_b
            })
            .collect()
    }

    pub fn tick_to_price(&self, tick: i64) -> f64 {
        1.0001_f64.powf((tick - MAX_MYSWAP_TICK) as f64)
            * two_pow_128()
            * self.decimals_diff
    }

    pub fn price_to_tick(&self, price: f64) -> i64 {
        let signed = ((price / (two_pow_128() * self.decimals_diff)).ln()
            / 1.0001_f64.ln())
        .round();
        signed as i64 + MAX_MYSWAP_TICK
    }

    fn get_ticks_range(&self) -> (i64, i64) {
        let (low, high) = self.calculate_price_range();
        (self.price_to_tick(to_f64(&low)), self.price_to_tick(to_f64(&high)))
    }

    fn get_token_amount(&self, liquidity: f64, current_sqrt: f64, next_sqrt: f64) -> f64 {
        if current_sqrt == 0.0 {
            return 0.0;
        }
        if next_sqrt == 0.0 {
            return (liquidity / current_sqrt).abs() / self.decimals_diff;
        }
        (liquidity / next_sqrt - liquidity / current_sqrt).abs() / self.decimals_diff
    }

    pub fn calculate_order_book(
        &mut self,
        liquidity: Vec<LiquidityTick>,
        current_tick: i64,
    ) -> Result<(), Error> {
        if liquidity.is_empty() {
            info!("No liquidity data for the pool.");
            return Ok(());
        }

        let current_price = self.tick_to_price(current_tick);
        self.base.current_price = to_decimal_price(current_price)
            .ok_or_else(|| {
                Error::OrderBook(format!("Invalid price for tick {}", current_tick))
            })?;

        let mut data = liquidity;
        if self.apply_filtering {
            let (min_tick, max_tick) = self.get_ticks_range();
            data.retain(|item| item.tick > min_tick && item.tick <= max_tick);
        }

        let (mut asks, mut bids): (Vec<LiquidityTick>, Vec<LiquidityTick>) =
            data.into_iter().partition(|item| item.tick >= current_tick);
        asks.sort_by_key(|item| item.tick);
        bids.sort_by_key(|item| item.tick);

        let pool_liquidity = bids.first().map(|item| item.liq).unwrap_or(0.0);
        self.add_bids(&bids, current_price);
        self.add_asks(&asks, pool_liquidity, current_price);

        Ok(())
    }

    fn add_bids(&mut self, bids: &[LiquidityTick], current_price: f64) {
        let Some(first) = bids.first() else {
            return;
        };

        let next_price = self.tick_to_price(first.tick);
        let amount =
            self.get_token_amount(first.liq, current_price.sqrt(), next_price.sqrt());
        self.base.bids.extend(price_level(next_price, amount));

        for pair in bids.windows(2) {
            let price = self.tick_to_price(pair[0].tick);
            let next_price = self.tick_to_price(pair[1].tick);
            let amount =
                self.get_token_amount(pair[1].liq, price.sqrt(), next_price.sqrt());
            self.base.bids.extend(price_level(price, amount));
        }
    }

    fn add_asks(&mut self, asks: &[LiquidityTick], pool_liquidity: f64, current_price: f64) {
        let Some(first) = asks.first() else {
            return;
        };

        let next_price = self.tick_to_price(first.tick);
        let amount =
            self.get_token_amount(pool_liquidity, current_price.sqrt(), next_price.sqrt());
        self.base.asks.extend(price_level(next_price, amount));

        for pair in asks.windows(2) {
            let price = self.tick_to_price(pair[0].tick);
            let next_price = self.tick_to_price(pair[1].tick);
            let amount =
                self.get_token_amount(pair[0].liq, price.sqrt(), next_price.sqrt());
            self.base.asks.extend(price_level(price, amount));
        }
    }

    async fn get_current_tick(state: &State, pool_id: &str) -> Result<i64, Error> {
        let result = state
            .starknet
            .call(MYSWAP_CL_MM_ADDRESS, selectors::CURRENT_TICK, &[pool_id.to_owned()])
            .await?;
        let tick = result
            .first()
            .ok_or_else(|| Error::Rpc(String::from("Couldn't get current tick.")))?;

        hex_to_decimal(tick)?
            .to_i64()
            .ok_or_else(|| Error::Rpc(format!("Tick {} out of range", tick)))
    }
}

impl OrderBook for MySwapOrderBook {
    fn base(&self) -> &OrderBookBase {
        &self.base
    }

    async fn fetch_price_and_liquidity(&mut self, state: &State) -> Result<(), Error> {
        let all_pools = state.http.get_myswap_pools().await?;
        let pools = self.filter_pools(all_pools.pools);

        if pools.is_empty() {
            warn!(
                "No pools for pair: {} - {}",
                self.base.token_a.symbol, self.base.token_b.symbol
            );
        }

        for pool in pools {
            let liquidity = state.http.get_myswap_liquidity(&pool.poolkey).await?;
            if liquidity.is_empty() {
                info!("No liquidity data for pool {}", pool.poolkey);
                continue;
            }
            let current_tick = Self::get_current_tick(state, &pool.poolkey).await?;
            self.calculate_order_book(liquidity, current_tick)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::types::MySwapToken;

    use super::*;

    fn pool(token0: &str, token1: &str) -> MySwapPool {
        MySwapPool {
            poolkey: String::from("0x1"),
            token0: MySwapToken {
                symbol: String::new(),
                address: token0.to_owned(),
            },
            token1: MySwapToken {
                symbol: String::new(),
                address: token1.to_owned(),
            },
            pool_fee: None,
            tvl: None,
        }
    }

    #[test]
    fn test_tick_price_inverse() {
        let book = MySwapOrderBook::new("ETH", "USDC", false).unwrap();
        for tick in [MAX_MYSWAP_TICK - 900_000, MAX_MYSWAP_TICK - 100, MAX_MYSWAP_TICK] {
            let price = book.tick_to_price(tick);
            assert_eq!(book.price_to_tick(price), tick);
        }
    }

    #[test]
    fn test_filter_pools_ignores_leading_zeros() {
        let book = MySwapOrderBook::new("ETH", "USDC", false).unwrap();
        let pools = vec![
            pool(
                "0x49d36570d4e46f48e99674bd3fcc84644ddd6b96f7c741b1562b82f9e004dc7",
                "0x53c91253bc9682c04929ca02ed00b3e423f6710d2ee7e0d5ebb06f3ecf368a8",
            ),
            pool(
                "0x53c91253bc9682c04929ca02ed00b3e423f6710d2ee7e0d5ebb06f3ecf368a8",
                "0x49d36570d4e46f48e99674bd3fcc84644ddd6b96f7c741b1562b82f9e004dc7",
            ),
        ];
        assert_eq!(book.filter_pools(pools).len(), 1);
    }

    #[test]
    fn test_split_asks_and_bids() {
        let mut book = MySwapOrderBook::new("ETH", "USDC", false).unwrap();
        let current = MAX_MYSWAP_TICK - 1000;
        let liquidity = vec![
            LiquidityTick { tick: current + 20, liq: 1e12 },
            LiquidityTick { tick: current - 10, liq: 2e12 },
            LiquidityTick { tick: current, liq: 3e12 },
            LiquidityTick { tick: current - 30, liq: 4e12 },
        ];
        book.calculate_order_book(liquidity, current).unwrap();

        let snapshot = book.get_order_book();
        assert_eq!(snapshot.dex, "MySwap");
        assert_eq!(snapshot.asks.len(), 2);
        assert_eq!(snapshot.bids.len(), 2);
        assert!(snapshot.bids.iter().all(|(price, _)| price < &snapshot.current_price));
        assert!(snapshot.asks.iter().all(|(price, _)| price >= &snapshot.current_price));
    }

    #[test]
    fn test_empty_liquidity_is_noop() {
        let mut book = MySwapOrderBook::new("ETH", "USDC", true).unwrap();
        book.calculate_order_book(Vec::new(), MAX_MYSWAP_TICK).unwrap();
        assert!(book.get_order_book().asks.is_empty());
    }
}
