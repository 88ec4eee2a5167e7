use tracing::{info, warn};

use crate::{
    configuration::State,
    error::Error,
    order_book::{price_level, to_f64, OrderBook, OrderBookBase},
    types::{normalize_address, EkuboPool, EkuboTickLiquidity},
};

pub const DEX: &str = "Ekubo";

fn pure_sqrt_ratio(tick: i64) -> f64 {
    1.000001_f64.sqrt().powf(tick as f64)
}

#[derive(Debug, Clone)]
pub struct EkuboOrderBook {
    base: OrderBookBase,
    decimals_diff: f64,
}

impl EkuboOrderBook {
    pub fn new(token_a: &str, token_b: &str) -> Result<Self, Error> {
        let base = OrderBookBase::new(DEX, token_a, token_b)?;
        let decimals_diff =
            10_f64.powi(base.decimals_a() as i32 - base.decimals_b() as i32);

        Ok(Self {
            base,
            decimals_diff,
        })
    }

    pub fn tick_to_price(&self, tick: i64) -> f64 {
        pure_sqrt_ratio(tick).powi(2) * self.decimals_diff
    }

    pub fn filter_pools(&self, pools: Vec<EkuboPool>) -> Vec<EkuboPool> {
        let token_a = normalize_address(self.base.token_a.address);
        let token_b = normalize_address(self.base.token_b.address);

        pools
            .into_iter()
            .filter(|pool| {
                normalize_address(&pool.token0) == token_a
                    && normalize_address(&pool.token1) == token_b
            })
            .collect()
    }

    /// Levels of one pool, kept only inside the price range of the pair.
    pub fn calculate_order_book(
        &mut self,
        mut liquidity: Vec<EkuboTickLiquidity>,
        pool: &EkuboPool,
    ) {
        if liquidity.is_empty() {
            return;
        }
        liquidity.sort_by_key(|item| item.tick);

        self.add_asks(&liquidity, pool);
        self.add_bids(&liquidity, pool);

        let (min_price, max_price) = self.calculate_price_range();
        self.base
            .asks
            .retain(|(price, _)| price > &min_price && price < &max_price);
        self.base
            .bids
            .retain(|(price, _)| price > &min_price && price < &max_price);
    }

    fn add_asks(&mut self, liquidity: &[EkuboTickLiquidity], pool: &EkuboPool) {
        let ticks: Vec<&EkuboTickLiquidity> =
            liquidity.iter().filter(|item| item.tick >= pool.tick).collect();
        let Some(first) = ticks.first() else {
            return;
        };

        let decimals = 10_f64.powi(self.base.decimals_a() as i32);
        let supply = |liq: f64, prev: i64, next: i64| {
            ((liq / pure_sqrt_ratio(prev)) - (liq / pure_sqrt_ratio(next))).abs()
                / decimals
        };

        let mut glob_liq = to_f64(&pool.liquidity);
        let prev_tick = first.tick - pool.tick_spacing;
        self.base.asks.extend(price_level(
            self.tick_to_price(prev_tick),
            supply(glob_liq, prev_tick, first.tick),
        ));

        for pair in ticks.windows(2) {
            glob_liq += to_f64(&pair[0].net_liquidity_delta_diff);
            self.base.asks.extend(price_level(
                self.tick_to_price(pair[0].tick),
                supply(glob_liq, pair[0].tick, pair[1].tick),
            ));
        }
    }

    fn add_bids(&mut self, liquidity: &[EkuboTickLiquidity], pool: &EkuboPool) {
        let ticks: Vec<&EkuboTickLiquidity> = liquidity
            .iter()
            .rev()
            .filter(|item| item.tick <= pool.tick)
            .collect();
        let Some(first) = ticks.first() else {
            return;
        };

        let decimals = 10_f64.powi(self.base.decimals_b() as i32);
        let supply = |liq: f64, prev: i64, next: i64| {
            ((liq * pure_sqrt_ratio(prev)) - (liq * pure_sqrt_ratio(next))).abs()
                / decimals
        };

        let mut glob_liq = to_f64(&pool.liquidity);
        let prev_tick = first.tick + pool.tick_spacing;
        self.base.bids.extend(price_level(
            self.tick_to_price(prev_tick),
            supply(glob_liq, prev_tick, first.tick),
        ));

        for pair in ticks.windows(2) {
            glob_liq -= to_f64(&pair[0].net_liquidity_delta_diff);
            self.base.bids.extend(price_level(
                self.tick_to_price(pair[0].tick),
                supply(glob_liq, pair[0].tick, pair[1].tick),
            ));
        }
    }
}

impl OrderBook for EkuboOrderBook {
    fn base(&self) -> &OrderBookBase {
        &self.base
    }

    async fn fetch_price_and_liquidity(&mut self, state: &State) -> Result<(), Error> {
        let pools = self.filter_pools(state.http.get_ekubo_pools().await?);

        if pools.is_empty() {
            warn!(
                "No pools for pair: {} - {}",
                self.base.token_a.symbol, self.base.token_b.symbol
            );
            return Ok(());
        }

        let price = state
            .http
            .get_ekubo_price(self.base.token_a.address, self.base.token_b.address)
            .await?;
        self.base.current_price = price.price;

        for pool in pools {
            self.base.block = pool
                .last_update
                .as_ref()
                .and_then(|update| update.event_id.parse().ok());

            let liquidity = state.http.get_ekubo_pool_liquidity(&pool.key_hash).await?;
            if liquidity.data.is_empty() {
                info!("No liquidity data for pool {}", pool.key_hash);
                continue;
            }
            self.calculate_order_book(liquidity.data, &pool);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::order_book::to_decimal_price;

    const ETH: &str = "0x049d36570d4e46f48e99674bd3fcc84644ddd6b96f7c741b1562b82f9e004dc7";
    const USDC: &str = "0x053c91253bc9682c04929ca02ed00b3e423f6710d2ee7e0d5ebb06f3ecf368a8";

    fn pool(token0: &str, token1: &str, tick: i64) -> EkuboPool {
        EkuboPool {
            key_hash: String::from("0xabc"),
            token0: token0.to_owned(),
            token1: token1.to_owned(),
            tick_spacing: 1000,
            tick,
            liquidity: BigDecimal::from_str("35067659406163360487").unwrap(),
            last_update: None,
        }
    }

    fn tick(tick: i64, delta: &str) -> EkuboTickLiquidity {
        EkuboTickLiquidity {
            tick,
            net_liquidity_delta_diff: BigDecimal::from_str(delta).unwrap(),
        }
    }

    #[test]
    fn test_tick_to_price() {
        let book = EkuboOrderBook::new("ETH", "USDC").unwrap();
        assert!((book.tick_to_price(0) - 1e12).abs() < 1.0);

        let price = book.tick_to_price(-19_500_000);
        assert!(price > 3000.0 && price < 3500.0);
    }

    #[test]
    fn test_filter_pools_by_pair_order() {
        let book = EkuboOrderBook::new("ETH", "USDC").unwrap();
        let pools = vec![
            pool("0x49d36570d4e46f48e99674bd3fcc84644ddd6b96f7c741b1562b82f9e004dc7", USDC, 0),
            pool(USDC, ETH, 0),
        ];
        assert_eq!(book.filter_pools(pools).len(), 1);
    }

    #[test]
    fn test_levels_around_current_tick() {
        let mut book = EkuboOrderBook::new("ETH", "USDC").unwrap();
        let current = -19_500_000;
        let pool = pool(ETH, USDC, current);
        book.base.current_price = to_decimal_price(book.tick_to_price(current)).unwrap();

        let liquidity = vec![
            tick(current + 3000, "-1000"),
            tick(current - 2000, "500"),
            tick(current + 1000, "2000"),
            tick(current - 5000, "700"),
        ];
        book.calculate_order_book(liquidity, &pool);

        let snapshot = book.get_order_book();
        assert_eq!(snapshot.dex, "Ekubo");
        assert_eq!(snapshot.asks.len(), 2);
        assert_eq!(snapshot.bids.len(), 2);
        assert!(snapshot.asks.iter().all(|(_, amount)| amount > &BigDecimal::from(0)));
        assert!(snapshot.bids.iter().all(|(_, amount)| amount > &BigDecimal::from(0)));
    }

    #[test]
    fn test_levels_outside_price_range_are_dropped() {
        let mut book = EkuboOrderBook::new("ETH", "USDC").unwrap();
        let current = -19_500_000;
        let pool = pool(ETH, USDC, current);
        book.base.current_price = to_decimal_price(book.tick_to_price(current)).unwrap();

        // 1.000001^12_000_000 is far above the 100x ceiling.
        book.calculate_order_book(vec![tick(current + 12_000_000, "1")], &pool);
        assert!(book.get_order_book().asks.is_empty());
    }
}
