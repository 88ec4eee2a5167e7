use bigdecimal::BigDecimal;
use tracing::{info, warn};

use crate::{
    configuration::State,
    error::Error,
    order_book::{price_level, to_f64, OrderBook, OrderBookBase},
    types::{normalize_address, HaikoDepth, HaikoMarket, PriceLevel},
};

pub const DEX: &str = "Haiko";

#[derive(Debug, Clone)]
pub struct HaikoOrderBook {
    base: OrderBookBase,
    apply_filtering: bool,
    decimals_diff: f64,
}

impl HaikoOrderBook {
    pub fn new(
        token_a: &str,
        token_b: &str,
        apply_filtering: bool,
    ) -> Result<Self, Error> {
        let base = OrderBookBase::new(DEX, token_a, token_b)?;
        // Same-decimals pairs are scaled by the base token decimals.
        let exponent = match base.decimals_a() as i32 - base.decimals_b() as i32 {
            0 => base.decimals_a() as i32,
            diff => diff,
        };

        Ok(Self {
            base,
            apply_filtering,
            decimals_diff: 10_f64.powi(exponent),
        })
    }

    pub fn filter_markets(&self, markets: Vec<HaikoMarket>) -> Vec<HaikoMarket> {
        let token_a = normalize_address(self.base.token_a.address);
        let token_b = normalize_address(self.base.token_b.address);

        markets
            .into_iter()
            .filter(|market| {
                normalize_address(&market.base_token.address) == token_a
                    && normalize_address(&market.quote_token.address) == token_b
            })
            .collect()
    }

    fn get_token_amount(
        &self,
        liquidity: f64,
        current_sqrt: f64,
        next_sqrt: f64,
        is_ask: bool,
    ) -> Result<f64, Error> {
        if is_ask && (current_sqrt == 0.0 || next_sqrt == 0.0) {
            return Err(Error::OrderBook(String::from(
                "Square root of prices for asks can't be zero.",
            )));
        }
        if current_sqrt == 0.0 {
            return Ok(0.0);
        }
        if next_sqrt == 0.0 {
            return Ok((liquidity / current_sqrt).abs() / self.decimals_diff);
        }

        Ok((liquidity / next_sqrt - liquidity / current_sqrt).abs() / self.decimals_diff)
    }

    fn keep(&self, levels: Vec<PriceLevel>) -> Vec<PriceLevel> {
        if !self.apply_filtering {
            return levels;
        }

        let (min_price, max_price) = self.calculate_price_range();
        levels
            .into_iter()
            .filter(|(price, _)| price > &min_price && price < &max_price)
            .collect()
    }

    /// Splits one market depth around `current_price` into asks and bids.
    pub fn calculate_order_book(
        &mut self,
        depth: Vec<HaikoDepth>,
        current_price: BigDecimal,
    ) -> Result<(), Error> {
        self.base.current_price = current_price;

        let (mut asks, mut bids): (Vec<HaikoDepth>, Vec<HaikoDepth>) = depth
            .into_iter()
            .partition(|item| item.price >= self.base.current_price);

        if asks.is_empty() || bids.is_empty() {
            return Ok(());
        }

        bids.sort_by(|a, b| b.price.cmp(&a.price));
        asks.sort_by(|a, b| a.price.cmp(&b.price));

        let pool_liquidity = to_f64(&bids[0].liquidity_cumulative);
        self.add_bids(&bids)?;
        self.add_asks(&asks, pool_liquidity)?;

        Ok(())
    }

    fn add_asks(&mut self, asks: &[HaikoDepth], pool_liquidity: f64) -> Result<(), Error> {
        let Some(first) = asks.first() else {
            return Ok(());
        };

        let current_price = to_f64(&self.base.current_price);
        let mut levels = Vec::new();

        let amount = self.get_token_amount(
            pool_liquidity,
            current_price.sqrt(),
            to_f64(&first.price).sqrt(),
            true,
        )?;
        levels.extend(price_level(current_price, amount));

        for pair in asks.windows(2) {
            let price = to_f64(&pair[0].price);
            let amount = self.get_token_amount(
                to_f64(&pair[0].liquidity_cumulative),
                price.sqrt(),
                to_f64(&pair[1].price).sqrt(),
                true,
            )?;
            levels.extend(price_level(price, amount));
        }

        let levels = self.keep(levels);
        self.base.asks.extend(levels);
        Ok(())
    }

    fn add_bids(&mut self, bids: &[HaikoDepth]) -> Result<(), Error> {
        let Some(first) = bids.first() else {
            return Ok(());
        };

        let current_price = to_f64(&self.base.current_price);
        let mut levels = Vec::new();

        let first_price = to_f64(&first.price);
        let amount = self.get_token_amount(
            to_f64(&first.liquidity_cumulative),
            current_price.sqrt(),
            first_price.sqrt(),
            false,
        )?;
        levels.extend(price_level(first_price, amount));

        for pair in bids.windows(2) {
            let price = to_f64(&pair[0].price);
            let amount = self.get_token_amount(
                to_f64(&pair[1].liquidity_cumulative),
                price.sqrt(),
                to_f64(&pair[1].price).sqrt(),
                false,
            )?;
            levels.extend(price_level(price, amount));
        }

        let levels = self.keep(levels);
        self.base.bids.extend(levels);
        Ok(())
    }
}

impl OrderBook for HaikoOrderBook {
    fn base(&self) -> &OrderBookBase {
        &self.base
    }

    async fn fetch_price_and_liquidity(&mut self, state: &State) -> Result<(), Error> {
        let markets = state
            .http
            .get_haiko_markets(self.base.token_a.address, self.base.token_b.address)
            .await?;
        let markets = self.filter_markets(markets);

        self.base.block = Some(state.starknet.block_number().await?);

        if markets.is_empty() {
            warn!(
                "Markets for {} - {} aren't available for now",
                self.base.token_a.symbol, self.base.token_b.symbol
            );
            return Ok(());
        }

        for market in &markets {
            let depth = state.http.get_haiko_depth(&market.market_id).await?;
            if depth.is_empty() {
                info!("Market depth for market {} is empty.", market.market_id);
                continue;
            }
            self.calculate_order_book(depth, market.curr_price.clone())?;
        }

        if let Some(market) = markets.iter().max_by(|a, b| a.tvl.cmp(&b.tvl)) {
            self.base.current_price = market.curr_price.clone();
        }

        Ok(())
    }
}
