//! Vesu lending positions and their health factors.

use std::collections::HashMap;

use bigdecimal::{BigDecimal, ToPrimitive, Zero};
use tracing::warn;

use crate::{
    configuration::State,
    error::Error,
    helpers::{cached_fetch, hex_to_decimal, pow10, u256_to_decimal},
    loan_entity::{HealthFactor, LoanEntity},
    model::Vesu_Position,
    provider::selectors,
    types::{find_by_address, Prices, TokenValues},
};

pub const VESU_ADDRESS: &str =
    "0x02545b2e5d519fc230e9cd781046d3a64e092114f07e44771e0d719d148725ef";

/// Block of the first `ModifyPosition` event.
pub const VESU_FIRST_BLOCK: i64 = 654_244;

pub const PROTOCOL_ID: &str = "Vesu";

const ZERO_FELT: &str = "0x0";

fn felt_at(values: &[String], index: usize, name: &str) -> Result<String, Error> {
    values
        .get(index)
        .cloned()
        .ok_or_else(|| Error::Rpc(format!("{} result has no field {}", name, index)))
}

fn is_zero_felt(value: &str) -> bool {
    hex_to_decimal(value).map(|v| v.is_zero()).unwrap_or(false)
}

/// Raw values of one position as read from the singleton.
#[derive(Debug, Clone)]
pub struct PositionAmounts {
    pub collateral: BigDecimal,
    pub debt: BigDecimal,
    pub max_ltv: BigDecimal,
    pub collateral_decimals: u32,
    pub debt_decimals: u32,
}

fn has_empty_side(collateral_asset: &str, debt_asset: &str) -> bool {
    is_zero_felt(collateral_asset) || is_zero_felt(debt_asset)
}

/// Usable oracle price, then the price feed by symbol, then one.
fn resolve_price(
    onchain: Option<BigDecimal>,
    asset: &str,
    fallback_prices: &Prices,
) -> BigDecimal {
    if let Some(price) = onchain.filter(|price| !price.is_zero()) {
        return price;
    }

    find_by_address(asset)
        .filter(|token| fallback_prices.contains(token.symbol))
        .map(|token| fallback_prices.get(token.symbol))
        .unwrap_or_else(|| BigDecimal::from(1))
}

/// Health factor of a single collateral/debt pair.
///
/// `max_ltv` is scaled by the collateral decimals.
pub fn position_health_factor(
    user: &str,
    collateral_asset: &str,
    debt_asset: &str,
    amounts: PositionAmounts,
    prices: &Prices,
) -> Result<HealthFactor, Error> {
    let ltv = amounts.max_ltv / pow10(amounts.collateral_decimals);

    let mut entity = LoanEntity::new(user);
    entity.decimals = HashMap::from([
        (collateral_asset.to_owned(), amounts.collateral_decimals),
        (debt_asset.to_owned(), amounts.debt_decimals),
    ]);
    entity.collateral.set_value(collateral_asset, amounts.collateral);
    entity.debt.set_value(debt_asset, amounts.debt);

    let mut collateral_factors = TokenValues::new();
    collateral_factors.insert(collateral_asset, ltv);
    let debt_factors = TokenValues::with_default(BigDecimal::from(1));
    let models = TokenValues::with_default(BigDecimal::from(1));

    entity.compute_health_factor(&collateral_factors, &debt_factors, &models, prices)
}

/// Health factor computation against the Vesu singleton.
pub struct VesuLoanEntity<'a> {
    state: &'a State,
    fallback_prices: &'a Prices,
}

impl<'a> VesuLoanEntity<'a> {
    pub fn new(state: &'a State, fallback_prices: &'a Prices) -> Self {
        Self {
            state,
            fallback_prices,
        }
    }

    async fn call(
        &self,
        address: &str,
        selector: &str,
        calldata: &[String],
    ) -> Result<Vec<String>, Error> {
        self.state.starknet.call(address, selector, calldata).await
    }

    /// Calls whose result does not change between blocks go through the cache.
    async fn call_cached(
        &self,
        address: &str,
        selector: &str,
        calldata: &[String],
    ) -> Result<Vec<String>, Error> {
        let key = format!("{}:{}:{}", address, selector, calldata.join(","));
        cached_fetch(&self.state.call_cache, &key, || {
            self.call(address, selector, calldata)
        })
        .await
    }

    async fn get_decimals(&self, token: &str) -> Result<u32, Error> {
        let result = self.call_cached(token, selectors::DECIMALS, &[]).await?;
        let value = felt_at(&result, 0, "decimals")?;
        hex_to_decimal(&value)?
            .to_u32()
            .ok_or_else(|| Error::Rpc(format!("Invalid decimals of {}", token)))
    }

    async fn get_onchain_price(
        &self,
        pool_id: &str,
        asset: &str,
    ) -> Result<Option<BigDecimal>, Error> {
        let extension = self
            .call_cached(VESU_ADDRESS, selectors::EXTENSION, &[pool_id.to_owned()])
            .await?;
        let extension = felt_at(&extension, 0, "extension")?;

        let result = self
            .call(
                &extension,
                selectors::PRICE,
                &[pool_id.to_owned(), asset.to_owned()],
            )
            .await?;

        let low = felt_at(&result, 0, "price")?;
        let high = result.get(1).cloned().unwrap_or_else(|| ZERO_FELT.to_owned());
        let is_valid = result.get(2).map(|v| !is_zero_felt(v)).unwrap_or(true);

        if !is_valid {
            return Ok(None);
        }

        Ok(Some(u256_to_decimal(&low, &high)? / pow10(18)))
    }

    async fn fetch_token_price(&self, pool_id: &str, asset: &str) -> BigDecimal {
        let onchain = match self.get_onchain_price(pool_id, asset).await {
            Ok(Some(price)) if !price.is_zero() => Some(price),
            Ok(_) => {
                warn!("Price for {} is not valid", asset);
                None
            },
            Err(e) => {
                warn!("Error fetching price for {}: {}", asset, e);
                None
            },
        };

        resolve_price(onchain, asset, self.fallback_prices)
    }

    pub async fn compute_health_factor(
        &self,
        position: &Vesu_Position,
    ) -> Result<HealthFactor, Error> {
        let pool_id = &position.pool_id;
        let collateral_asset = &position.collateral_asset;
        let debt_asset = &position.debt_asset;

        if has_empty_side(collateral_asset, debt_asset) {
            return Ok(HealthFactor::Infinite);
        }

        let data = self
            .call(
                VESU_ADDRESS,
                selectors::POSITION,
                &[
                    pool_id.to_owned(),
                    collateral_asset.to_owned(),
                    debt_asset.to_owned(),
                    position.user.to_owned(),
                ],
            )
            .await?;

        let collateral = self
            .call(
                VESU_ADDRESS,
                selectors::CALCULATE_COLLATERAL,
                &[
                    pool_id.to_owned(),
                    collateral_asset.to_owned(),
                    felt_at(&data, 0, "position")?,
                    felt_at(&data, 1, "position")?,
                    ZERO_FELT.to_owned(),
                ],
            )
            .await?;
        let collateral = u256_to_decimal(
            &felt_at(&collateral, 0, "calculate_collateral")?,
            &felt_at(&collateral, 1, "calculate_collateral")?,
        )?;

        let asset_config = self
            .call(
                VESU_ADDRESS,
                selectors::ASSET_CONFIG,
                &[pool_id.to_owned(), debt_asset.to_owned()],
            )
            .await?;

        let debt = self
            .call(
                VESU_ADDRESS,
                selectors::CALCULATE_DEBT,
                &[
                    felt_at(&data, 2, "position")?,
                    felt_at(&data, 3, "position")?,
                    ZERO_FELT.to_owned(),
                    felt_at(&asset_config, 14, "asset_config")?,
                    felt_at(&asset_config, 15, "asset_config")?,
                    felt_at(&asset_config, 10, "asset_config")?,
                    felt_at(&asset_config, 11, "asset_config")?,
                ],
            )
            .await?;
        let debt = u256_to_decimal(
            &felt_at(&debt, 0, "calculate_debt")?,
            &felt_at(&debt, 1, "calculate_debt")?,
        )?;

        let ltv_config = self
            .call_cached(
                VESU_ADDRESS,
                selectors::LTV_CONFIG,
                &[
                    pool_id.to_owned(),
                    collateral_asset.to_owned(),
                    debt_asset.to_owned(),
                ],
            )
            .await?;

        let amounts = PositionAmounts {
            collateral,
            debt,
            max_ltv: hex_to_decimal(&felt_at(&ltv_config, 0, "ltv_config")?)?,
            collateral_decimals: self.get_decimals(collateral_asset).await?,
            debt_decimals: self.get_decimals(debt_asset).await?,
        };

        let mut prices = Prices::new();
        prices.insert(
            collateral_asset,
            self.fetch_token_price(pool_id, collateral_asset).await,
        );
        prices.insert(debt_asset, self.fetch_token_price(pool_id, debt_asset).await);

        position_health_factor(
            &position.user,
            collateral_asset,
            debt_asset,
            amounts,
            &prices,
        )
    }
}
