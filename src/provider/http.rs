use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::info;

use crate::{
    configuration::Config,
    error::Error,
    types::{
        BraavosPrice, EkuboPool, EkuboPoolLiquidity, EkuboPrice, HaikoDepth,
        HaikoMarket, LiquidityTick, MySwapPools,
    },
};

#[derive(Debug)]
pub struct HTTP {
    pub config: Config,
    client: Client,
}

impl HTTP {
    pub fn new(config: Config) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .gzip(true)
            .build()?;

        Ok(HTTP { config, client })
    }

    pub async fn get_braavos_prices(&self) -> Result<Vec<BraavosPrice>, Error> {
        let json = self
            .client
            .get(&self.config.braavos_prices_url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<BraavosPrice>>()
            .await?;
        Ok(json)
    }

    pub async fn get_myswap_pools(&self) -> Result<MySwapPools, Error> {
        let url = self.config.get_myswap_pools_url();
        let json = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<MySwapPools>()
            .await?;
        Ok(json)
    }

    pub async fn get_myswap_liquidity(
        &self,
        pool_id: &str,
    ) -> Result<Vec<LiquidityTick>, Error> {
        let url = self.config.get_myswap_liquidity_url(pool_id);
        let json = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<LiquidityTick>>()
            .await?;
        Ok(json)
    }

    pub async fn get_ekubo_pools(&self) -> Result<Vec<EkuboPool>, Error> {
        let url = self.config.get_ekubo_pools_url();
        let json = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<EkuboPool>>()
            .await?;
        Ok(json)
    }

    pub async fn get_ekubo_pool_liquidity(
        &self,
        key_hash: &str,
    ) -> Result<EkuboPoolLiquidity, Error> {
        let url = self.config.get_ekubo_liquidity_url(key_hash);
        let json = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<EkuboPoolLiquidity>()
            .await?;
        Ok(json)
    }

    pub async fn get_ekubo_price(
        &self,
        base_token: &str,
        quote_token: &str,
    ) -> Result<EkuboPrice, Error> {
        let url = self.config.get_ekubo_price_url(base_token, quote_token);
        let json = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<EkuboPrice>()
            .await?;
        Ok(json)
    }

    pub async fn get_haiko_markets(
        &self,
        token_a: &str,
        token_b: &str,
    ) -> Result<Vec<HaikoMarket>, Error> {
        let url = self.config.get_haiko_markets_url(token_a, token_b);
        let json = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<HaikoMarket>>()
            .await?;
        Ok(json)
    }

    pub async fn get_haiko_depth(
        &self,
        market_id: &str,
    ) -> Result<Vec<HaikoDepth>, Error> {
        let url = self.config.get_haiko_depth_url(market_id);
        let json = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<HaikoDepth>>()
            .await?;
        Ok(json)
    }

    pub async fn trigger_notifications(&self) -> Result<StatusCode, Error> {
        let url = &self.config.notification_trigger_url;
        info!("Triggering notifications at {}", url);
        let response = self.client.post(url).send().await?;
        Ok(response.status())
    }
}
