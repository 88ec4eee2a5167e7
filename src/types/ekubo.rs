use bigdecimal::BigDecimal;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct EkuboPool {
    pub key_hash: String,
    pub token0: String,
    pub token1: String,
    pub tick_spacing: i64,
    pub tick: i64,
    pub liquidity: BigDecimal,
    #[serde(rename = "lastUpdate")]
    pub last_update: Option<EkuboLastUpdate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EkuboLastUpdate {
    pub event_id: String,
}

#[derive(Debug, Deserialize)]
pub struct EkuboPoolLiquidity {
    pub data: Vec<EkuboTickLiquidity>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EkuboTickLiquidity {
    pub tick: i64,
    pub net_liquidity_delta_diff: BigDecimal,
}

#[derive(Debug, Deserialize)]
pub struct EkuboPrice {
    pub price: BigDecimal,
}
