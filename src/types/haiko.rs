use bigdecimal::BigDecimal;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HaikoMarket {
    pub market_id: String,
    pub base_token: HaikoToken,
    pub quote_token: HaikoToken,
    pub curr_price: BigDecimal,
    pub tvl: BigDecimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HaikoToken {
    pub address: String,
    #[serde(default)]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HaikoDepth {
    pub price: BigDecimal,
    pub liquidity_cumulative: BigDecimal,
}
