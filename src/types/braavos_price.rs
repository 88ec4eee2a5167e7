use bigdecimal::BigDecimal;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct BraavosPrice {
    pub address: String,
    #[serde(alias = "priceInUsd", alias = "price_usd")]
    pub price: BigDecimal,
}
