use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// `(price, quantity)`
pub type PriceLevel = (BigDecimal, BigDecimal);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    pub token_a: String,
    pub token_b: String,
    pub timestamp: i64,
    pub block: Option<i64>,
    pub dex: String,
    pub current_price: BigDecimal,
    pub asks: Vec<PriceLevel>,
    pub bids: Vec<PriceLevel>,
}
