use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct MySwapPools {
    pub pools: Vec<MySwapPool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MySwapPool {
    pub poolkey: String,
    pub token0: MySwapToken,
    pub token1: MySwapToken,
    #[serde(default)]
    pub pool_fee: Option<f64>,
    #[serde(default)]
    pub tvl: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MySwapToken {
    pub symbol: String,
    pub address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LiquidityTick {
    pub tick: i64,
    pub liq: f64,
}
