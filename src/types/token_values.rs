use std::{collections::HashMap, str::FromStr};

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

use super::token::find_token;

/// Token map whose missing entries read as a fixed default.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TokenValues {
    pub values: HashMap<String, BigDecimal>,
    #[serde(skip)]
    default: Option<BigDecimal>,
}

impl TokenValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(default: BigDecimal) -> Self {
        Self {
            values: HashMap::new(),
            default: Some(default),
        }
    }

    pub fn get(&self, token: &str) -> BigDecimal {
        match self.values.get(token) {
            Some(value) => value.clone(),
            None => self.default.clone().unwrap_or_else(BigDecimal::zero),
        }
    }

    pub fn insert(&mut self, token: &str, value: BigDecimal) {
        self.values.insert(token.to_owned(), value);
    }

    pub fn contains(&self, token: &str) -> bool {
        self.values.contains_key(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BigDecimal)> {
        self.values.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<HashMap<String, BigDecimal>> for TokenValues {
    fn from(values: HashMap<String, BigDecimal>) -> Self {
        Self {
            values,
            default: None,
        }
    }
}

/// USD price per token.
pub type Prices = TokenValues;

/// Interest rate index per token, defaults to one.
pub fn interest_rate_models() -> TokenValues {
    TokenValues::with_default(BigDecimal::from(1))
}

fn max_rounding_error(token: &str) -> BigDecimal {
    let symbol = find_token(token).map(|item| item.symbol).unwrap_or(token);
    let value = match symbol {
        "wBTC" => "1e2",
        "USDC" | "USDT" => "1e4",
        "DAI" => "1e16",
        _ => "5e12",
    };
    BigDecimal::from_str(value).unwrap_or_else(|_| BigDecimal::zero())
}

/// Token holdings, small residues are rounded to zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Portfolio(pub TokenValues);

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, token: &str) -> BigDecimal {
        self.0.get(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BigDecimal)> {
        self.0.iter()
    }

    pub fn increase_value(&mut self, token: &str, value: BigDecimal) {
        let current = self.0.get(token);
        self.0.insert(token, current + value);
        self.round_small_value_to_zero(token);
    }

    pub fn set_value(&mut self, token: &str, value: BigDecimal) {
        self.0.insert(token, value);
        self.round_small_value_to_zero(token);
    }

    pub fn add(&self, other: &Portfolio) -> Portfolio {
        let mut portfolio = Portfolio::new();
        for (token, amount) in self.iter().chain(other.iter()) {
            let current = portfolio.get(token);
            portfolio.0.insert(token, current + amount);
        }
        portfolio
    }

    fn round_small_value_to_zero(&mut self, token: &str) {
        if self.0.get(token).abs() < max_rounding_error(token) {
            self.0.insert(token, BigDecimal::zero());
        }
    }
}

impl From<HashMap<String, BigDecimal>> for Portfolio {
    fn from(values: HashMap<String, BigDecimal>) -> Self {
        Portfolio(TokenValues::from(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    #[test]
    fn test_missing_token_defaults() {
        let values = TokenValues::new();
        assert_eq!(values.get("ETH"), BigDecimal::zero());

        let models = interest_rate_models();
        assert_eq!(models.get("ETH"), BigDecimal::from(1));
    }

    #[test]
    fn test_increase_value_rounds_small_residue() {
        let mut portfolio = Portfolio::new();
        portfolio.increase_value("ETH", dec("1e18"));
        portfolio.increase_value("ETH", dec("-999999999999999999"));
        assert_eq!(portfolio.get("ETH"), BigDecimal::zero());

        portfolio.set_value("USDC", dec("20000"));
        assert_eq!(portfolio.get("USDC"), dec("20000"));
        portfolio.set_value("USDC", dec("9999"));
        assert_eq!(portfolio.get("USDC"), BigDecimal::zero());
    }

    #[test]
    fn test_add_portfolios() {
        let mut first = Portfolio::new();
        first.set_value("ETH", dec("1e18"));
        let mut second = Portfolio::new();
        second.set_value("ETH", dec("2e18"));
        second.set_value("wBTC", dec("500"));

        let sum = first.add(&second);
        assert_eq!(sum.get("ETH"), dec("3e18"));
        assert_eq!(sum.get("wBTC"), dec("500"));
        assert_eq!(sum.get("STRK"), BigDecimal::zero());
    }
}
