//! Collateral and debt valuation for a single borrower.

use std::{collections::HashMap, fmt};

use bigdecimal::{BigDecimal, Zero};

use crate::{
    error::Error,
    helpers::pow10,
    types::{find_token, Portfolio, Prices, TokenValues},
};

pub use self::collector::{Collector, PriceCollector, VesuPositionCollector};

mod collector;

#[derive(Debug, Clone, PartialEq)]
pub enum HealthFactor {
    Finite(BigDecimal),
    Infinite,
}

impl HealthFactor {
    pub fn value(&self) -> Option<&BigDecimal> {
        match self {
            HealthFactor::Finite(value) => Some(value),
            HealthFactor::Infinite => None,
        }
    }
}

impl fmt::Display for HealthFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthFactor::Finite(value) => write!(f, "{}", value),
            HealthFactor::Infinite => write!(f, "inf"),
        }
    }
}

pub fn is_valid_health_ratio(value: &HealthFactor) -> bool {
    match value {
        HealthFactor::Finite(value) => value > &BigDecimal::zero(),
        HealthFactor::Infinite => false,
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoanEntity {
    pub user: String,
    pub collateral: Portfolio,
    pub debt: Portfolio,
    /// Decimals for tokens missing from the static token table.
    pub decimals: HashMap<String, u32>,
}

impl LoanEntity {
    pub fn new(user: &str) -> Self {
        Self {
            user: user.to_owned(),
            ..Self::default()
        }
    }

    fn decimal_factor(&self, token: &str) -> Result<BigDecimal, Error> {
        let decimals = match self.decimals.get(token) {
            Some(decimals) => *decimals,
            None => find_token(token)
                .map(|item| item.decimals)
                .ok_or_else(|| Error::UnknownToken(token.to_owned()))?,
        };
        Ok(pow10(decimals))
    }

    pub fn compute_collateral_usd(
        &self,
        risk_adjusted: bool,
        collateral_factors: &TokenValues,
        interest_rate_models: &TokenValues,
        prices: &Prices,
    ) -> Result<BigDecimal, Error> {
        let mut total = BigDecimal::zero();

        for (token, amount) in self.collateral.iter() {
            let mut value = amount / self.decimal_factor(token)?;
            if risk_adjusted {
                value *= collateral_factors.get(token);
            }
            total += value * interest_rate_models.get(token) * prices.get(token);
        }

        Ok(total)
    }

    pub fn compute_debt_usd(
        &self,
        risk_adjusted: bool,
        debt_factors: &TokenValues,
        interest_rate_models: &TokenValues,
        prices: &Prices,
    ) -> Result<BigDecimal, Error> {
        let mut total = BigDecimal::zero();

        for (token, amount) in self.debt.iter() {
            let mut value = amount / self.decimal_factor(token)?;
            if risk_adjusted {
                let factor = debt_factors.get(token);
                if factor.is_zero() {
                    return Err(Error::Validation(format!(
                        "Debt factor of {} is zero",
                        token
                    )));
                }
                value = value / factor;
            }
            total += value * interest_rate_models.get(token) * prices.get(token);
        }

        Ok(total)
    }

    pub fn compute_health_factor(
        &self,
        collateral_factors: &TokenValues,
        debt_factors: &TokenValues,
        interest_rate_models: &TokenValues,
        prices: &Prices,
    ) -> Result<HealthFactor, Error> {
        let collateral = self.compute_collateral_usd(
            true,
            collateral_factors,
            interest_rate_models,
            prices,
        )?;
        let debt =
            self.compute_debt_usd(true, debt_factors, interest_rate_models, prices)?;

        if debt.is_zero() {
            return Ok(HealthFactor::Infinite);
        }

        Ok(HealthFactor::Finite(collateral / debt))
    }

    /// Debt (in token units) a liquidator needs to repay to restore health.
    ///
    /// Zero when the position is already healthy.
    pub fn compute_debt_to_be_liquidated(
        &self,
        debt_token: &str,
        prices: &Prices,
        collateral_factor: &BigDecimal,
        liquidation_bonus: &BigDecimal,
        debt_usd: &BigDecimal,
        risk_adjusted_collateral_usd: &BigDecimal,
    ) -> Result<BigDecimal, Error> {
        let debt_amount = self.debt.get(debt_token) / self.decimal_factor(debt_token)?;
        let one = BigDecimal::from(1);
        let denominator = prices.get(debt_token)
            * (&one - collateral_factor * (&one + liquidation_bonus));

        if denominator.is_zero() {
            return Ok(debt_amount);
        }

        let max_debt = (debt_usd - risk_adjusted_collateral_usd) / denominator;
        Ok(max_debt.min(debt_amount).max(BigDecimal::zero()))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::types::interest_rate_models;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn entity() -> LoanEntity {
        let mut entity = LoanEntity::new("0x1");
        entity.collateral.set_value("ETH", dec("2e18"));
        entity.debt.set_value("USDC", dec("3000e6"));
        entity
    }

    fn prices() -> Prices {
        let mut prices = Prices::new();
        prices.insert("ETH", dec("2000"));
        prices.insert("USDC", dec("1"));
        prices
    }

    #[test]
    fn test_collateral_and_debt_usd() {
        let entity = entity();
        let mut factors = TokenValues::new();
        factors.insert("ETH", dec("0.8"));
        let models = interest_rate_models();

        let raw = entity
            .compute_collateral_usd(false, &factors, &models, &prices())
            .unwrap();
        assert_eq!(raw, dec("4000"));

        let adjusted = entity
            .compute_collateral_usd(true, &factors, &models, &prices())
            .unwrap();
        assert_eq!(adjusted, dec("3200"));

        let debt_factors = TokenValues::with_default(BigDecimal::from(1));
        let debt = entity
            .compute_debt_usd(true, &debt_factors, &models, &prices())
            .unwrap();
        assert_eq!(debt, dec("3000"));
    }

    #[test]
    fn test_health_factor() {
        let entity = entity();
        let mut factors = TokenValues::new();
        factors.insert("ETH", dec("0.75"));
        let debt_factors = TokenValues::with_default(BigDecimal::from(1));

        let hf = entity
            .compute_health_factor(&factors, &debt_factors, &interest_rate_models(), &prices())
            .unwrap();
        assert_eq!(hf, HealthFactor::Finite(dec("1")));
        assert!(is_valid_health_ratio(&hf));

        let mut no_debt = LoanEntity::new("0x2");
        no_debt.collateral.set_value("ETH", dec("1e18"));
        let hf = no_debt
            .compute_health_factor(&factors, &debt_factors, &interest_rate_models(), &prices())
            .unwrap();
        assert_eq!(hf, HealthFactor::Infinite);
        assert_eq!(hf.to_string(), "inf");
        assert!(!is_valid_health_ratio(&hf));
    }

    #[test]
    fn test_unknown_token_needs_decimals() {
        let mut entity = LoanEntity::new("0x3");
        entity.collateral.set_value("0xabc", dec("5e20"));
        let factors = TokenValues::new();
        let models = interest_rate_models();
        assert!(entity
            .compute_collateral_usd(false, &factors, &models, &prices())
            .is_err());

        entity.decimals.insert(String::from("0xabc"), 20);
        let mut prices = prices();
        prices.insert("0xabc", dec("3"));
        let value = entity
            .compute_collateral_usd(false, &factors, &models, &prices)
            .unwrap();
        assert_eq!(value, dec("15"));
    }

    #[test]
    fn test_debt_to_be_liquidated() {
        let entity = entity();
        let value = entity
            .compute_debt_to_be_liquidated(
                "USDC",
                &prices(),
                &dec("0.5"),
                &dec("0.1"),
                &dec("3000"),
                &dec("2800"),
            )
            .unwrap();
        assert!(value > dec("444.44") && value < dec("444.45"));

        let value = entity
            .compute_debt_to_be_liquidated(
                "USDC",
                &prices(),
                &dec("0.5"),
                &dec("0.1"),
                &dec("10000"),
                &dec("0"),
            )
            .unwrap();
        assert_eq!(value, dec("3000"));

        let value = entity
            .compute_debt_to_be_liquidated(
                "USDC",
                &prices(),
                &dec("0.5"),
                &dec("0.1"),
                &dec("2800"),
                &dec("3000"),
            )
            .unwrap();
        assert_eq!(value, BigDecimal::zero());
    }
}
