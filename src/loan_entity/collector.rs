use std::future::Future;

use tracing::debug;

use crate::{
    configuration::State,
    error::Error,
    model::Vesu_Position,
    provider::selectors,
    types::{clean_address, find_by_address, EmittedEvent, Prices},
    vesu::VESU_ADDRESS,
};

/// Source of data consumed by the risk computations.
pub trait Collector {
    type Output;

    fn collect(
        &self,
        state: &State,
    ) -> impl Future<Output = Result<Self::Output, Error>> + Send;
}

/// USD prices from the Braavos price feed, keyed by token symbol.
#[derive(Debug, Default)]
pub struct PriceCollector;

impl Collector for PriceCollector {
    type Output = Prices;

    async fn collect(&self, state: &State) -> Result<Prices, Error> {
        let items = state.http.get_braavos_prices().await?;
        let mut prices = Prices::new();

        for item in items {
            match find_by_address(&item.address) {
                Some(token) => prices.insert(token.symbol, item.price),
                None => debug!("Skipping price of unknown token {}", item.address),
            }
        }

        Ok(prices)
    }
}

/// `ModifyPosition` events of the Vesu singleton in a block range.
#[derive(Debug)]
pub struct VesuPositionCollector {
    pub from_block: i64,
    pub to_block: i64,
}

impl VesuPositionCollector {
    pub fn parse_event(event: &EmittedEvent) -> Option<Vesu_Position> {
        let [_, pool_id, collateral_asset, debt_asset, user, ..] = event.keys.as_slice()
        else {
            return None;
        };

        Some(Vesu_Position {
            user: clean_address(user),
            pool_id: pool_id.to_owned(),
            collateral_asset: collateral_asset.to_owned(),
            debt_asset: debt_asset.to_owned(),
            block_number: event.block_number?,
        })
    }
}

impl Collector for VesuPositionCollector {
    type Output = Vec<Vesu_Position>;

    async fn collect(&self, state: &State) -> Result<Vec<Vesu_Position>, Error> {
        let events = state
            .starknet
            .get_all_events(
                VESU_ADDRESS,
                selectors::MODIFY_POSITION_EVENT,
                self.from_block,
                self.to_block,
            )
            .await?;

        Ok(events.iter().filter_map(Self::parse_event).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(keys: &[&str], block_number: Option<i64>) -> EmittedEvent {
        EmittedEvent {
            from_address: String::from(VESU_ADDRESS),
            keys: keys.iter().map(|key| key.to_string()).collect(),
            data: Vec::new(),
            block_number,
            transaction_hash: None,
        }
    }

    #[test]
    fn test_parse_modify_position_event() {
        let position = VesuPositionCollector::parse_event(&event(
            &[selectors::MODIFY_POSITION_EVENT, "0xp", "0xc", "0xd", "0x00ab"],
            Some(700_000),
        ))
        .unwrap();

        assert_eq!(position.pool_id, "0xp");
        assert_eq!(position.collateral_asset, "0xc");
        assert_eq!(position.debt_asset, "0xd");
        assert_eq!(position.user, "0xab");
        assert_eq!(position.block_number, 700_000);
    }

    #[test]
    fn test_skip_incomplete_events() {
        let short = event(&[selectors::MODIFY_POSITION_EVENT, "0xp"], Some(1));
        assert!(VesuPositionCollector::parse_event(&short).is_none());

        let pending = event(
            &[selectors::MODIFY_POSITION_EVENT, "0xp", "0xc", "0xd", "0xab"],
            None,
        );
        assert!(VesuPositionCollector::parse_event(&pending).is_none());
    }
}
