use actix_web::{get, web, Responder};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    configuration::{AppState, State},
    error::Error,
    order_book::{calculate_price_change, DEXES},
    types::{find_token, OrderBookSnapshot},
};

#[derive(Debug, Deserialize)]
pub struct OrderBookQuery {
    base_token: String,
    quote_token: String,
    dex: String,
    price_change_ratio: Option<BigDecimal>,
}

#[derive(Debug, Serialize)]
pub struct OrderBookResponse {
    #[serde(flatten)]
    pub book: OrderBookSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_change_quantity: Option<BigDecimal>,
}

fn token_symbol(value: &str) -> Result<&'static str, Error> {
    find_token(value)
        .map(|token| token.symbol)
        .ok_or_else(|| Error::UnknownToken(value.to_owned()))
}

fn check_dex(value: &str) -> Result<(), Error> {
    if DEXES.contains(&value) {
        return Ok(());
    }

    Err(Error::UnknownDex {
        name: value.to_owned(),
        supported: DEXES.join(", "),
    })
}

#[get("/orderbook")]
pub async fn index(
    state: web::Data<AppState<State>>,
    query: web::Query<OrderBookQuery>,
) -> Result<impl Responder, Error> {
    let base_token = token_symbol(&query.base_token)?;
    let quote_token = token_symbol(&query.quote_token)?;
    check_dex(&query.dex)?;

    info!(
        "Fetching order book for {}/{} on {}",
        base_token, quote_token, query.dex
    );

    let row = state
        .database
        .order_book
        .get_latest(base_token, quote_token, &query.dex)
        .await?
        .ok_or_else(|| Error::NotFound(String::from("Records not found")))?;

    let book = OrderBookSnapshot::try_from(row)?;
    let price_change_quantity = match &query.price_change_ratio {
        Some(ratio) => Some(calculate_price_change(&book, ratio)?),
        None => None,
    };

    Ok(web::Json(OrderBookResponse {
        book,
        price_change_quantity,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_symbol_accepts_symbol_and_address() {
        assert_eq!(token_symbol("ETH").unwrap(), "ETH");
        assert_eq!(
            token_symbol(
                "0x049d36570d4e46f48e99674bd3fcc84644ddd6b96f7c741b1562b82f9e004dc7"
            )
            .unwrap(),
            "ETH"
        );
        assert!(matches!(token_symbol("PEPE"), Err(Error::UnknownToken(_))));
    }

    #[test]
    fn test_check_dex() {
        assert!(check_dex("MySwap").is_ok());
        assert!(check_dex("Starknet").is_ok());
        assert!(check_dex("Haiko").is_ok());
        let error = check_dex("Jediswap").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Dex Jediswap is not supported, expected one of: Starknet, MySwap, Ekubo, Haiko"
        );
    }
}
