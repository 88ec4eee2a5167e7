use bigdecimal::{BigDecimal, Zero};

use crate::{error::Error, model::Order_Book, types::OrderBookSnapshot};

impl TryFrom<Order_Book> for OrderBookSnapshot {
    type Error = Error;

    fn try_from(value: Order_Book) -> Result<Self, Self::Error> {
        let asks = match value.asks {
            Some(asks) => serde_json::from_value(asks)?,
            None => Vec::new(),
        };
        let bids = match value.bids {
            Some(bids) => serde_json::from_value(bids)?,
            None => Vec::new(),
        };

        Ok(OrderBookSnapshot {
            token_a: value.token_a,
            token_b: value.token_b,
            timestamp: value.timestamp,
            block: value.block,
            dex: value.dex,
            current_price: value.current_price.unwrap_or_else(BigDecimal::zero),
            asks,
            bids,
        })
    }
}

/// Quantity of `token_a` that can be sold before the price drops by `ratio`.
pub fn calculate_price_change(
    book: &OrderBookSnapshot,
    ratio: &BigDecimal,
) -> Result<BigDecimal, Error> {
    if ratio <= &BigDecimal::zero() || ratio >= &BigDecimal::from(1) {
        return Err(Error::Validation(String::from(
            "Provide valid price change ratio.",
        )));
    }
    if book.current_price.is_zero() {
        return Err(Error::OrderBook(String::from(
            "Current price of the pair is zero.",
        )));
    }

    let min_price = (BigDecimal::from(1) - ratio) * &book.current_price;
    let mut quantity = BigDecimal::zero();

    for (price, amount) in book.bids.iter().rev() {
        if price < &min_price {
            break;
        }
        quantity += amount;
    }

    Ok(quantity)
}
