use futures::future::join_all;
use tokio::{time, time::Duration};
use tracing::{error, info};

use crate::{
    configuration::{AppState, State},
    error::Error,
    order_book::{
        find_pool, EkuboOrderBook, HaikoOrderBook, MySwapOrderBook, OrderBook,
        UniswapV2OrderBook,
    },
    types::find_token,
};

fn has_constant_product_pool(token_a: &str, token_b: &str) -> bool {
    match (find_token(token_a), find_token(token_b)) {
        (Some(a), Some(b)) => find_pool(a.symbol, b.symbol).is_some(),
        _ => false,
    }
}

async fn store<B: OrderBook + Send>(mut book: B, state: &State) {
    let (dex, token_a, token_b) = {
        let base = book.base();
        (base.dex, base.token_a.symbol, base.token_b.symbol)
    };

    let result = async {
        book.fetch_price_and_liquidity(state).await?;
        let snapshot = book.get_order_book();
        state.database.order_book.insert(&snapshot).await?;
        Ok::<_, Error>(snapshot)
    }
    .await;

    match result {
        Ok(snapshot) => info!(
            "Stored {} order book {}/{} with {} asks and {} bids",
            dex,
            token_a,
            token_b,
            snapshot.asks.len(),
            snapshot.bids.len()
        ),
        Err(e) => error!("{} order book {}/{}: {}", dex, token_a, token_b, e),
    }
}

/// Builds and stores one book per configured pair and venue.
pub async fn fetch_insert(app_state: AppState<State>) -> Result<(), Error> {
    let mut starknet = vec![];
    let mut myswap = vec![];
    let mut ekubo = vec![];
    let mut haiko = vec![];

    for (token_a, token_b) in &app_state.config.order_book_pairs {
        if has_constant_product_pool(token_a, token_b) {
            let book = UniswapV2OrderBook::new(token_a, token_b)?;
            starknet.push(store(book, &app_state));
        }

        let book = MySwapOrderBook::new(token_a, token_b, true)?;
        myswap.push(store(book, &app_state));

        let book = EkuboOrderBook::new(token_a, token_b)?;
        ekubo.push(store(book, &app_state));

        let book = HaikoOrderBook::new(token_a, token_b, false)?;
        haiko.push(store(book, &app_state));
    }

    futures::join!(
        join_all(starknet),
        join_all(myswap),
        join_all(ekubo),
        join_all(haiko)
    );

    Ok(())
}

pub async fn order_books_task(app_state: AppState<State>) -> Result<(), Error> {
    if !app_state.config.enable_sync {
        return Ok(());
    }

    let interval = app_state.config.order_book_interval;
    let mut interval = time::interval(Duration::from_secs(interval));

    tokio::spawn(async move {
        loop {
            interval.tick().await;
            if let Err(error) = fetch_insert(app_state.clone()).await {
                error!("Order book task error {}", error);
            };
        }
    })
    .await?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_constant_product_pool() {
        assert!(has_constant_product_pool("ETH", "USDC"));
        assert!(has_constant_product_pool(
            "0x053c91253bc9682c04929ca02ed00b3e423f6710d2ee7e0d5ebb06f3ecf368a8",
            "ETH"
        ));
        assert!(!has_constant_product_pool("ETH", "STRK"));
        assert!(!has_constant_product_pool("ETH", "PEPE"));
    }
}
