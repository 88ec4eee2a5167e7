use sqlx::{types::Json, Error};

use crate::{
    model::{Order_Book, Table},
    types::OrderBookSnapshot,
};

use super::QueryResult;

impl Table<Order_Book> {
    pub async fn insert(
        &self,
        data: &OrderBookSnapshot,
    ) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            INSERT INTO "orderbook" (
                "token_a",
                "token_b",
                "timestamp",
                "block",
                "dex",
                "current_price",
                "asks",
                "bids"
            )
            VALUES($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&data.token_a)
        .bind(&data.token_b)
        .bind(data.timestamp)
        .bind(data.block)
        .bind(&data.dex)
        .bind(&data.current_price)
        .bind(Json(&data.asks))
        .bind(Json(&data.bids))
        .persistent(true)
        .execute(&self.pool)
        .await
    }

    pub async fn get_latest(
        &self,
        token_a: &str,
        token_b: &str,
        dex: &str,
    ) -> Result<Option<Order_Book>, Error> {
        sqlx::query_as(
            r#"
            SELECT
                "token_a",
                "token_b",
                "timestamp",
                "block",
                "dex",
                "current_price",
                "asks",
                "bids"
            FROM "orderbook"
            WHERE
                "token_a" = $1 AND
                "token_b" = $2 AND
                "dex" = $3
            ORDER BY "timestamp" DESC
            LIMIT 1
            "#,
        )
        .bind(token_a)
        .bind(token_b)
        .bind(dex)
        .persistent(true)
        .fetch_optional(&self.pool)
        .await
    }
}
