use sqlx::{Error, Transaction};

use crate::model::{Table, Vesu_Position};

use super::{DataBase, QueryResult};

impl Table<Vesu_Position> {
    pub async fn upsert(
        &self,
        data: &Vesu_Position,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            INSERT INTO "vesu_positions" (
                "user",
                "pool_id",
                "collateral_asset",
                "debt_asset",
                "block_number"
            )
            VALUES($1, $2, $3, $4, $5)
            ON CONFLICT ("user", "pool_id", "collateral_asset", "debt_asset")
            DO UPDATE SET "block_number" = GREATEST("vesu_positions"."block_number", EXCLUDED."block_number")
            "#,
        )
        .bind(&data.user)
        .bind(&data.pool_id)
        .bind(&data.collateral_asset)
        .bind(&data.debt_asset)
        .bind(data.block_number)
        .persistent(true)
        .execute(&mut **transaction)
        .await
    }

    pub async fn get_last_block(&self) -> Result<Option<i64>, Error> {
        let (value,): (Option<i64>,) = sqlx::query_as(
            r#"
            SELECT MAX("block_number") FROM "vesu_positions"
            "#,
        )
        .persistent(true)
        .fetch_one(&self.pool)
        .await?;

        Ok(value)
    }

    /// One row per (user, pool), the one seen at the highest block.
    pub async fn get_latest_positions(
        &self,
    ) -> Result<Vec<Vesu_Position>, Error> {
        sqlx::query_as(
            r#"
            SELECT DISTINCT ON ("user", "pool_id")
                "user",
                "pool_id",
                "collateral_asset",
                "debt_asset",
                "block_number"
            FROM "vesu_positions"
            ORDER BY "user", "pool_id", "block_number" DESC
            "#,
        )
        .persistent(true)
        .fetch_all(&self.pool)
        .await
    }
}
