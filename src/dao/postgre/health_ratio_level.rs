use sqlx::Error;

use crate::model::{Health_Ratio_Level, Table};

use super::QueryResult;

impl Table<Health_Ratio_Level> {
    pub async fn insert(
        &self,
        data: &Health_Ratio_Level,
    ) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            INSERT INTO "health_ratio_level" (
                "timestamp",
                "user_id",
                "value",
                "protocol_id"
            )
            VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(data.timestamp)
        .bind(&data.user_id)
        .bind(&data.value)
        .bind(&data.protocol_id)
        .persistent(true)
        .execute(&self.pool)
        .await
    }

    pub async fn get_latest(
        &self,
        protocol_id: &str,
        user_id: &str,
    ) -> Result<Option<Health_Ratio_Level>, Error> {
        sqlx::query_as(
            r#"
            SELECT
                "timestamp",
                "user_id",
                "value",
                "protocol_id"
            FROM "health_ratio_level"
            WHERE
                "protocol_id" = $1 AND
                "user_id" = $2
            ORDER BY "timestamp" DESC, "id" DESC
            LIMIT 1
            "#,
        )
        .bind(protocol_id)
        .bind(user_id)
        .persistent(true)
        .fetch_optional(&self.pool)
        .await
    }
}
