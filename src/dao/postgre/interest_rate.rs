use sqlx::Error;

use crate::model::{Interest_Rate, Table};

impl Table<Interest_Rate> {
    pub async fn get_latest(
        &self,
        protocol_id: &str,
    ) -> Result<Option<Interest_Rate>, Error> {
        sqlx::query_as(
            r#"
            SELECT
                "id",
                "protocol_id",
                "block",
                "timestamp",
                "collateral",
                "debt"
            FROM "interest_rate"
            WHERE "protocol_id" = $1
            ORDER BY "block" DESC
            LIMIT 1
            "#,
        )
        .bind(protocol_id)
        .persistent(true)
        .fetch_optional(&self.pool)
        .await
    }
}
