use sqlx::Error;

use crate::model::{Table, Telegram_Log};

use super::QueryResult;

impl Table<Telegram_Log> {
    pub async fn insert(&self, data: &Telegram_Log) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            INSERT INTO "telegram_log" (
                "sent_at",
                "notification_data_id",
                "is_succesfully",
                "message"
            )
            VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(data.sent_at)
        .bind(data.notification_data_id)
        .bind(data.is_succesfully)
        .bind(&data.message)
        .persistent(true)
        .execute(&self.pool)
        .await
    }
}
