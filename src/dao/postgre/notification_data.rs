use chrono::Utc;
use sqlx::Error;
use uuid::Uuid;

use crate::{
    model::{Notification_Data, Table},
    types::ValidSubscription,
};

use super::QueryResult;

impl Table<Notification_Data> {
    pub async fn insert(
        &self,
        data: &ValidSubscription,
    ) -> Result<Uuid, Error> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO "notification" (
                "id",
                "created_at",
                "email",
                "wallet_id",
                "telegram_id",
                "ip_address",
                "health_ratio_level",
                "protocol_id"
            )
            VALUES($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .bind(&data.email)
        .bind(&data.wallet_id)
        .bind(data.telegram_id.as_deref().unwrap_or_default())
        .bind(&data.ip_address)
        .bind(data.health_ratio_level)
        .bind(data.protocol_id.as_str())
        .persistent(true)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// Names of the unique fields already held by another subscription.
    pub async fn taken_fields(
        &self,
        wallet_id: &str,
        ip_address: &str,
    ) -> Result<Vec<&'static str>, Error> {
        let (wallet_taken, ip_taken): (bool, bool) = sqlx::query_as(
            r#"
            SELECT
                EXISTS(SELECT 1 FROM "notification" WHERE "wallet_id" = $1),
                EXISTS(SELECT 1 FROM "notification" WHERE "ip_address" = $2)
            "#,
        )
        .bind(wallet_id)
        .bind(ip_address)
        .persistent(true)
        .fetch_one(&self.pool)
        .await?;

        let mut fields = vec![];

        if wallet_taken {
            fields.push("wallet id");
        }

        if ip_taken {
            fields.push("ip address");
        }

        Ok(fields)
    }

    pub async fn get_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<Notification_Data>, Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM "notification" WHERE "id" = $1
            "#,
        )
        .bind(id)
        .persistent(true)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn update_telegram_id(
        &self,
        id: Uuid,
        telegram_id: &str,
    ) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            UPDATE "notification"
            SET "telegram_id" = $1
            WHERE "id" = $2
            "#,
        )
        .bind(telegram_id)
        .bind(id)
        .persistent(true)
        .execute(&self.pool)
        .await
    }

    /// Subscribers with a linked chat on one of `protocols`.
    pub async fn get_all_activated(
        &self,
        telegram_id_min_length: i32,
        protocols: &[String],
    ) -> Result<Vec<Notification_Data>, Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM "notification"
            WHERE
                char_length("telegram_id") >= $1 AND
                "protocol_id" = ANY($2)
            "#,
        )
        .bind(telegram_id_min_length)
        .bind(protocols)
        .persistent(true)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn count_by_telegram_id(
        &self,
        telegram_id: &str,
    ) -> Result<i64, Error> {
        let (value,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM "notification" WHERE "telegram_id" = $1
            "#,
        )
        .bind(telegram_id)
        .persistent(true)
        .fetch_one(&self.pool)
        .await?;

        Ok(value)
    }

    pub async fn get_page_by_telegram_id(
        &self,
        telegram_id: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Notification_Data>, Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM "notification"
            WHERE "telegram_id" = $1
            ORDER BY "created_at" ASC, "id" ASC
            OFFSET $2
            LIMIT $3
            "#,
        )
        .bind(telegram_id)
        .bind(offset)
        .bind(limit)
        .persistent(true)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn delete_by_id(
        &self,
        id: Uuid,
        telegram_id: &str,
    ) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            DELETE FROM "notification"
            WHERE "id" = $1 AND "telegram_id" = $2
            "#,
        )
        .bind(id)
        .bind(telegram_id)
        .persistent(true)
        .execute(&self.pool)
        .await
    }

    pub async fn delete_by_telegram_id(
        &self,
        telegram_id: &str,
    ) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            DELETE FROM "notification" WHERE "telegram_id" = $1
            "#,
        )
        .bind(telegram_id)
        .persistent(true)
        .execute(&self.pool)
        .await
    }
}
