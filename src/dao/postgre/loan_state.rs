use sqlx::{Error, QueryBuilder};

use crate::{
    model::{Loan_State, Table},
    types::LoanStateFilter,
};

use super::DataBase;

pub const LOAN_STATES_LIMIT: i64 = 1000;

impl Table<Loan_State> {
    /// Latest snapshot of a wallet inside the optional block window.
    pub async fn get_by_wallet(
        &self,
        protocol_id: &str,
        wallet_id: &str,
        start_block: Option<i64>,
        end_block: Option<i64>,
    ) -> Result<Option<Loan_State>, Error> {
        sqlx::query_as(
            r#"
            SELECT
                "id",
                "protocol_id",
                "block",
                "timestamp",
                "user",
                "collateral",
                "debt",
                "deposit"
            FROM "loan_state"
            WHERE
                "protocol_id" = $1 AND
                "user" = $2 AND
                ($3::BIGINT IS NULL OR "block" >= $3) AND
                ($4::BIGINT IS NULL OR "block" <= $4)
            ORDER BY "block" DESC
            LIMIT 1
            "#,
        )
        .bind(protocol_id)
        .bind(wallet_id)
        .bind(start_block)
        .bind(end_block)
        .persistent(true)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn get_filtered(
        &self,
        filter: &LoanStateFilter,
    ) -> Result<Vec<Loan_State>, Error> {
        let mut builder: QueryBuilder<DataBase> = QueryBuilder::new(
            r#"
            SELECT
                "id",
                "protocol_id",
                "block",
                "timestamp",
                "user",
                "collateral",
                "debt",
                "deposit"
            FROM "loan_state"
            WHERE 1 = 1
            "#,
        );

        if let Some(protocol) = &filter.protocol {
            builder.push(r#" AND "protocol_id" = "#).push_bind(protocol);
        }

        if let Some(user) = &filter.user {
            builder.push(r#" AND "user" = "#).push_bind(user);
        }

        if let Some(start_block) = filter.start_block {
            builder.push(r#" AND "block" >= "#).push_bind(start_block);
        }

        if let Some(end_block) = filter.end_block {
            builder.push(r#" AND "block" <= "#).push_bind(end_block);
        }

        if let Some(start_datetime) = filter.start_datetime {
            builder.push(r#" AND "timestamp" >= "#).push_bind(start_datetime);
        }

        if let Some(end_datetime) = filter.end_datetime {
            builder.push(r#" AND "timestamp" <= "#).push_bind(end_datetime);
        }

        builder
            .push(r#" ORDER BY "block" DESC LIMIT "#)
            .push_bind(LOAN_STATES_LIMIT);

        builder
            .build_query_as::<Loan_State>()
            .fetch_all(&self.pool)
            .await
    }
}
