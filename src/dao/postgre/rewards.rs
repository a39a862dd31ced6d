use sqlx::{Error, QueryBuilder, Transaction};

use super::{DataBase, QueryResult};
use crate::model::{Reward, Table};

const CREATE_TABLE: &str =
    include_str!("../../../migration/postgresql/rewards.sql");

/// Five binds per row keeps a chunk well below the 65535 parameter limit.
pub const MAX_ROWS_PER_STATEMENT: usize = 10_000;

impl Table<Reward> {
    pub async fn is_table_exists(&self) -> Result<bool, Error> {
        let (value,): (i64,) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*)
            FROM information_schema.tables
            WHERE
                table_schema = current_schema() AND
                table_name = 'rewards'
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(value > 0)
    }

    pub async fn create_table(&self) -> Result<QueryResult, Error> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await
    }

    /// Latest `distributed` of `asset`, formatted like the reward files.
    pub async fn get_last_distributed(
        &self,
        asset: &str,
    ) -> Result<Option<String>, Error> {
        const SQL: &str = r#"
        SELECT
            TO_CHAR("distributed", 'YYYY-MM-DD"T"HH24:MI:SS')
        FROM "rewards"
        WHERE "asset" = $1
        ORDER BY "distributed" DESC
        LIMIT 1
        "#;

        let value: Option<(String,)> = sqlx::query_as(SQL)
            .bind(asset)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value.map(|(distributed,)| distributed))
    }

    /// Plain inserts; a duplicate `ledger_id` fails the statement and with it
    /// the surrounding transaction.
    pub async fn insert_many(
        &self,
        data: &[Reward],
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<u64, Error> {
        let mut inserted = 0;

        for chunk in data.chunks(MAX_ROWS_PER_STATEMENT) {
            let mut query_builder: QueryBuilder<DataBase> = QueryBuilder::new(
                r#"
                INSERT INTO "rewards" (
                    "ledger_id",
                    "asset",
                    "distributed",
                    "amount",
                    "balance"
                )"#,
            );

            query_builder.push_values(chunk, |mut b, reward| {
                b.push_bind(&reward.ledger_id)
                    .push_bind(&reward.asset)
                    .push_bind(reward.distributed)
                    .push_bind(reward.amount)
                    .push_bind(reward.balance);
            });

            let query = query_builder.build();
            let result = query.execute(&mut **transaction).await?;
            inserted += result.rows_affected();
        }

        Ok(inserted)
    }
}
