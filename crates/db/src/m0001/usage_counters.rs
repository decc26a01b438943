use sea_query::{ColumnDef, Index, Table, TableCreateStatement, TableDropStatement};

use crate::table::UsageCounter;

pub struct Operation;

// Concurrent first-time checks for the same (user_id, month) must conflict
// on the composite key, never produce two rows.
fn create_table() -> TableCreateStatement {
    Table::create()
        .table(UsageCounter::Table)
        .col(
            ColumnDef::new(UsageCounter::UserId)
                .string()
                .not_null()
                .string_len(36),
        )
        .col(
            ColumnDef::new(UsageCounter::Month)
                .string()
                .not_null()
                .string_len(10),
        )
        .col(
            ColumnDef::new(UsageCounter::PlansCreated)
                .integer()
                .not_null()
                .default(0),
        )
        .primary_key(
            Index::create()
                .col(UsageCounter::UserId)
                .col(UsageCounter::Month),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(UsageCounter::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for Operation {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
