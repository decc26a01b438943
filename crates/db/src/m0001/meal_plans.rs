use sea_query::{
    ColumnDef, Index, IndexCreateStatement, Table, TableCreateStatement, TableDropStatement,
};

use crate::table::MealPlan;

pub struct Operation;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(MealPlan::Table)
        .col(
            ColumnDef::new(MealPlan::Id)
                .string()
                .not_null()
                .string_len(36)
                .primary_key(),
        )
        .col(
            ColumnDef::new(MealPlan::UserId)
                .string()
                .not_null()
                .string_len(36),
        )
        .col(
            ColumnDef::new(MealPlan::Title)
                .string()
                .not_null()
                .string_len(200),
        )
        .col(
            ColumnDef::new(MealPlan::StartDate)
                .string()
                .not_null()
                .string_len(10),
        )
        .col(
            ColumnDef::new(MealPlan::EndDate)
                .string()
                .not_null()
                .string_len(10),
        )
        .col(ColumnDef::new(MealPlan::CreatedAt).big_integer().not_null())
        .to_owned()
}

fn create_user_id_idx() -> IndexCreateStatement {
    Index::create()
        .name("idx_meal_plans_user_id")
        .table(MealPlan::Table)
        .col(MealPlan::UserId)
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(MealPlan::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for Operation {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(&mut *connection).await?;

        let statement = create_user_id_idx().to_string(sea_query::SqliteQueryBuilder);
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
