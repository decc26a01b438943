use sea_query::{ColumnDef, Table, TableCreateStatement, TableDropStatement};

use crate::table::Meal;

pub struct Operation;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(Meal::Table)
        .col(
            ColumnDef::new(Meal::Id)
                .string()
                .not_null()
                .string_len(36)
                .primary_key(),
        )
        .col(ColumnDef::new(Meal::Title).string().not_null().string_len(200))
        .col(
            ColumnDef::new(Meal::MealType)
                .string()
                .not_null()
                .string_len(20),
        )
        .col(ColumnDef::new(Meal::Calories).integer().not_null())
        .col(ColumnDef::new(Meal::Protein).double())
        .col(ColumnDef::new(Meal::Carbs).double())
        .col(ColumnDef::new(Meal::Fat).double())
        .col(ColumnDef::new(Meal::Tags).text().not_null())
        .col(ColumnDef::new(Meal::Instructions).text())
        .col(ColumnDef::new(Meal::CreatedAt).big_integer().not_null())
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(Meal::Table).to_owned()
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
