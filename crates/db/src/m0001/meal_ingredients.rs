use sea_query::{
    ColumnDef, Index, IndexCreateStatement, Table, TableCreateStatement, TableDropStatement,
};

use crate::table::MealIngredient;

pub struct Operation;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(MealIngredient::Table)
        .col(
            ColumnDef::new(MealIngredient::Id)
                .string()
                .not_null()
                .string_len(36)
                .primary_key(),
        )
        .col(
            ColumnDef::new(MealIngredient::MealId)
                .string()
                .not_null()
                .string_len(36),
        )
        .col(
            ColumnDef::new(MealIngredient::Name)
                .string()
                .not_null()
                .string_len(200),
        )
        .col(ColumnDef::new(MealIngredient::Quantity).double())
        .col(ColumnDef::new(MealIngredient::Unit).string().string_len(50))
        .col(
            ColumnDef::new(MealIngredient::Section)
                .string()
                .string_len(50),
        )
        .to_owned()
}

fn create_meal_id_idx() -> IndexCreateStatement {
    Index::create()
        .name("idx_meal_ingredients_meal_id")
        .table(MealIngredient::Table)
        .col(MealIngredient::MealId)
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(MealIngredient::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for Operation {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(&mut *connection).await?;

        let statement = create_meal_id_idx().to_string(sea_query::SqliteQueryBuilder);
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
