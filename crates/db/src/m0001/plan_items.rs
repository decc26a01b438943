use sea_query::{
    ColumnDef, Index, IndexCreateStatement, Table, TableCreateStatement, TableDropStatement,
};

use crate::table::PlanItem;

pub struct Operation;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(PlanItem::Table)
        .col(
            ColumnDef::new(PlanItem::Id)
                .string()
                .not_null()
                .string_len(36)
                .primary_key(),
        )
        .col(
            ColumnDef::new(PlanItem::PlanId)
                .string()
                .not_null()
                .string_len(36),
        )
        .col(
            ColumnDef::new(PlanItem::Name)
                .string()
                .not_null()
                .string_len(200),
        )
        .col(ColumnDef::new(PlanItem::Quantity).double().not_null())
        .col(ColumnDef::new(PlanItem::Unit).string().string_len(50))
        .col(ColumnDef::new(PlanItem::Section).string().string_len(50))
        .to_owned()
}

fn create_plan_id_idx() -> IndexCreateStatement {
    Index::create()
        .name("idx_plan_items_plan_id")
        .table(PlanItem::Table)
        .col(PlanItem::PlanId)
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(PlanItem::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for Operation {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(&mut *connection).await?;

        let statement = create_plan_id_idx().to_string(sea_query::SqliteQueryBuilder);
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
