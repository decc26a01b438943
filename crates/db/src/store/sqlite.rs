use std::str::FromStr;

use async_trait::async_trait;
use mealweek_shared::user::SubscriptionStatus;
use sea_query::{Expr, ExprTrait, OnConflict, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::table::{Meal, MealIngredient, MealPlan, PlanItem, Subscription, UsageCounter};

use super::{
    MealFilter, MealIngredientRow, MealRow, NewMeal, NewPlan, NewPlanItem, PlanItemRow, PlanRow,
    Store, StoreError, StoreResult, UsageReservation, retain_tags_any,
};

/// Open a SQLite pool for the given `sqlite:` url, creating the database
/// file when missing. WAL keeps concurrent readers off the writers' back.
pub async fn connect(url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;
    sqlx::query("PRAGMA foreign_keys = true").execute(&pool).await?;

    tracing::debug!(max_connections, "opened sqlite pool");

    Ok(pool)
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn now_unix() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

/// Missing tables surface as their own error class so callers can treat
/// "feature not provisioned" differently from a broken backend.
fn classify(collection: &str, err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.message().contains("no such table") {
            return StoreError::Unprovisioned(collection.to_owned());
        }
    }

    StoreError::Backend(err)
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert_meal(&self, meal: NewMeal) -> StoreResult<MealRow> {
        let row = MealRow {
            id: Uuid::new_v4().to_string(),
            title: meal.title,
            meal_type: meal.meal_type,
            calories: meal.calories,
            protein: meal.protein,
            carbs: meal.carbs,
            fat: meal.fat,
            tags: sqlx::types::Json(meal.tags),
            instructions: meal.instructions,
            created_at: now_unix(),
        };

        let tags = serde_json::to_string(&row.tags.0)
            .map_err(|err| StoreError::Backend(sqlx::Error::Encode(err.into())))?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| classify("meals", err))?;

        let statement = Query::insert()
            .into_table(Meal::Table)
            .columns([
                Meal::Id,
                Meal::Title,
                Meal::MealType,
                Meal::Calories,
                Meal::Protein,
                Meal::Carbs,
                Meal::Fat,
                Meal::Tags,
                Meal::Instructions,
                Meal::CreatedAt,
            ])
            .values_panic([
                row.id.as_str().into(),
                row.title.as_str().into(),
                row.meal_type.as_str().into(),
                row.calories.into(),
                row.protein.into(),
                row.carbs.into(),
                row.fat.into(),
                tags.into(),
                row.instructions.clone().into(),
                row.created_at.into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values)
            .execute(&mut *tx)
            .await
            .map_err(|err| classify("meals", err))?;

        if !meal.ingredients.is_empty() {
            let mut statement = Query::insert()
                .into_table(MealIngredient::Table)
                .columns([
                    MealIngredient::Id,
                    MealIngredient::MealId,
                    MealIngredient::Name,
                    MealIngredient::Quantity,
                    MealIngredient::Unit,
                    MealIngredient::Section,
                ])
                .to_owned();

            for ingredient in &meal.ingredients {
                statement.values_panic([
                    Uuid::new_v4().to_string().into(),
                    row.id.as_str().into(),
                    ingredient.name.as_str().into(),
                    ingredient.quantity.into(),
                    ingredient.unit.clone().into(),
                    ingredient.section.clone().into(),
                ]);
            }

            let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
            sqlx::query_with(&sql, values)
                .execute(&mut *tx)
                .await
                .map_err(|err| classify("meal_ingredients", err))?;
        }

        tx.commit().await.map_err(|err| classify("meals", err))?;

        Ok(row)
    }

    async fn list_meals(&self, filter: &MealFilter) -> StoreResult<Vec<MealRow>> {
        let mut statement = Query::select()
            .columns([
                Meal::Id,
                Meal::Title,
                Meal::MealType,
                Meal::Calories,
                Meal::Protein,
                Meal::Carbs,
                Meal::Fat,
                Meal::Tags,
                Meal::Instructions,
                Meal::CreatedAt,
            ])
            .from(Meal::Table)
            .order_by(Meal::CreatedAt, Order::Desc)
            .to_owned();

        if let Some(meal_type) = filter.meal_type.as_deref() {
            statement.and_where(Expr::col(Meal::MealType).eq(meal_type));
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, MealRow, _>(&sql, values)
            .fetch_all(&self.pool)
            .await
            .map_err(|err| classify("meals", err))?;

        // Tag overlap stays in memory; tags live in a JSON text column.
        Ok(retain_tags_any(rows, &filter.tags_any))
    }

    async fn find_meal(&self, id: &str) -> StoreResult<Option<(MealRow, Vec<MealIngredientRow>)>> {
        let statement = Query::select()
            .columns([
                Meal::Id,
                Meal::Title,
                Meal::MealType,
                Meal::Calories,
                Meal::Protein,
                Meal::Carbs,
                Meal::Fat,
                Meal::Tags,
                Meal::Instructions,
                Meal::CreatedAt,
            ])
            .from(Meal::Table)
            .and_where(Expr::col(Meal::Id).eq(id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let Some(meal) = sqlx::query_as_with::<_, MealRow, _>(&sql, values)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| classify("meals", err))?
        else {
            return Ok(None);
        };

        let statement = Query::select()
            .columns([
                MealIngredient::Id,
                MealIngredient::MealId,
                MealIngredient::Name,
                MealIngredient::Quantity,
                MealIngredient::Unit,
                MealIngredient::Section,
            ])
            .from(MealIngredient::Table)
            .and_where(Expr::col(MealIngredient::MealId).eq(id))
            .order_by(MealIngredient::Name, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let ingredients = sqlx::query_as_with::<_, MealIngredientRow, _>(&sql, values)
            .fetch_all(&self.pool)
            .await
            .map_err(|err| classify("meal_ingredients", err))?;

        Ok(Some((meal, ingredients)))
    }

    async fn delete_meal(&self, id: &str) -> StoreResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| classify("meals", err))?;

        let statement = Query::delete()
            .from_table(MealIngredient::Table)
            .and_where(Expr::col(MealIngredient::MealId).eq(id))
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values)
            .execute(&mut *tx)
            .await
            .map_err(|err| classify("meal_ingredients", err))?;

        let statement = Query::delete()
            .from_table(Meal::Table)
            .and_where(Expr::col(Meal::Id).eq(id))
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&mut *tx)
            .await
            .map_err(|err| classify("meals", err))?;

        tx.commit().await.map_err(|err| classify("meals", err))?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_plan(&self, plan: NewPlan, items: &[NewPlanItem]) -> StoreResult<PlanRow> {
        let row = PlanRow {
            id: Uuid::new_v4().to_string(),
            user_id: plan.user_id,
            title: plan.title,
            start_date: plan.start_date,
            end_date: plan.end_date,
            created_at: now_unix(),
        };

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| classify("meal_plans", err))?;

        let statement = Query::insert()
            .into_table(MealPlan::Table)
            .columns([
                MealPlan::Id,
                MealPlan::UserId,
                MealPlan::Title,
                MealPlan::StartDate,
                MealPlan::EndDate,
                MealPlan::CreatedAt,
            ])
            .values_panic([
                row.id.as_str().into(),
                row.user_id.as_str().into(),
                row.title.as_str().into(),
                row.start_date.as_str().into(),
                row.end_date.as_str().into(),
                row.created_at.into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values)
            .execute(&mut *tx)
            .await
            .map_err(|err| classify("meal_plans", err))?;

        if !items.is_empty() {
            let mut statement = Query::insert()
                .into_table(PlanItem::Table)
                .columns([
                    PlanItem::Id,
                    PlanItem::PlanId,
                    PlanItem::Name,
                    PlanItem::Quantity,
                    PlanItem::Unit,
                    PlanItem::Section,
                ])
                .to_owned();

            for item in items {
                statement.values_panic([
                    Uuid::new_v4().to_string().into(),
                    row.id.as_str().into(),
                    item.name.as_str().into(),
                    item.quantity.into(),
                    item.unit.clone().into(),
                    item.section.clone().into(),
                ]);
            }

            let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
            sqlx::query_with(&sql, values)
                .execute(&mut *tx)
                .await
                .map_err(|err| classify("plan_items", err))?;
        }

        tx.commit()
            .await
            .map_err(|err| classify("meal_plans", err))?;

        Ok(row)
    }

    async fn list_plans(&self, user_id: &str) -> StoreResult<Vec<PlanRow>> {
        let statement = Query::select()
            .columns([
                MealPlan::Id,
                MealPlan::UserId,
                MealPlan::Title,
                MealPlan::StartDate,
                MealPlan::EndDate,
                MealPlan::CreatedAt,
            ])
            .from(MealPlan::Table)
            .and_where(Expr::col(MealPlan::UserId).eq(user_id))
            .order_by(MealPlan::CreatedAt, Order::Desc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_as_with::<_, PlanRow, _>(&sql, values)
            .fetch_all(&self.pool)
            .await
            .map_err(|err| classify("meal_plans", err))
    }

    async fn find_plan(
        &self,
        user_id: &str,
        plan_id: &str,
    ) -> StoreResult<Option<(PlanRow, Vec<PlanItemRow>)>> {
        let statement = Query::select()
            .columns([
                MealPlan::Id,
                MealPlan::UserId,
                MealPlan::Title,
                MealPlan::StartDate,
                MealPlan::EndDate,
                MealPlan::CreatedAt,
            ])
            .from(MealPlan::Table)
            .and_where(Expr::col(MealPlan::Id).eq(plan_id))
            .and_where(Expr::col(MealPlan::UserId).eq(user_id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let Some(plan) = sqlx::query_as_with::<_, PlanRow, _>(&sql, values)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| classify("meal_plans", err))?
        else {
            return Ok(None);
        };

        let statement = Query::select()
            .columns([
                PlanItem::Id,
                PlanItem::PlanId,
                PlanItem::Name,
                PlanItem::Quantity,
                PlanItem::Unit,
                PlanItem::Section,
            ])
            .from(PlanItem::Table)
            .and_where(Expr::col(PlanItem::PlanId).eq(plan_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let items = sqlx::query_as_with::<_, PlanItemRow, _>(&sql, values)
            .fetch_all(&self.pool)
            .await
            .map_err(|err| classify("plan_items", err))?;

        Ok(Some((plan, items)))
    }

    async fn delete_plan(&self, user_id: &str, plan_id: &str) -> StoreResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| classify("meal_plans", err))?;

        let statement = Query::delete()
            .from_table(MealPlan::Table)
            .and_where(Expr::col(MealPlan::Id).eq(plan_id))
            .and_where(Expr::col(MealPlan::UserId).eq(user_id))
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&mut *tx)
            .await
            .map_err(|err| classify("meal_plans", err))?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        let statement = Query::delete()
            .from_table(PlanItem::Table)
            .and_where(Expr::col(PlanItem::PlanId).eq(plan_id))
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values)
            .execute(&mut *tx)
            .await
            .map_err(|err| classify("plan_items", err))?;

        tx.commit()
            .await
            .map_err(|err| classify("meal_plans", err))?;

        Ok(true)
    }

    async fn subscription_status(
        &self,
        user_id: &str,
    ) -> StoreResult<Option<SubscriptionStatus>> {
        let statement = Query::select()
            .column(Subscription::Status)
            .from(Subscription::Table)
            .and_where(Expr::col(Subscription::UserId).eq(user_id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let status = sqlx::query_as_with::<_, (String,), _>(&sql, values)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| classify("subscriptions", err))?;

        // Unknown status values degrade to free rather than erroring.
        Ok(status.map(|(raw,)| raw.parse().unwrap_or_default()))
    }

    async fn track_usage(&self, user_id: &str, month: &str) -> StoreResult<()> {
        let statement = Query::insert()
            .into_table(UsageCounter::Table)
            .columns([
                UsageCounter::UserId,
                UsageCounter::Month,
                UsageCounter::PlansCreated,
            ])
            .values_panic([user_id.into(), month.into(), 0i64.into()])
            .on_conflict(
                OnConflict::columns([UsageCounter::UserId, UsageCounter::Month])
                    .do_nothing()
                    .to_owned(),
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values)
            .execute(&self.pool)
            .await
            .map_err(|err| classify("usage_counters", err))?;

        Ok(())
    }

    async fn reserve_usage(
        &self,
        user_id: &str,
        month: &str,
        limit: Option<u32>,
    ) -> StoreResult<UsageReservation> {
        // Single conditional UPDATE; a separate read followed by a write
        // would race concurrent requests from the same user.
        let mut statement = Query::update()
            .table(UsageCounter::Table)
            .value(
                UsageCounter::PlansCreated,
                Expr::col(UsageCounter::PlansCreated).add(1),
            )
            .and_where(Expr::col(UsageCounter::UserId).eq(user_id))
            .and_where(Expr::col(UsageCounter::Month).eq(month))
            .to_owned();

        if let Some(limit) = limit {
            statement.and_where(Expr::col(UsageCounter::PlansCreated).lt(limit));
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&self.pool)
            .await
            .map_err(|err| classify("usage_counters", err))?;

        let used = self.usage_count(user_id, month).await?;

        if result.rows_affected() == 0 {
            Ok(UsageReservation::Exhausted { used })
        } else {
            Ok(UsageReservation::Reserved { used })
        }
    }

    async fn usage_count(&self, user_id: &str, month: &str) -> StoreResult<u32> {
        let statement = Query::select()
            .column(UsageCounter::PlansCreated)
            .from(UsageCounter::Table)
            .and_where(Expr::col(UsageCounter::UserId).eq(user_id))
            .and_where(Expr::col(UsageCounter::Month).eq(month))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let count = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| classify("usage_counters", err))?;

        Ok(count.map(|(value,)| Ord::max(value, 0) as u32).unwrap_or(0))
    }
}
