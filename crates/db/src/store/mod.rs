mod memory;
mod sqlite;

use async_trait::async_trait;
use mealweek_shared::user::SubscriptionStatus;
use serde::Serialize;
use sqlx::prelude::FromRow;

pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, connect};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing collection does not exist in this deployment.
    #[error("collection not provisioned: {0}")]
    Unprovisioned(String),

    #[error(transparent)]
    Backend(#[from] sqlx::Error),
}

impl From<StoreError> for mealweek_shared::Error {
    fn from(value: StoreError) -> Self {
        mealweek_shared::Error::Upstream(value.to_string())
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MealRow {
    pub id: String,
    pub title: String,
    pub meal_type: String,
    pub calories: i64,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub tags: sqlx::types::Json<Vec<String>>,
    pub instructions: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MealIngredientRow {
    pub id: String,
    pub meal_id: String,
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub section: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PlanRow {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PlanItemRow {
    pub id: String,
    pub plan_id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub section: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewMeal {
    pub title: String,
    pub meal_type: String,
    pub calories: i64,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub tags: Vec<String>,
    pub instructions: Option<String>,
    pub ingredients: Vec<NewMealIngredient>,
}

#[derive(Debug, Clone)]
pub struct NewMealIngredient {
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub section: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPlan {
    pub user_id: String,
    pub title: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone)]
pub struct NewPlanItem {
    pub name: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub section: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MealFilter {
    pub meal_type: Option<String>,
    /// Keep meals carrying at least one of these tags; empty means no tag
    /// filtering.
    pub tags_any: Vec<String>,
}

/// Result of one atomic usage reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageReservation {
    /// The counter was incremented; `used` is its value afterwards.
    Reserved { used: u32 },
    /// The counter already sat at the limit and was left untouched.
    Exhausted { used: u32 },
}

/// Row-store collaborator over the named collections. One implementation
/// per deployment mode: [`SqliteStore`] when a database is configured,
/// [`MemoryStore`] otherwise.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_meal(&self, meal: NewMeal) -> StoreResult<MealRow>;
    async fn list_meals(&self, filter: &MealFilter) -> StoreResult<Vec<MealRow>>;
    async fn find_meal(&self, id: &str) -> StoreResult<Option<(MealRow, Vec<MealIngredientRow>)>>;
    async fn delete_meal(&self, id: &str) -> StoreResult<bool>;

    /// Persist one plan row plus its shopping items as a single logical
    /// write.
    async fn insert_plan(&self, plan: NewPlan, items: &[NewPlanItem]) -> StoreResult<PlanRow>;
    async fn list_plans(&self, user_id: &str) -> StoreResult<Vec<PlanRow>>;
    async fn find_plan(
        &self,
        user_id: &str,
        plan_id: &str,
    ) -> StoreResult<Option<(PlanRow, Vec<PlanItemRow>)>>;
    async fn delete_plan(&self, user_id: &str, plan_id: &str) -> StoreResult<bool>;

    async fn subscription_status(&self, user_id: &str) -> StoreResult<Option<SubscriptionStatus>>;

    /// Idempotent upsert of the `(user_id, month)` counter row at 0.
    async fn track_usage(&self, user_id: &str, month: &str) -> StoreResult<()>;

    /// Increment the counter by one, but only while it is below `limit`.
    /// `None` lifts the guard entirely (pro subscribers still get counted).
    async fn reserve_usage(
        &self,
        user_id: &str,
        month: &str,
        limit: Option<u32>,
    ) -> StoreResult<UsageReservation>;

    async fn usage_count(&self, user_id: &str, month: &str) -> StoreResult<u32>;
}

pub(crate) fn retain_tags_any(mut rows: Vec<MealRow>, tags_any: &[String]) -> Vec<MealRow> {
    if tags_any.is_empty() {
        return rows;
    }

    rows.retain(|row| row.tags.0.iter().any(|tag| tags_any.contains(tag)));
    rows
}
