use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use mealweek_shared::user::SubscriptionStatus;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{
    MealFilter, MealIngredientRow, MealRow, NewMeal, NewPlan, NewPlanItem, PlanItemRow, PlanRow,
    Store, StoreResult, UsageReservation, retain_tags_any,
};

/// Non-durable stand-in used only when no database is configured. Everything
/// lives in process memory and disappears on restart; never the system of
/// record.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    meals: Vec<MealRow>,
    meal_ingredients: Vec<MealIngredientRow>,
    plans: Vec<PlanRow>,
    plan_items: Vec<PlanItemRow>,
    usage: HashMap<(String, String), u32>,
    subscriptions: HashMap<String, SubscriptionStatus>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a subscription row, standing in for the external billing
    /// writer.
    pub fn set_subscription(&self, user_id: &str, status: SubscriptionStatus) {
        self.lock().subscriptions.insert(user_id.to_owned(), status);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn now_unix() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

#[async_trait]
impl Store for MemoryStore {
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

        let mut inner = self.lock();
        for ingredient in meal.ingredients {
            inner.meal_ingredients.push(MealIngredientRow {
                id: Uuid::new_v4().to_string(),
                meal_id: row.id.clone(),
                name: ingredient.name,
                quantity: ingredient.quantity,
                unit: ingredient.unit,
                section: ingredient.section,
            });
        }
        inner.meals.push(row.clone());

        Ok(row)
    }

    async fn list_meals(&self, filter: &MealFilter) -> StoreResult<Vec<MealRow>> {
        let inner = self.lock();
        let rows = inner
            .meals
            .iter()
            .rev()
            .filter(|row| {
                filter
                    .meal_type
                    .as_deref()
                    .is_none_or(|meal_type| row.meal_type == meal_type)
            })
            .cloned()
            .collect();

        Ok(retain_tags_any(rows, &filter.tags_any))
    }

    async fn find_meal(&self, id: &str) -> StoreResult<Option<(MealRow, Vec<MealIngredientRow>)>> {
        let inner = self.lock();
        let Some(meal) = inner.meals.iter().find(|row| row.id == id).cloned() else {
            return Ok(None);
        };

        let mut ingredients: Vec<_> = inner
            .meal_ingredients
            .iter()
            .filter(|row| row.meal_id == id)
            .cloned()
            .collect();
        ingredients.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(Some((meal, ingredients)))
    }

    async fn delete_meal(&self, id: &str) -> StoreResult<bool> {
        let mut inner = self.lock();
        let before = inner.meals.len();
        inner.meals.retain(|row| row.id != id);
        inner.meal_ingredients.retain(|row| row.meal_id != id);

        Ok(inner.meals.len() < before)
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

        let mut inner = self.lock();
        for item in items {
            inner.plan_items.push(PlanItemRow {
                id: Uuid::new_v4().to_string(),
                plan_id: row.id.clone(),
                name: item.name.clone(),
                quantity: item.quantity,
                unit: item.unit.clone(),
                section: item.section.clone(),
            });
        }
        inner.plans.push(row.clone());

        Ok(row)
    }

    async fn list_plans(&self, user_id: &str) -> StoreResult<Vec<PlanRow>> {
        let inner = self.lock();

        Ok(inner
            .plans
            .iter()
            .rev()
            .filter(|row| row.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_plan(
        &self,
        user_id: &str,
        plan_id: &str,
    ) -> StoreResult<Option<(PlanRow, Vec<PlanItemRow>)>> {
        let inner = self.lock();
        let Some(plan) = inner
            .plans
            .iter()
            .find(|row| row.id == plan_id && row.user_id == user_id)
            .cloned()
        else {
            return Ok(None);
        };

        let items = inner
            .plan_items
            .iter()
            .filter(|row| row.plan_id == plan_id)
            .cloned()
            .collect();

        Ok(Some((plan, items)))
    }

    async fn delete_plan(&self, user_id: &str, plan_id: &str) -> StoreResult<bool> {
        let mut inner = self.lock();
        let before = inner.plans.len();
        inner
            .plans
            .retain(|row| !(row.id == plan_id && row.user_id == user_id));

        if inner.plans.len() == before {
            return Ok(false);
        }

        inner.plan_items.retain(|row| row.plan_id != plan_id);

        Ok(true)
    }

    async fn subscription_status(
        &self,
        user_id: &str,
    ) -> StoreResult<Option<SubscriptionStatus>> {
        Ok(self.lock().subscriptions.get(user_id).copied())
    }

    async fn track_usage(&self, user_id: &str, month: &str) -> StoreResult<()> {
        self.lock()
            .usage
            .entry((user_id.to_owned(), month.to_owned()))
            .or_insert(0);

        Ok(())
    }

    async fn reserve_usage(
        &self,
        user_id: &str,
        month: &str,
        limit: Option<u32>,
    ) -> StoreResult<UsageReservation> {
        let mut inner = self.lock();
        let count = inner
            .usage
            .entry((user_id.to_owned(), month.to_owned()))
            .or_insert(0);

        if limit.is_some_and(|limit| *count >= limit) {
            return Ok(UsageReservation::Exhausted { used: *count });
        }

        *count += 1;

        Ok(UsageReservation::Reserved { used: *count })
    }

    async fn usage_count(&self, user_id: &str, month: &str) -> StoreResult<u32> {
        Ok(self
            .lock()
            .usage
            .get(&(user_id.to_owned(), month.to_owned()))
            .copied()
            .unwrap_or(0))
    }
}
